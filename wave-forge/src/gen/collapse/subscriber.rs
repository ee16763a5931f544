use std::{any::Any, fmt::Debug, fs::File, io::Write};

use crate::core::MultiVector;

use super::Tile;

/// When applied to a struct allows injecting it into a
/// [`WaveFunction`](crate::gen::collapse::WaveFunction) to react on each cell
/// being collapsed.
pub trait Subscriber<T: Tile>: Any {
    /// Called when a run starts. No-op by default, should be overridden to clear
    /// the state of the subscriber if it retains any.
    fn on_run_start(&mut self) {
        // no-op
    }

    /// Called when a cell is collapsed, with the position and the chosen tile.
    fn on_collapse(&mut self, position: &MultiVector, tile: &T);

    /// To retrieve the concrete subscriber type back from the wave function.
    fn as_any(&self) -> &dyn Any;
}

/// Basic subscriber for debugging purposes.
///
/// Upon collapsing a cell it prints the position and the chosen tile, either
/// to stdout or to the provided file.
#[derive(Debug, Default)]
pub struct DebugSubscriber {
    file: Option<File>,
}

impl DebugSubscriber {
    pub fn new(file: Option<File>) -> Self {
        Self { file }
    }
}

impl<T: Tile + Debug + 'static> Subscriber<T> for DebugSubscriber {
    fn on_collapse(&mut self, position: &MultiVector, tile: &T) {
        if let Some(file) = &mut self.file {
            writeln!(file, "collapsed tile: {tile:?} on position: {position:?}").unwrap();
        } else {
            println!("collapsed tile: {tile:?} on position: {position:?}");
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Event in the history of a run: the collapsed position alongside the chosen
/// tile.
#[derive(Debug, Clone)]
pub struct CollapseHistoryItem<T> {
    pub position: MultiVector,
    pub tile: T,
}

/// Simple subscriber collecting the full collapse history of a run.
///
/// Every new run begun by the wave function clears the history.
#[derive(Debug, Clone)]
pub struct CollapseHistorySubscriber<T> {
    history: Vec<CollapseHistoryItem<T>>,
}

impl<T> Default for CollapseHistorySubscriber<T> {
    fn default() -> Self {
        Self {
            history: Vec::new(),
        }
    }
}

impl<T> CollapseHistorySubscriber<T> {
    /// Returns the collapse events in the order they happened.
    pub fn history(&self) -> &[CollapseHistoryItem<T>] {
        &self.history
    }
}

impl<T: Tile + 'static> Subscriber<T> for CollapseHistorySubscriber<T> {
    fn on_run_start(&mut self) {
        self.history.clear();
    }

    fn on_collapse(&mut self, position: &MultiVector, tile: &T) {
        self.history.push(CollapseHistoryItem {
            position: position.clone(),
            tile: tile.clone(),
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
