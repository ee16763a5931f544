use std::cmp::Ordering;

use rand::Rng;

use crate::core::{MultiArray, MultiSpace, MultiVector, SpaceError};
use crate::utils::OrderedFloat;

use super::analysis::TilingAnalysis;
use super::error::{CollapseError, CollapseErrorKind};
use super::node::WaveNode;
use super::propagator::{PropagateItem, Propagator};
use super::subscriber::Subscriber;
use super::Tile;

/// Initial constraints for a run: tiles to collapse and tiles to ban before the
/// main loop starts.
///
/// Positions outside of the output space are silently dropped, so the same
/// options can seed differently sized outputs. Entries are applied in the
/// order they were added, bans first.
#[derive(Clone, Debug)]
pub struct RunOptions<T> {
    tiles: Vec<(MultiVector, T)>,
    bans: Vec<(MultiVector, T)>,
}

impl<T> Default for RunOptions<T> {
    fn default() -> Self {
        Self {
            tiles: Vec::new(),
            bans: Vec::new(),
        }
    }
}

impl<T> RunOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predetermines the tile of a cell - the cell collapses towards it before
    /// the main loop.
    pub fn with_tile(mut self, position: impl Into<MultiVector>, tile: T) -> Self {
        self.tiles.push((position.into(), tile));
        self
    }

    /// Forbids a tile at a cell before the main loop.
    pub fn with_ban(mut self, position: impl Into<MultiVector>, tile: T) -> Self {
        self.bans.push((position.into(), tile));
        self
    }
}

/// The per-cell state of one generation run: a dense [`MultiArray`] of
/// [`WaveNode`]s over the output space.
///
/// A successful run leaves every node with exactly one possibility; a failed
/// run leaves the wave exactly as it was when the contradiction surfaced, so
/// the emptied cell and its surroundings can be inspected.
#[derive(Clone, Debug)]
pub struct Wave<'a, T: Tile> {
    analysis: &'a TilingAnalysis<T>,
    nodes: MultiArray<WaveNode>,
}

impl<'a, T: Tile> Wave<'a, T> {
    /// Returns the output space the wave spans.
    pub fn space(&self) -> &MultiSpace {
        self.nodes.space()
    }

    /// Returns the underlying node array.
    pub fn nodes(&self) -> &MultiArray<WaveNode> {
        &self.nodes
    }

    /// Returns the node of a cell.
    pub fn node(&self, position: &MultiVector) -> Option<&WaveNode> {
        self.nodes.get(position)
    }

    /// Returns the tiles still possible at a cell.
    pub fn possible_at(&self, position: &MultiVector) -> Option<Vec<&'a T>> {
        let tiles = self.analysis.tiles();
        self.nodes.get(position).map(|node| {
            node.iter_possible()
                .map(|tile| &tiles[tile])
                .collect::<Vec<_>>()
        })
    }

    /// Returns the tile of a collapsed cell, `None` while the cell still holds
    /// several possibilities (or none).
    pub fn tile_at(&self, position: &MultiVector) -> Option<&'a T> {
        let tiles = self.analysis.tiles();
        self.nodes
            .get(position)
            .and_then(|node| node.sole_possible())
            .map(|tile| &tiles[tile])
    }

    /// Checks whether every cell holds exactly one possibility.
    pub fn is_collapsed(&self) -> bool {
        self.nodes
            .values()
            .iter()
            .all(|node| node.possible_count() == 1)
    }

    /// Projects the wave onto its tiles, `None` unless fully collapsed.
    pub fn collapsed(&self) -> Option<MultiArray<T>> {
        let tiles = self.analysis.tiles();
        let values = self
            .nodes
            .values()
            .iter()
            .map(|node| node.sole_possible().map(|tile| tiles[tile].clone()))
            .collect::<Option<Vec<_>>>()?;
        Some(
            MultiArray::from_values(self.space().clone(), values)
                .expect("one tile per wave node"),
        )
    }
}

/// The observe/propagate engine: collapses an output space cell by cell into a
/// tiling that follows a [`TilingAnalysis`].
///
/// Each iteration picks the cell with the lowest entropy among those still
/// undecided (ties broken uniformly through the caller's RNG), draws one of its
/// possible tiles with probability proportional to the tile weight, and
/// propagates the banned alternatives until quiescence - or until some cell
/// runs out of options, which ends the run as a failure. There is no
/// backtracking; callers retry probabilistic failures with another seed.
///
/// The analysis is borrowed, never copied: several wave functions on separate
/// threads can share one.
///
/// # Examples
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use wave_forge::{MultiArray, MultiSpace, TilingAnalysis, WaveFunction};
///
/// let space = MultiSpace::from_lengths(&[6], false).unwrap();
/// let sample = MultiArray::from_values(space, vec!['-', '#', '-', '#', '-', '#']).unwrap();
/// let analysis = TilingAnalysis::from_sample(&sample).unwrap();
///
/// let output = MultiSpace::from_lengths(&[10], false).unwrap();
/// let mut wave_fn = WaveFunction::new(output, &analysis).unwrap();
/// let mut wave = wave_fn.new_wave();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// wave_fn.run(&mut wave, &mut rng).unwrap();
/// assert!(wave.is_collapsed());
/// ```
pub struct WaveFunction<'a, T: Tile + 'static> {
    output_space: MultiSpace,
    analysis: &'a TilingAnalysis<T>,
    subscriber: Option<Box<dyn Subscriber<T>>>,
}

impl<'a, T: Tile + 'static> WaveFunction<'a, T> {
    /// Creates an engine generating into `output_space` under the analysis'
    /// rules.
    ///
    /// # Errors
    /// [`SpaceError::DimensionMismatch`] when the output space and the analysis
    /// disagree on the dimension count.
    pub fn new(
        output_space: MultiSpace,
        analysis: &'a TilingAnalysis<T>,
    ) -> Result<Self, SpaceError> {
        if output_space.dims() != analysis.direction_space().dims() {
            return Err(SpaceError::DimensionMismatch {
                expected: analysis.direction_space().dims(),
                found: output_space.dims(),
            });
        }
        Ok(Self {
            output_space,
            analysis,
            subscriber: None,
        })
    }

    /// Attach a subscriber notified of each cell being collapsed.
    pub fn with_subscriber(mut self, subscriber: Box<dyn Subscriber<T>>) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    /// Retrieve the subscriber attached to the wave function.
    pub fn retrieve_subscriber(&mut self) -> Option<Box<dyn Subscriber<T>>> {
        self.subscriber.take()
    }

    /// Allocates a fresh wave: one node per output cell, each cloned from the
    /// analysis-derived prototype.
    pub fn new_wave(&self) -> Wave<'a, T> {
        let prototype = WaveNode::prototype(self.analysis);
        Wave {
            analysis: self.analysis,
            nodes: MultiArray::filled_with(self.output_space.clone(), || prototype.clone()),
        }
    }

    /// Runs the engine without initial constraints. See
    /// [`run_with`](Self::run_with).
    pub fn run<R: Rng>(&mut self, wave: &mut Wave<'a, T>, rng: &mut R) -> Result<(), CollapseError> {
        self.run_with(wave, rng, &RunOptions::default())
    }

    /// Runs the engine on a freshly allocated wave until every cell is
    /// collapsed, applying the predetermined tiles and bans of `options` first.
    ///
    /// # Errors
    /// [`CollapseError`] when a cell runs out of possible tiles or a
    /// predetermined entry references an impossible tile. The wave keeps its
    /// terminal state either way, so failed runs stay inspectable.
    pub fn run_with<R: Rng>(
        &mut self,
        wave: &mut Wave<'a, T>,
        rng: &mut R,
        options: &RunOptions<T>,
    ) -> Result<(), CollapseError> {
        let WaveFunction {
            output_space: space,
            analysis,
            subscriber,
        } = self;
        let analysis = *analysis;
        let weights = analysis.weights_table();
        debug_assert_eq!(wave.space(), &*space, "wave allocated for another space");

        let mut iter = 0u32;
        let mut propagator = Propagator::default();

        if let Some(subscriber) = subscriber.as_mut() {
            subscriber.on_run_start();
        }

        for (position, tile) in &options.bans {
            if !space.in_bounds(position) {
                continue;
            }
            let wrapped = space.simplify(position);
            let flat = space
                .flat_index(&wrapped)
                .expect("in-bounds positions wrap into storage range");
            let Some(tile_idx) = analysis.tile_idx(tile) else {
                return Err(CollapseError::new(
                    wrapped,
                    CollapseErrorKind::UnknownTile,
                    iter,
                ));
            };
            let node = &mut wave.nodes.values_mut()[flat];
            if let Err(kind) = node.ban(tile_idx, weights) {
                return Err(CollapseError::new(wrapped, kind, iter));
            }
            if node.is_unresolvable() {
                return Err(CollapseError::new(wrapped, CollapseErrorKind::Init, iter));
            }
            propagator.push_propagate(PropagateItem::new(flat, tile_idx));
        }

        for (position, tile) in &options.tiles {
            if !space.in_bounds(position) {
                continue;
            }
            let wrapped = space.simplify(position);
            let flat = space
                .flat_index(&wrapped)
                .expect("in-bounds positions wrap into storage range");
            let Some(tile_idx) = analysis.tile_idx(tile) else {
                return Err(CollapseError::new(
                    wrapped,
                    CollapseErrorKind::UnknownTile,
                    iter,
                ));
            };
            let node = &mut wave.nodes.values_mut()[flat];
            let removed = node.collapse_into(tile_idx, weights);
            if node.is_unresolvable() {
                return Err(CollapseError::new(wrapped, CollapseErrorKind::Init, iter));
            }
            if let Some(subscriber) = subscriber.as_mut() {
                subscriber.on_collapse(&wrapped, tile);
            }
            for banned in removed {
                propagator.push_propagate(PropagateItem::new(flat, banned));
            }
        }

        CollapseError::from_result(
            propagator.propagate(wave.nodes.values_mut(), space, analysis),
            space,
            CollapseErrorKind::Init,
            iter,
        )?;

        while let Some(chosen) = Self::select_lowest_entropy(wave.nodes.values(), rng) {
            let node = &mut wave.nodes.values_mut()[chosen];
            let tile_idx = node
                .choose_weighted(rng, weights)
                .map_err(|kind| CollapseError::new(space.coords(chosen), kind, iter))?;
            let removed = node.collapse_into(tile_idx, weights);

            if let Some(subscriber) = subscriber.as_mut() {
                subscriber.on_collapse(&space.coords(chosen), &analysis.tiles()[tile_idx]);
            }
            for banned in removed {
                propagator.push_propagate(PropagateItem::new(chosen, banned));
            }
            CollapseError::from_result(
                propagator.propagate(wave.nodes.values_mut(), space, analysis),
                space,
                CollapseErrorKind::Propagation,
                iter,
            )?;
            iter += 1;
        }

        Ok(())
    }

    /// Picks the undecided node with the smallest entropy, breaking ties with a
    /// uniform reservoir draw on the caller's RNG. `None` once every node is
    /// decided - the run's success condition.
    fn select_lowest_entropy<R: Rng>(nodes: &[WaveNode], rng: &mut R) -> Option<usize> {
        let mut best: Option<(OrderedFloat, usize)> = None;
        let mut ties = 0u32;
        for (index, node) in nodes.iter().enumerate() {
            if node.possible_count() < 2 {
                continue;
            }
            let entropy = OrderedFloat::new(node.entropy());
            match &mut best {
                None => {
                    best = Some((entropy, index));
                    ties = 1;
                }
                Some((lowest, chosen)) => match entropy.cmp(lowest) {
                    Ordering::Less => {
                        *lowest = entropy;
                        *chosen = index;
                        ties = 1;
                    }
                    Ordering::Equal => {
                        ties += 1;
                        if rng.gen_range(0..ties) == 0 {
                            *chosen = index;
                        }
                    }
                    Ordering::Greater => {}
                },
            }
        }
        best.map(|(_, index)| index)
    }
}
