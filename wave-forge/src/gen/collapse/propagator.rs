use crate::core::MultiSpace;

use super::analysis::TilingAnalysis;
use super::node::WaveNode;
use super::Tile;

/// A single pending consequence: `tile` stopped being possible at the cell
/// with flat index `position`.
#[derive(Debug)]
pub(crate) struct PropagateItem {
    pub position: usize,
    pub to_remove: usize,
}

impl PropagateItem {
    pub fn new(position: usize, to_remove: usize) -> Self {
        Self {
            position,
            to_remove,
        }
    }
}

/// LIFO stack driving the ban cascade.
///
/// Every ban is pushed exactly once per (cell, tile), so a full drain is
/// bounded by `cells × tiles` pops with `directions × enabled` work each.
#[derive(Default)]
pub(crate) struct Propagator {
    inner: Vec<PropagateItem>,
}

impl Propagator {
    pub fn push_propagate(&mut self, item: PropagateItem) {
        self.inner.push(item);
    }

    /// Drains the stack, cutting support in every neighbour of each popped ban
    /// and banning tiles whose support is exhausted.
    ///
    /// Neighbour positions wrap along periodic output axes; offsets leaving a
    /// non-periodic axis are skipped. Returns the flat index of the first cell
    /// left without any possible tile.
    pub fn propagate<T: Tile>(
        &mut self,
        nodes: &mut [WaveNode],
        space: &MultiSpace,
        analysis: &TilingAnalysis<T>,
    ) -> Result<(), usize> {
        let weights = analysis.weights_table();
        while let Some(item) = self.inner.pop() {
            let origin = space.coords(item.position);
            for (dir_idx, direction) in analysis.directions().iter().enumerate() {
                let target = space.simplify(&(&origin + direction));
                let Some(target_flat) = space.flat_index(&target) else {
                    continue;
                };
                let opposite = analysis.opposite_of(dir_idx);
                let node = &mut nodes[target_flat];
                for &enabled in analysis.enabled_in_direction(item.to_remove, dir_idx) {
                    if !node.is_possible(enabled) {
                        continue;
                    }
                    let still_possible = node
                        .enablement_mut(enabled)
                        .expect("possible options carry enablement counters")
                        .remove_from(opposite, 1);
                    if still_possible {
                        continue;
                    }
                    node.ban(enabled, weights)
                        .expect("possible options can always be banned");
                    if node.is_unresolvable() {
                        return Err(target_flat);
                    }
                    self.push_propagate(PropagateItem::new(target_flat, enabled));
                }
            }
        }
        Ok(())
    }
}
