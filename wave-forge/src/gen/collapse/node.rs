use rand::Rng;

use super::analysis::{calc_entropy, TileWeights, TilingAnalysis};
use super::error::CollapseErrorKind;
use super::Tile;

/// Per-(cell, tile) support counters, one per direction of the analysis'
/// direction space.
///
/// The counter for a direction holds how many distinct tiles in the neighbour
/// cell at that offset still permit this tile here. A tile stays locally
/// possible as long as every counter is positive; banning a supporter in some
/// neighbour decrements the matching counter.
#[derive(Clone, Debug)]
pub struct TileEnablement {
    counts: Box<[i32]>,
}

impl TileEnablement {
    pub(crate) fn new(counts: impl Into<Box<[i32]>>) -> Self {
        Self {
            counts: counts.into(),
        }
    }

    /// Returns the remaining supporter count towards the given direction index.
    pub fn count(&self, direction: usize) -> i32 {
        self.counts[direction]
    }

    /// Subtracts `amount` supporters from the given direction and reports
    /// whether the tile is still possible. Counters may underflow below zero;
    /// contradiction handling never reads them again.
    pub(crate) fn remove_from(&mut self, direction: usize, amount: i32) -> bool {
        self.counts[direction] -= amount;
        self.counts[direction] > 0
    }
}

/// Wave state of a single output cell: the set of still-possible tiles with
/// their [`TileEnablement`] counters, plus the incrementally maintained weight
/// sum and Shannon entropy of that set.
///
/// Nodes are stamped by cloning a per-analysis prototype, mutated only through
/// bans, and die with their wave. An emptied possibility set marks the node
/// unresolvable - the signal a run surfaces as a contradiction.
#[derive(Clone, Debug)]
pub struct WaveNode {
    enablement: Vec<Option<TileEnablement>>,
    num_possible: usize,
    weights: TileWeights,
    entropy: f64,
}

impl WaveNode {
    /// Creates the shared starting state: every tile of the analysis possible,
    /// counters from the initial enablement table, weight and entropy at the
    /// analysis totals.
    pub(crate) fn prototype<T: Tile>(analysis: &TilingAnalysis<T>) -> Self {
        let enablement = analysis
            .initial_ways()
            .iter()
            .map(|ways| Some(TileEnablement::new(ways.clone())))
            .collect();
        Self {
            enablement,
            num_possible: analysis.tile_count(),
            weights: analysis.total_weight(),
            entropy: analysis.max_entropy(),
        }
    }

    /// Returns the number of still-possible tiles.
    pub fn possible_count(&self) -> usize {
        self.num_possible
    }

    /// Checks whether no tile is possible anymore.
    pub fn is_unresolvable(&self) -> bool {
        self.num_possible == 0
    }

    /// Checks whether the tile index is still possible.
    pub fn is_possible(&self, tile: usize) -> bool {
        matches!(self.enablement.get(tile), Some(Some(_)))
    }

    /// Iterates over the still-possible tile indices, ascending.
    pub fn iter_possible(&self) -> impl Iterator<Item = usize> + '_ {
        self.enablement
            .iter()
            .enumerate()
            .filter_map(|(tile, slot)| slot.as_ref().map(|_| tile))
    }

    /// Returns the single remaining tile index of a collapsed node.
    pub fn sole_possible(&self) -> Option<usize> {
        if self.num_possible == 1 {
            self.iter_possible().next()
        } else {
            None
        }
    }

    /// Returns the enablement counters of a still-possible tile.
    pub fn enablement(&self, tile: usize) -> Option<&TileEnablement> {
        self.enablement.get(tile).and_then(Option::as_ref)
    }

    pub(crate) fn enablement_mut(&mut self, tile: usize) -> Option<&mut TileEnablement> {
        self.enablement.get_mut(tile).and_then(Option::as_mut)
    }

    /// Returns the summed weights of the still-possible tiles.
    pub fn weights(&self) -> TileWeights {
        self.weights
    }

    /// Returns the entropy of the current possibility set.
    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    /// Removes a tile from the possibilities, keeping weight sum and entropy
    /// current. An emptied node skips the bookkeeping - it is dead and only
    /// inspected, never updated again.
    pub(crate) fn ban(
        &mut self,
        tile: usize,
        weights: &[TileWeights],
    ) -> Result<(), CollapseErrorKind> {
        match self.enablement.get_mut(tile) {
            Some(slot) if slot.is_some() => {
                *slot = None;
            }
            _ => return Err(CollapseErrorKind::UnknownTile),
        }
        self.num_possible -= 1;
        if self.num_possible == 0 {
            return Ok(());
        }
        self.weights -= weights[tile];
        self.entropy = calc_entropy(self.weights);
        Ok(())
    }

    /// Bans every possibility except `chosen`, returning the removed tiles for
    /// propagation. Collapsing towards a tile that is not possible empties the
    /// node; the caller surfaces that as a contradiction.
    pub(crate) fn collapse_into(&mut self, chosen: usize, weights: &[TileWeights]) -> Vec<usize> {
        let removed = self
            .iter_possible()
            .filter(|tile| *tile != chosen)
            .collect::<Vec<_>>();
        for tile in &removed {
            self.ban(*tile, weights)
                .expect("gathered possibilities can always be banned");
        }
        removed
    }

    /// Draws one of the possible tiles with probability proportional to its
    /// weight.
    pub(crate) fn choose_weighted<R: Rng>(
        &self,
        rng: &mut R,
        weights: &[TileWeights],
    ) -> Result<usize, CollapseErrorKind> {
        let total = self.weights.0;
        if total == 0 {
            return Err(CollapseErrorKind::ZeroWeight);
        }
        let mut roll = rng.gen_range(0..total);
        for tile in self.iter_possible() {
            let weight = weights[tile].0;
            if roll < weight {
                return Ok(tile);
            }
            roll -= weight;
        }
        Err(CollapseErrorKind::ZeroWeight)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::core::{MultiArray, MultiSpace};

    use super::super::analysis::TilingAnalysis;
    use super::super::error::CollapseErrorKind;
    use super::WaveNode;

    fn alternating_analysis() -> TilingAnalysis<char> {
        let space = MultiSpace::from_lengths(&[6], false).unwrap();
        let sample =
            MultiArray::from_values(space, vec!['a', 'b', 'a', 'b', 'a', 'b']).unwrap();
        TilingAnalysis::from_sample(&sample).unwrap()
    }

    #[test]
    fn prototype_starts_from_analysis_totals() {
        let analysis = alternating_analysis();
        let node = WaveNode::prototype(&analysis);

        assert_eq!(node.possible_count(), 2);
        assert_eq!(node.weights().0, 6);
        assert!((node.entropy() - analysis.max_entropy()).abs() < 1e-12);

        // One supporter per direction: `a` is enabled only by `b` on both sides.
        let a = analysis.tile_idx(&'a').unwrap();
        for direction in 0..analysis.directions().len() {
            assert_eq!(node.enablement(a).unwrap().count(direction), 1);
        }
    }

    #[test]
    fn ban_keeps_weight_sum_and_entropy_coherent() {
        let analysis = alternating_analysis();
        let weights = analysis.weights_table().to_vec();
        let mut node = WaveNode::prototype(&analysis);

        let b = analysis.tile_idx(&'b').unwrap();
        node.ban(b, &weights).unwrap();

        assert_eq!(node.possible_count(), 1);
        let expected = node
            .iter_possible()
            .map(|tile| weights[tile].0)
            .sum::<u32>();
        assert_eq!(node.weights().0, expected);
        assert!(node.entropy().abs() < 1e-12);
        assert_eq!(node.sole_possible(), analysis.tile_idx(&'a'));
    }

    #[test]
    fn banning_a_missing_tile_fails() {
        let analysis = alternating_analysis();
        let weights = analysis.weights_table().to_vec();
        let mut node = WaveNode::prototype(&analysis);

        let b = analysis.tile_idx(&'b').unwrap();
        node.ban(b, &weights).unwrap();
        assert_eq!(node.ban(b, &weights), Err(CollapseErrorKind::UnknownTile));
        assert_eq!(node.ban(99, &weights), Err(CollapseErrorKind::UnknownTile));
    }

    #[test]
    fn emptied_node_is_unresolvable() {
        let analysis = alternating_analysis();
        let weights = analysis.weights_table().to_vec();
        let mut node = WaveNode::prototype(&analysis);

        for tile in node.iter_possible().collect::<Vec<_>>() {
            node.ban(tile, &weights).unwrap();
        }
        assert!(node.is_unresolvable());
        assert_eq!(node.possible_count(), 0);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(
            node.choose_weighted(&mut rng, &weights),
            Err(CollapseErrorKind::ZeroWeight)
        );
    }

    #[test]
    fn collapse_gathers_every_removed_option() {
        let analysis = alternating_analysis();
        let weights = analysis.weights_table().to_vec();
        let mut node = WaveNode::prototype(&analysis);

        let a = analysis.tile_idx(&'a').unwrap();
        let removed = node.collapse_into(a, &weights);

        assert_eq!(removed, vec![analysis.tile_idx(&'b').unwrap()]);
        assert_eq!(node.sole_possible(), Some(a));
    }

    #[test]
    fn weighted_choice_only_picks_possible_tiles() {
        let space = MultiSpace::from_lengths(&[4], false).unwrap();
        let sample = MultiArray::from_values(space, vec!['a', 'a', 'a', 'b']).unwrap();
        let analysis = TilingAnalysis::from_sample(&sample).unwrap();
        let weights = analysis.weights_table().to_vec();
        let node = WaveNode::prototype(&analysis);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..64 {
            let tile = node.choose_weighted(&mut rng, &weights).unwrap();
            assert!(node.is_possible(tile));
        }
    }

    #[test]
    fn clones_copy_counters_deeply() {
        let analysis = alternating_analysis();
        let weights = analysis.weights_table().to_vec();
        let prototype = WaveNode::prototype(&analysis);
        let mut copy = prototype.clone();

        let a = analysis.tile_idx(&'a').unwrap();
        copy.ban(a, &weights).unwrap();
        copy.enablement_mut(analysis.tile_idx(&'b').unwrap())
            .unwrap()
            .remove_from(0, 1);

        assert_eq!(prototype.possible_count(), 2);
        assert_eq!(
            prototype
                .enablement(analysis.tile_idx(&'b').unwrap())
                .unwrap()
                .count(0),
            1
        );
    }
}
