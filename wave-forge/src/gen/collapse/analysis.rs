use std::collections::{HashMap, HashSet};
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::core::{MultiCollection, MultiSpace, MultiVector};

use super::error::AnalysisError;
use super::rules::TilingRule;
use super::Tile;

/// Weight of a tile option paired with its precomputed `w·ln w` term.
///
/// Carrying both numbers lets nodes keep their entropy current by plain
/// subtraction whenever an option disappears, instead of rescanning the
/// remaining possibilities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TileWeights(pub u32, pub f64);

impl TileWeights {
    pub fn new(weight: u32) -> Self {
        let w = weight as f64;
        Self(weight, if weight == 0 { 0.0 } else { w * w.ln() })
    }
}

impl Add for TileWeights {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl AddAssign for TileWeights {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for TileWeights {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl SubAssign for TileWeights {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Shannon entropy of a weight multiset summarized by its [`TileWeights`] sums.
#[inline]
pub(crate) fn calc_entropy(weights: TileWeights) -> f64 {
    let sum = weights.0 as f64;
    sum.ln() - weights.1 / sum
}

/// Adjacency ruleset and tile frequencies extracted from an example tiling,
/// or accepted directly from the caller.
///
/// Built once and read-only afterwards, so a single analysis can feed any
/// number of [`WaveFunction`](crate::gen::collapse::WaveFunction) runs - also
/// from multiple threads, each owning its wave.
///
/// Next to the structural [`TilingRule`] set (the public contract, O(1)
/// membership) the analysis keeps translated dense tables for the hot loop:
/// interned tile indices, the enumerated non-zero directions with their
/// opposites, per-(tile, direction) lists of enabled adjacent tiles and the
/// initial enablement counters every wave node starts from.
///
/// # Examples
/// ```
/// use wave_forge::{MultiArray, MultiSpace, TilingAnalysis, TilingRule, MultiVector};
///
/// let space = MultiSpace::from_lengths(&[4], false).unwrap();
/// let sample = MultiArray::from_values(space, vec!['a', 'b', 'a', 'b']).unwrap();
///
/// let analysis = TilingAnalysis::from_sample(&sample).unwrap();
/// assert_eq!(analysis.weight_of(&'a'), Some(2));
/// assert!(analysis.contains_rule(&TilingRule::new('a', 'b', MultiVector::from([1]))));
/// ```
#[derive(Debug, Clone)]
pub struct TilingAnalysis<T: Tile> {
    direction_space: MultiSpace,
    directions: Vec<MultiVector>,
    opposite: Vec<usize>,
    rules: HashSet<TilingRule<T>>,
    tiles: Vec<T>,
    tile_index: HashMap<T, usize>,
    weights: Vec<TileWeights>,
    total_weight: TileWeights,
    max_entropy: f64,
    enabled: Vec<Vec<Vec<usize>>>,
    initial_ways: Vec<Vec<i32>>,
}

impl<T: Tile> TilingAnalysis<T> {
    /// Extracts rules and frequencies from an example tiling.
    ///
    /// Walks every cell of the sample, counting tile occurences and recording
    /// each observed adjacency together with its inverse. Neighbourhoods wrap
    /// along periodic sample axes; absent cells of sparse samples contribute
    /// neither counts nor rules.
    ///
    /// # Errors
    /// [`AnalysisError::EmptySample`] when the sample holds no tiles.
    pub fn from_sample<C>(sample: &C) -> Result<Self, AnalysisError>
    where
        C: MultiCollection<T>,
    {
        let space = sample.space();
        let direction_space = Self::direction_space_for(space);
        let directions = Self::enumerate_directions(&direction_space);

        let mut tiles: Vec<T> = Vec::new();
        let mut tile_index: HashMap<T, usize> = HashMap::new();
        let mut counts: Vec<u32> = Vec::new();
        let mut rules: HashSet<TilingRule<T>> = HashSet::new();

        for position in space.points() {
            let Some(tile) = sample.get(&position) else {
                continue;
            };
            let index = match tile_index.get(tile) {
                Some(index) => *index,
                None => {
                    tiles.push(tile.clone());
                    counts.push(0);
                    tile_index.insert(tile.clone(), tiles.len() - 1);
                    tiles.len() - 1
                }
            };
            counts[index] += 1;

            for direction in &directions {
                let neighbour = space.simplify(&(&position + direction));
                let Some(adjacent) = sample.get(&neighbour) else {
                    continue;
                };
                rules.insert(TilingRule::new(
                    tile.clone(),
                    adjacent.clone(),
                    direction.clone(),
                ));
                rules.insert(TilingRule::new(adjacent.clone(), tile.clone(), -direction));
            }
        }

        if tiles.is_empty() {
            return Err(AnalysisError::EmptySample);
        }

        Ok(Self::build(
            direction_space,
            directions,
            rules,
            tiles,
            tile_index,
            counts,
        ))
    }

    /// Builds an analysis from explicit rules and tile counts.
    ///
    /// Rules are deduplicated; no inverses are added on this path, so a caller
    /// wanting symmetric adjacencies states both sides. Tile interning follows
    /// the iteration order of `tile_counts`, which keeps runs over the same
    /// inputs reproducible; repeated tiles have their counts summed.
    ///
    /// # Errors
    /// - [`AnalysisError::DimensionMismatch`] when a rule direction has a
    ///   different dimension count than `space`.
    /// - [`AnalysisError::InvalidDirection`] when a rule direction leaves the
    ///   `[-1, +1]` direction space derived from `space`.
    /// - [`AnalysisError::UnknownTile`] when a rule references a tile missing
    ///   from `tile_counts`.
    /// - [`AnalysisError::ZeroWeight`] on a zero count.
    /// - [`AnalysisError::EmptySample`] when `tile_counts` is empty.
    pub fn from_explicit(
        space: &MultiSpace,
        rules: impl IntoIterator<Item = TilingRule<T>>,
        tile_counts: impl IntoIterator<Item = (T, u32)>,
    ) -> Result<Self, AnalysisError> {
        let direction_space = Self::direction_space_for(space);
        let directions = Self::enumerate_directions(&direction_space);

        let mut tiles: Vec<T> = Vec::new();
        let mut tile_index: HashMap<T, usize> = HashMap::new();
        let mut counts: Vec<u32> = Vec::new();
        for (tile, count) in tile_counts {
            if count == 0 {
                return Err(AnalysisError::ZeroWeight);
            }
            match tile_index.get(&tile) {
                Some(index) => counts[*index] += count,
                None => {
                    tile_index.insert(tile.clone(), tiles.len());
                    tiles.push(tile);
                    counts.push(count);
                }
            }
        }
        if tiles.is_empty() {
            return Err(AnalysisError::EmptySample);
        }

        let mut rule_set: HashSet<TilingRule<T>> = HashSet::new();
        for rule in rules {
            if rule.direction().dims() != space.dims() {
                return Err(AnalysisError::DimensionMismatch {
                    expected: space.dims(),
                    found: rule.direction().dims(),
                });
            }
            if direction_space.flat_index(rule.direction()).is_none() {
                return Err(AnalysisError::InvalidDirection {
                    direction: rule.direction().clone(),
                });
            }
            if !tile_index.contains_key(rule.origin()) || !tile_index.contains_key(rule.adjacent())
            {
                return Err(AnalysisError::UnknownTile);
            }
            rule_set.insert(rule);
        }

        Ok(Self::build(
            direction_space,
            directions,
            rule_set,
            tiles,
            tile_index,
            counts,
        ))
    }

    /// Clamps every axis of the space to `[-1, +1]` - `[0, 0]` where the space
    /// is degenerate along the axis - keeping the periodicity flags.
    fn direction_space_for(space: &MultiSpace) -> MultiSpace {
        let extent = |d: usize| i64::from(space.range(d) > 1);
        let min = (0..space.dims()).map(|d| -extent(d)).collect::<MultiVector>();
        let max = (0..space.dims()).map(extent).collect::<MultiVector>();
        let periodic = (0..space.dims())
            .map(|d| space.is_periodic(d))
            .collect::<Vec<_>>();
        MultiSpace::new(min, max, periodic).expect("clamped direction bounds are always valid")
    }

    fn enumerate_directions(direction_space: &MultiSpace) -> Vec<MultiVector> {
        direction_space
            .points()
            .filter(|direction| !direction.is_zero())
            .collect()
    }

    fn build(
        direction_space: MultiSpace,
        directions: Vec<MultiVector>,
        rules: HashSet<TilingRule<T>>,
        tiles: Vec<T>,
        tile_index: HashMap<T, usize>,
        counts: Vec<u32>,
    ) -> Self {
        let dir_index: HashMap<MultiVector, usize> = directions
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, direction)| (direction, index))
            .collect();
        let opposite: Vec<usize> = directions
            .iter()
            .map(|direction| dir_index[&-direction])
            .collect();

        let mut enabled = vec![vec![Vec::new(); directions.len()]; tiles.len()];
        let mut initial_ways = vec![vec![0i32; directions.len()]; tiles.len()];
        for rule in &rules {
            let origin = tile_index[rule.origin()];
            let adjacent = tile_index[rule.adjacent()];
            let direction = dir_index[rule.direction()];
            enabled[origin][direction].push(adjacent);
            initial_ways[adjacent][opposite[direction]] += 1;
        }
        // Rule iteration order is arbitrary; sorted lists keep propagation deterministic.
        for per_tile in &mut enabled {
            for list in per_tile {
                list.sort_unstable();
            }
        }

        let weights: Vec<TileWeights> = counts.into_iter().map(TileWeights::new).collect();
        let mut total_weight = TileWeights::default();
        for weight in &weights {
            total_weight += *weight;
        }
        let max_entropy = calc_entropy(total_weight);

        Self {
            direction_space,
            directions,
            opposite,
            rules,
            tiles,
            tile_index,
            weights,
            total_weight,
            max_entropy,
            enabled,
            initial_ways,
        }
    }

    /// Returns the `[-1, +1]` space enumerating the adjacency offsets.
    pub fn direction_space(&self) -> &MultiSpace {
        &self.direction_space
    }

    /// Iterates over the deduplicated ruleset, in no particular order.
    pub fn rules(&self) -> impl Iterator<Item = &TilingRule<T>> {
        self.rules.iter()
    }

    /// Checks ruleset membership.
    pub fn contains_rule(&self, rule: &TilingRule<T>) -> bool {
        self.rules.contains(rule)
    }

    /// Returns the number of distinct rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns every known tile, in interning order.
    pub fn tiles(&self) -> &[T] {
        &self.tiles
    }

    /// Returns the number of distinct tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Returns the weight of a tile, `None` for tiles the analysis never saw.
    pub fn weight_of(&self, tile: &T) -> Option<u32> {
        self.tile_index
            .get(tile)
            .map(|index| self.weights[*index].0)
    }

    /// Returns the summed weight of all tiles.
    pub fn total_weight(&self) -> TileWeights {
        self.total_weight
    }

    /// Returns the entropy of the full tile multiset - the entropy every
    /// wave node starts from.
    pub fn max_entropy(&self) -> f64 {
        self.max_entropy
    }

    pub(crate) fn tile_idx(&self, tile: &T) -> Option<usize> {
        self.tile_index.get(tile).copied()
    }

    pub(crate) fn directions(&self) -> &[MultiVector] {
        &self.directions
    }

    pub(crate) fn opposite_of(&self, direction: usize) -> usize {
        self.opposite[direction]
    }

    pub(crate) fn enabled_in_direction(&self, tile: usize, direction: usize) -> &[usize] {
        &self.enabled[tile][direction]
    }

    pub(crate) fn weights_table(&self) -> &[TileWeights] {
        &self.weights
    }

    pub(crate) fn initial_ways(&self) -> &[Vec<i32>] {
        &self.initial_ways
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::core::{MultiArray, MultiDict, MultiSpace, MultiVector};

    use super::super::error::AnalysisError;
    use super::super::rules::TilingRule;
    use super::{calc_entropy, TileWeights, TilingAnalysis};

    fn alternating_sample() -> MultiArray<char> {
        let space = MultiSpace::from_lengths(&[6], false).unwrap();
        MultiArray::from_values(space, vec!['a', 'b', 'a', 'b', 'a', 'b']).unwrap()
    }

    #[test]
    fn learns_alternation_rules_exactly() {
        let analysis = TilingAnalysis::from_sample(&alternating_sample()).unwrap();

        let expected = [
            TilingRule::new('a', 'b', MultiVector::from([1])),
            TilingRule::new('b', 'a', MultiVector::from([1])),
            TilingRule::new('a', 'b', MultiVector::from([-1])),
            TilingRule::new('b', 'a', MultiVector::from([-1])),
        ];
        assert_eq!(analysis.rule_count(), expected.len());
        for rule in &expected {
            assert!(analysis.contains_rule(rule), "missing rule {rule:?}");
        }

        assert_eq!(analysis.weight_of(&'a'), Some(3));
        assert_eq!(analysis.weight_of(&'b'), Some(3));
        assert_eq!(analysis.weight_of(&'c'), None);
        assert_eq!(analysis.total_weight().0, 6);
    }

    #[test]
    fn every_observed_adjacency_becomes_a_rule_with_inverse() {
        let space = MultiSpace::from_lengths(&[3, 3], false).unwrap();
        let sample = MultiArray::from_fn(space, |position| {
            ((position[0] * 3 + position[1]) % 4) as u8
        });
        let analysis = TilingAnalysis::from_sample(&sample).unwrap();

        for position in sample.space().points() {
            for direction in analysis.direction_space().points() {
                if direction.is_zero() {
                    continue;
                }
                let neighbour = &position + &direction;
                let Some(adjacent) = sample.get(&neighbour) else {
                    continue;
                };
                let rule = TilingRule::new(sample[&position], *adjacent, direction);
                assert!(analysis.contains_rule(&rule), "missing rule {rule:?}");
            }
        }

        for rule in analysis.rules() {
            assert!(
                analysis.contains_rule(&rule.inverse()),
                "missing inverse of {rule:?}"
            );
        }
    }

    #[test]
    fn single_tile_sample_has_zero_entropy() {
        let space = MultiSpace::from_lengths(&[5], false).unwrap();
        let sample = MultiArray::filled_with(space, || 'x');
        let analysis = TilingAnalysis::from_sample(&sample).unwrap();

        assert_eq!(analysis.weight_of(&'x'), Some(5));
        assert!(analysis.max_entropy().abs() < 1e-9);
    }

    #[test]
    fn degenerate_axes_drop_out_of_the_direction_space() {
        let space = MultiSpace::from_lengths(&[1, 3], false).unwrap();
        let sample = MultiArray::from_fn(space, |position| position[1]);
        let analysis = TilingAnalysis::from_sample(&sample).unwrap();

        let directions = analysis
            .direction_space()
            .points()
            .filter(|d| !d.is_zero())
            .collect::<Vec<_>>();
        assert_eq!(
            directions,
            vec![MultiVector::from([0, -1]), MultiVector::from([0, 1])]
        );
    }

    #[test]
    fn periodic_sample_wraps_adjacencies() {
        let space = MultiSpace::from_lengths(&[3], true).unwrap();
        let sample = MultiArray::from_values(space, vec!['a', 'b', 'c']).unwrap();
        let analysis = TilingAnalysis::from_sample(&sample).unwrap();

        assert!(analysis.contains_rule(&TilingRule::new('c', 'a', MultiVector::from([1]))));
        assert!(analysis.contains_rule(&TilingRule::new('a', 'c', MultiVector::from([-1]))));
        assert_eq!(analysis.rule_count(), 6);
    }

    #[test]
    fn sparse_samples_skip_absent_cells() {
        let space = MultiSpace::from_lengths(&[4], false).unwrap();
        let mut sample = MultiDict::new(space);
        sample.insert(MultiVector::from([0]), 'a');
        sample.insert(MultiVector::from([1]), 'b');
        sample.insert(MultiVector::from([3]), 'c');

        let analysis = TilingAnalysis::from_sample(&sample).unwrap();
        assert_eq!(analysis.weight_of(&'c'), Some(1));
        assert_eq!(analysis.rule_count(), 2);
        assert!(analysis.contains_rule(&TilingRule::new('a', 'b', MultiVector::from([1]))));
        assert!(analysis.contains_rule(&TilingRule::new('b', 'a', MultiVector::from([-1]))));
    }

    #[test]
    fn empty_sample_is_rejected() {
        let space = MultiSpace::from_lengths(&[4], false).unwrap();
        let sample = MultiDict::<char>::new(space);
        assert_eq!(
            TilingAnalysis::from_sample(&sample).unwrap_err(),
            AnalysisError::EmptySample
        );
    }

    #[test]
    fn explicit_rules_are_deduplicated_without_inverses() {
        let space = MultiSpace::from_lengths(&[8], false).unwrap();
        let rule = TilingRule::new('a', 'b', MultiVector::from([1]));
        let analysis = TilingAnalysis::from_explicit(
            &space,
            vec![rule.clone(), rule.clone()],
            vec![('a', 2), ('b', 1)],
        )
        .unwrap();

        assert_eq!(analysis.rule_count(), 1);
        assert!(analysis.contains_rule(&rule));
        assert!(!analysis.contains_rule(&rule.inverse()));
    }

    #[test]
    fn explicit_construction_validates_inputs() {
        let space = MultiSpace::from_lengths(&[8], false).unwrap();

        assert_eq!(
            TilingAnalysis::from_explicit(
                &space,
                vec![TilingRule::new('a', 'b', MultiVector::from([1, 0]))],
                vec![('a', 1), ('b', 1)],
            )
            .unwrap_err(),
            AnalysisError::DimensionMismatch {
                expected: 1,
                found: 2
            }
        );
        assert_eq!(
            TilingAnalysis::from_explicit(
                &space,
                vec![TilingRule::new('a', 'b', MultiVector::from([2]))],
                vec![('a', 1), ('b', 1)],
            )
            .unwrap_err(),
            AnalysisError::InvalidDirection {
                direction: MultiVector::from([2])
            }
        );
        assert_eq!(
            TilingAnalysis::from_explicit(
                &space,
                vec![TilingRule::new('a', 'z', MultiVector::from([1]))],
                vec![('a', 1), ('b', 1)],
            )
            .unwrap_err(),
            AnalysisError::UnknownTile
        );
        assert_eq!(
            TilingAnalysis::<char>::from_explicit(&space, vec![], vec![('a', 0)]).unwrap_err(),
            AnalysisError::ZeroWeight
        );
        assert_eq!(
            TilingAnalysis::<char>::from_explicit(&space, vec![], vec![]).unwrap_err(),
            AnalysisError::EmptySample
        );
    }

    #[test]
    fn repeated_explicit_tiles_sum_their_counts() {
        let space = MultiSpace::from_lengths(&[8], false).unwrap();
        let analysis =
            TilingAnalysis::from_explicit(&space, vec![], vec![('a', 2), ('a', 3)]).unwrap();

        assert_eq!(analysis.weight_of(&'a'), Some(5));
        assert_eq!(analysis.tile_count(), 1);
    }

    #[test]
    fn entropy_matches_weight_log_form() {
        let weights = [TileWeights::new(1), TileWeights::new(2), TileWeights::new(3)];
        let mut total = TileWeights::default();
        for weight in weights {
            total += weight;
        }

        let sum = 6.0f64;
        let log_sum = 2.0 * 2.0f64.ln() + 3.0 * 3.0f64.ln();
        assert!((total.1 - log_sum).abs() < 1e-12);
        assert!((calc_entropy(total) - (sum.ln() - log_sum / sum)).abs() < 1e-12);
    }

    #[test]
    fn opposite_direction_table_is_consistent() {
        let space = MultiSpace::from_lengths(&[3, 3], false).unwrap();
        let sample = MultiArray::filled_with(space, || 0u8);
        let analysis = TilingAnalysis::from_sample(&sample).unwrap();

        let directions = analysis.directions();
        assert_eq!(directions.len(), 8);
        let unique = directions.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), 8);
        for (index, direction) in directions.iter().enumerate() {
            assert_eq!(&directions[analysis.opposite_of(index)], &-direction);
        }
    }
}
