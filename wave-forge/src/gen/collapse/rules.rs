use crate::core::MultiVector;

/// Directed adjacency fact: `origin` may appear with `adjacent` placed at the
/// non-zero offset `direction`.
///
/// Rules compare structurally, so the rule set deduplicates facts learned from
/// repeated sample neighbourhoods. A rule states one side of an allowance only;
/// the [`inverse`](TilingRule::inverse) states the same pair as seen from the
/// adjacent cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilingRule<T> {
    origin: T,
    adjacent: T,
    direction: MultiVector,
}

impl<T> TilingRule<T> {
    /// Creates a rule from its parts.
    ///
    /// # Panics
    /// Panics if `direction` is the zero offset - a tile is never its own neighbour.
    pub fn new(origin: T, adjacent: T, direction: MultiVector) -> Self {
        assert!(
            !direction.is_zero(),
            "a rule direction must be a non-zero offset"
        );
        Self {
            origin,
            adjacent,
            direction,
        }
    }

    /// Returns the tile the rule is stated from.
    pub fn origin(&self) -> &T {
        &self.origin
    }

    /// Returns the tile allowed next to the origin.
    pub fn adjacent(&self) -> &T {
        &self.adjacent
    }

    /// Returns the offset from the origin cell to the adjacent cell.
    pub fn direction(&self) -> &MultiVector {
        &self.direction
    }
}

impl<T: Clone> TilingRule<T> {
    /// Returns the same adjacency as seen from the adjacent cell:
    /// `(adjacent, origin, -direction)`.
    pub fn inverse(&self) -> Self {
        Self {
            origin: self.adjacent.clone(),
            adjacent: self.origin.clone(),
            direction: -&self.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{MultiVector, TilingRule};

    #[test]
    fn inverse_swaps_tiles_and_negates_direction() {
        let rule = TilingRule::new('a', 'b', MultiVector::from([1, -1]));
        let inverse = rule.inverse();

        assert_eq!(inverse.origin(), &'b');
        assert_eq!(inverse.adjacent(), &'a');
        assert_eq!(inverse.direction(), &MultiVector::from([-1, 1]));
        assert_eq!(inverse.inverse(), rule);
    }

    #[test]
    fn structural_equality_deduplicates() {
        let mut rules = HashSet::new();
        rules.insert(TilingRule::new('a', 'b', MultiVector::from([1])));
        rules.insert(TilingRule::new('a', 'b', MultiVector::from([1])));
        rules.insert(TilingRule::new('b', 'a', MultiVector::from([1])));

        assert_eq!(rules.len(), 2);
        assert!(rules.contains(&TilingRule::new('a', 'b', MultiVector::from([1]))));
    }

    #[test]
    #[should_panic(expected = "non-zero offset")]
    fn zero_direction_rejected() {
        let _ = TilingRule::new('a', 'b', MultiVector::from([0, 0]));
    }
}
