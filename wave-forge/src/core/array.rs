use std::ops::{Index, IndexMut};

use crate::core::collection::MultiCollection;
use crate::core::error::SpaceError;
use crate::core::space::MultiSpace;
use crate::core::vector::MultiVector;

/// Dense value storage covering every cell of a [`MultiSpace`].
///
/// Backed by a flat `Vec` in the space's enumeration order, so coordinate
/// access is a stride multiplication away. Cloning deep-copies the values,
/// which is how the wave allocates its per-cell nodes from a single prototype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiArray<V> {
    space: MultiSpace,
    values: Vec<V>,
}

impl<V> MultiArray<V> {
    /// Creates an array with every cell set to the default value.
    pub fn filled_default(space: MultiSpace) -> Self
    where
        V: Default,
    {
        Self::filled_with(space, V::default)
    }

    /// Creates an array filling every cell from the provided thunk.
    pub fn filled_with(space: MultiSpace, mut fill: impl FnMut() -> V) -> Self {
        let values = (0..space.point_count()).map(|_| fill()).collect();
        Self { space, values }
    }

    /// Creates an array computing every cell value from its position.
    pub fn from_fn(space: MultiSpace, mut fill: impl FnMut(&MultiVector) -> V) -> Self {
        let values = space.points().map(|position| fill(&position)).collect();
        Self { space, values }
    }

    /// Creates an array from a flat value sequence in enumeration order
    /// (first axis slowest, exactly [`MultiSpace::points`]).
    ///
    /// # Errors
    /// [`SpaceError::DimensionMismatch`] when the sequence does not hold exactly
    /// [`MultiSpace::point_count`] values.
    pub fn from_values(space: MultiSpace, values: Vec<V>) -> Result<Self, SpaceError> {
        if values.len() != space.point_count() {
            return Err(SpaceError::DimensionMismatch {
                expected: space.point_count(),
                found: values.len(),
            });
        }
        Ok(Self { space, values })
    }

    /// Returns the space the array spans.
    pub fn space(&self) -> &MultiSpace {
        &self.space
    }

    /// Returns the value at an in-range position.
    ///
    /// Wrap periodic coordinates with [`MultiSpace::simplify`] first; positions
    /// outside storage range read as `None`.
    pub fn get(&self, position: &MultiVector) -> Option<&V> {
        self.space
            .flat_index(position)
            .map(|index| &self.values[index])
    }

    /// Returns the mutable value at an in-range position.
    pub fn get_mut(&mut self, position: &MultiVector) -> Option<&mut V> {
        self.space
            .flat_index(position)
            .map(|index| &mut self.values[index])
    }

    /// Replaces the value at an in-range position.
    ///
    /// Returns `false` without storing when the position is not a cell of the
    /// underlying space.
    pub fn set(&mut self, position: &MultiVector, value: V) -> bool {
        match self.space.flat_index(position) {
            Some(index) => {
                self.values[index] = value;
                true
            }
            None => false,
        }
    }

    /// Iterates over all cells and their values in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (MultiVector, &V)> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (self.space.coords(index), value))
    }

    /// Returns the values as a flat slice in enumeration order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [V] {
        &mut self.values
    }
}

impl<V> Index<&MultiVector> for MultiArray<V> {
    type Output = V;

    /// # Panics
    /// Panics if the position is not a cell of the underlying space.
    fn index(&self, position: &MultiVector) -> &Self::Output {
        self.get(position)
            .expect("position outside of the array space")
    }
}

impl<V> IndexMut<&MultiVector> for MultiArray<V> {
    fn index_mut(&mut self, position: &MultiVector) -> &mut Self::Output {
        self.get_mut(position)
            .expect("position outside of the array space")
    }
}

impl<V> MultiCollection<V> for MultiArray<V> {
    fn space(&self) -> &MultiSpace {
        &self.space
    }

    fn get(&self, position: &MultiVector) -> Option<&V> {
        MultiArray::get(self, position)
    }
}

#[cfg(test)]
mod tests {
    use super::{MultiArray, MultiSpace, MultiVector, SpaceError};

    fn space_2x2() -> MultiSpace {
        MultiSpace::from_lengths(&[2, 2], false).unwrap()
    }

    #[test]
    fn from_fn_sees_each_position() {
        let array = MultiArray::from_fn(space_2x2(), |position| position[0] * 10 + position[1]);

        assert_eq!(array[&MultiVector::from([0, 0])], 0);
        assert_eq!(array[&MultiVector::from([0, 1])], 1);
        assert_eq!(array[&MultiVector::from([1, 0])], 10);
        assert_eq!(array[&MultiVector::from([1, 1])], 11);
    }

    #[test]
    fn from_values_follows_enumeration_order() {
        let array = MultiArray::from_values(space_2x2(), vec!['a', 'b', 'c', 'd']).unwrap();

        assert_eq!(array[&MultiVector::from([0, 1])], 'b');
        assert_eq!(array[&MultiVector::from([1, 0])], 'c');
        assert_eq!(
            array.iter().map(|(_, v)| *v).collect::<String>(),
            "abcd".to_string()
        );
    }

    #[test]
    fn from_values_rejects_wrong_length() {
        assert_eq!(
            MultiArray::from_values(space_2x2(), vec![1, 2, 3]),
            Err(SpaceError::DimensionMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn set_and_get_respect_bounds() {
        let mut array = MultiArray::filled_default(space_2x2());

        assert!(array.set(&MultiVector::from([1, 1]), 7));
        assert_eq!(array.get(&MultiVector::from([1, 1])), Some(&7));
        assert!(!array.set(&MultiVector::from([2, 0]), 9));
        assert_eq!(array.get(&MultiVector::from([2, 0])), None);
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut original = MultiArray::filled_with(space_2x2(), || 1);
        let copied = original.clone();
        original.set(&MultiVector::from([0, 0]), 5);

        assert_eq!(copied[&MultiVector::from([0, 0])], 1);
    }
}
