use std::collections::HashMap;

use crate::core::collection::MultiCollection;
use crate::core::space::MultiSpace;
use crate::core::vector::MultiVector;

/// Sparse value storage keyed by [`MultiSpace`] coordinates.
///
/// Positions without an entry read as `None`; removing an entry returns the
/// position to that state. Keys are stored exactly as inserted - wrap periodic
/// coordinates with [`MultiSpace::simplify`] before use, the same contract the
/// dense [`MultiArray`](crate::core::MultiArray) follows.
#[derive(Clone, Debug)]
pub struct MultiDict<V> {
    space: MultiSpace,
    entries: HashMap<MultiVector, V>,
}

impl<V> MultiDict<V> {
    /// Creates an empty dict over the space.
    pub fn new(space: MultiSpace) -> Self {
        Self {
            space,
            entries: HashMap::new(),
        }
    }

    /// Returns the space the dict spans.
    pub fn space(&self) -> &MultiSpace {
        &self.space
    }

    /// Returns the number of occupied positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether no position is occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value stored at the position.
    pub fn get(&self, position: &MultiVector) -> Option<&V> {
        self.entries.get(position)
    }

    /// Stores a value at an in-range position, replacing any previous entry.
    ///
    /// Returns `false` without storing when the position is not a cell of the
    /// underlying space.
    pub fn insert(&mut self, position: MultiVector, value: V) -> bool {
        if self.space.flat_index(&position).is_none() {
            return false;
        }
        self.entries.insert(position, value);
        true
    }

    /// Removes and returns the value stored at the position.
    pub fn remove(&mut self, position: &MultiVector) -> Option<V> {
        self.entries.remove(position)
    }

    /// Iterates over the occupied positions and their values, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&MultiVector, &V)> {
        self.entries.iter()
    }
}

impl<V> MultiCollection<V> for MultiDict<V> {
    fn space(&self) -> &MultiSpace {
        &self.space
    }

    fn get(&self, position: &MultiVector) -> Option<&V> {
        MultiDict::get(self, position)
    }
}
