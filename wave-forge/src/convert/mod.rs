//! Bridges between caller-native containers and the core spatial types.
//!
//! The generator itself only speaks [`MultiArray`] and [`Wave`]; these helpers
//! reshape the two most common native layouts - flat 1-D slices and
//! [`grid::Grid`] 2-D maps - in and out of it. They are thin by design: all
//! semantics stay in the core constructors.

use grid::Grid;

use crate::core::{MultiArray, MultiSpace, MultiVector, SpaceError};
use crate::gen::collapse::{Tile, Wave};

/// Wraps a flat slice into a 1-D sample.
///
/// # Errors
/// [`SpaceError::RangeInverted`] on an empty slice.
pub fn sample_from_slice<T: Tile>(values: &[T], periodic: bool) -> Result<MultiArray<T>, SpaceError> {
    let space = MultiSpace::from_lengths(&[values.len()], periodic)?;
    MultiArray::from_values(space, values.to_vec())
}

/// Projects a fully collapsed 1-D wave back onto a flat vector.
///
/// Returns `None` while any cell holds more or fewer than one possibility.
///
/// # Panics
/// Panics if the wave does not span a 1-D space.
pub fn slice_from_wave<T: Tile>(wave: &Wave<'_, T>) -> Option<Vec<T>> {
    assert_eq!(wave.space().dims(), 1, "expected a wave over a 1-D space");
    wave.collapsed().map(|array| array.values().to_vec())
}

/// Wraps a [`grid::Grid`] into a 2-D sample; rows map to axis 0, columns to
/// axis 1.
///
/// # Errors
/// [`SpaceError::RangeInverted`] on an empty grid.
pub fn sample_from_grid<T: Tile>(
    source: &Grid<T>,
    periodic: [bool; 2],
) -> Result<MultiArray<T>, SpaceError> {
    let space = MultiSpace::new(
        MultiVector::from([0, 0]),
        MultiVector::from([source.rows() as i64 - 1, source.cols() as i64 - 1]),
        periodic.to_vec(),
    )?;
    // Grid iterates row-major, exactly the space's enumeration order.
    MultiArray::from_values(space, source.iter().cloned().collect())
}

/// Projects a fully collapsed 2-D wave back onto a [`grid::Grid`].
///
/// Returns `None` while any cell holds more or fewer than one possibility.
///
/// # Panics
/// Panics if the wave does not span a 2-D space.
pub fn grid_from_wave<T: Tile>(wave: &Wave<'_, T>) -> Option<Grid<T>> {
    assert_eq!(wave.space().dims(), 2, "expected a wave over a 2-D space");
    let collapsed = wave.collapsed()?;
    let cols = wave.space().range(1) as usize;
    Some(Grid::from_vec(collapsed.values().to_vec(), cols))
}
