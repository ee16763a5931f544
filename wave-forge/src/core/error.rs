use std::{error::Error, fmt::Display};

/// Error occuring while constructing or populating spatial containers.
///
/// Returned by [`MultiSpace::new`](crate::core::MultiSpace::new) when the bounds and
/// periodicity vectors disagree in length or describe an inverted axis, and by
/// [`MultiArray::from_values`](crate::core::MultiArray::from_values) when the flat
/// value sequence does not cover the space exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// Lengths or dimension counts of the provided components disagree.
    DimensionMismatch { expected: usize, found: usize },
    /// An axis with `min > max`.
    RangeInverted { axis: usize, min: i64, max: i64 },
}

impl Display for SpaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpaceError::DimensionMismatch { expected, found } => write!(
                f,
                "dimension mismatch: expected {expected} components, found {found}"
            ),
            SpaceError::RangeInverted { axis, min, max } => write!(
                f,
                "inverted range on axis {axis}: min ({min}) is greater than max ({max})"
            ),
        }
    }
}

impl Error for SpaceError {}
