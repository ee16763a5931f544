use crate::core::error::SpaceError;
use crate::core::vector::MultiVector;

/// Axis-aligned box in ℤⁿ with per-axis periodicity.
///
/// The space is immutable: per-axis `ranges`, the row-major `strides` (last axis
/// innermost) and the total `point_count` are derived once at construction.
/// Cells are addressed either by [`MultiVector`] coordinates or by their flat
/// index in enumeration order, and the two addressings are bijective over the
/// in-range coordinates.
///
/// # Examples
/// ```
/// use wave_forge::{MultiSpace, MultiVector};
///
/// let space = MultiSpace::from_lengths(&[3, 4], true).unwrap();
/// assert_eq!(space.point_count(), 12);
///
/// // Periodic axes wrap with a true mathematical modulus.
/// let wrapped = space.simplify(&MultiVector::from([-1, 5]));
/// assert_eq!(wrapped, MultiVector::from([2, 1]));
/// assert!(space.in_bounds(&MultiVector::from([-10, 40])));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiSpace {
    min: MultiVector,
    max: MultiVector,
    periodic: Box<[bool]>,
    ranges: Box<[i64]>,
    strides: Box<[i64]>,
    point_count: usize,
}

impl MultiSpace {
    /// Creates a space from its inclusive bounds and per-axis periodicity flags.
    ///
    /// # Errors
    /// - [`SpaceError::DimensionMismatch`] if `min`, `max` and `periodic` disagree in length.
    /// - [`SpaceError::RangeInverted`] if `min[d] > max[d]` on any axis.
    pub fn new(
        min: MultiVector,
        max: MultiVector,
        periodic: impl Into<Box<[bool]>>,
    ) -> Result<Self, SpaceError> {
        let periodic = periodic.into();
        if min.dims() != max.dims() {
            return Err(SpaceError::DimensionMismatch {
                expected: min.dims(),
                found: max.dims(),
            });
        }
        if periodic.len() != min.dims() {
            return Err(SpaceError::DimensionMismatch {
                expected: min.dims(),
                found: periodic.len(),
            });
        }
        for axis in 0..min.dims() {
            if min[axis] > max[axis] {
                return Err(SpaceError::RangeInverted {
                    axis,
                    min: min[axis],
                    max: max[axis],
                });
            }
        }

        let ranges: Box<[i64]> = (0..min.dims()).map(|d| max[d] - min[d] + 1).collect();
        let mut strides = vec![1i64; ranges.len()];
        for d in (0..ranges.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * ranges[d + 1];
        }
        let point_count = ranges.iter().product::<i64>() as usize;

        Ok(Self {
            min,
            max,
            periodic,
            ranges,
            strides: strides.into(),
            point_count,
        })
    }

    /// Creates a zero-based space with the given axis lengths and uniform periodicity.
    ///
    /// # Errors
    /// [`SpaceError::RangeInverted`] if any length is zero.
    pub fn from_lengths(lengths: &[usize], periodic: bool) -> Result<Self, SpaceError> {
        let min = MultiVector::zero(lengths.len());
        let max = lengths
            .iter()
            .map(|len| *len as i64 - 1)
            .collect::<MultiVector>();
        Self::new(min, max, vec![periodic; lengths.len()])
    }

    /// Returns the number of axes.
    pub fn dims(&self) -> usize {
        self.min.dims()
    }

    /// Returns the inclusive lower bound.
    pub fn min(&self) -> &MultiVector {
        &self.min
    }

    /// Returns the inclusive upper bound.
    pub fn max(&self) -> &MultiVector {
        &self.max
    }

    /// Checks whether the given axis wraps.
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    /// Returns the extent of the given axis.
    pub fn range(&self, axis: usize) -> i64 {
        self.ranges[axis]
    }

    /// Returns the total number of cells.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Checks whether the position addresses a cell of this space.
    ///
    /// Positions with a different dimension count never do. Periodic axes accept
    /// any integer (the coordinate wraps), non-periodic axes require the
    /// coordinate to lie within `[min, max]`.
    pub fn in_bounds(&self, position: &MultiVector) -> bool {
        if position.dims() != self.dims() {
            return false;
        }
        (0..self.dims()).all(|d| {
            self.periodic[d] || (self.min[d] <= position[d] && position[d] <= self.max[d])
        })
    }

    /// Wraps the position into storage range along every periodic axis.
    ///
    /// Uses the euclidean remainder, so the wrapped coordinate lands in
    /// `[min, max]` for arbitrarily negative inputs. Non-periodic axes pass
    /// through untouched; callers check those with [`in_bounds`](Self::in_bounds)
    /// or [`flat_index`](Self::flat_index).
    ///
    /// # Panics
    /// Panics if the dimension counts differ.
    pub fn simplify(&self, position: &MultiVector) -> MultiVector {
        assert_eq!(
            position.dims(),
            self.dims(),
            "dimension mismatch between position and space"
        );
        (0..self.dims())
            .map(|d| {
                if self.periodic[d] {
                    (position[d] - self.min[d]).rem_euclid(self.ranges[d]) + self.min[d]
                } else {
                    position[d]
                }
            })
            .collect()
    }

    /// Returns the flat index of an in-range position.
    ///
    /// `None` if the position is not within `[min, max]` on every axis - for
    /// periodic axes, wrap with [`simplify`](Self::simplify) first. Together with
    /// [`coords`](Self::coords) this forms a bijection between the cells and
    /// `[0, point_count)`.
    pub fn flat_index(&self, position: &MultiVector) -> Option<usize> {
        if position.dims() != self.dims() {
            return None;
        }
        let mut index = 0i64;
        for d in 0..self.dims() {
            if position[d] < self.min[d] || position[d] > self.max[d] {
                return None;
            }
            index += (position[d] - self.min[d]) * self.strides[d];
        }
        Some(index as usize)
    }

    /// Decodes a flat index back into its position.
    ///
    /// # Panics
    /// Panics if `index >= point_count`.
    pub fn coords(&self, index: usize) -> MultiVector {
        assert!(
            index < self.point_count,
            "flat index {index} outside of space with {} cells",
            self.point_count
        );
        let mut remainder = index as i64;
        (0..self.dims())
            .map(|d| {
                let component = self.min[d] + remainder / self.strides[d];
                remainder %= self.strides[d];
                component
            })
            .collect()
    }

    /// Enumerates every cell, first axis varying slowest.
    ///
    /// The order matches the flat indexing and is a public contract:
    /// [`MultiArray::from_values`](crate::core::MultiArray::from_values) consumes
    /// flat sequences in exactly this order.
    pub fn points(&self) -> impl ExactSizeIterator<Item = MultiVector> + '_ {
        (0..self.point_count).map(|index| self.coords(index))
    }
}
