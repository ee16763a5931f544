//! Core spatial primitives of wave-forge.
//!
//! Everything in the crate addresses cells through these types: [`MultiVector`]
//! is an integer N-tuple, [`MultiSpace`] an axis-aligned box in ℤⁿ with per-axis
//! periodicity, and [`MultiArray`] / [`MultiDict`] dense and sparse value
//! storage over such a box. The dimension count is a runtime property - the
//! same types describe a sample strip, a 2-D map or a voxel volume.

pub(crate) mod array;
pub(crate) mod collection;
pub(crate) mod dict;
pub(crate) mod error;
pub(crate) mod space;
pub(crate) mod vector;

#[doc(inline)]
pub use array::MultiArray;
#[doc(inline)]
pub use collection::MultiCollection;
#[doc(inline)]
pub use dict::MultiDict;
#[doc(inline)]
pub use error::SpaceError;
#[doc(inline)]
pub use space::MultiSpace;
#[doc(inline)]
pub use vector::MultiVector;
