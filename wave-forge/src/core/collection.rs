use crate::core::space::MultiSpace;
use crate::core::vector::MultiVector;

/// Read contract shared by value storage keyed by [`MultiSpace`] coordinates.
///
/// Implemented by the dense [`MultiArray`](crate::core::MultiArray) and the sparse
/// [`MultiDict`](crate::core::MultiDict). Consumers that only sample values - the
/// tiling analyzer first of all - accept any implementor, so a sparse example
/// with holes is as valid an input as a fully populated array.
pub trait MultiCollection<V> {
    /// Returns the space the collection spans.
    fn space(&self) -> &MultiSpace;

    /// Returns the value stored at the position, `None` for absent or
    /// out-of-range positions.
    fn get(&self, position: &MultiVector) -> Option<&V>;
}
