//! Encoder trait, the reverse direction of [`crate::decoder`].

/// Encoder trait for converting from type `T` to type `E`.
///
/// Implemented by the source type. Key models encode into DER through it.
pub trait Encoder<T, E: EncodableTo<T>> {
    type Error;

    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that type `E` can be encoded from type `T`.
pub trait EncodableTo<T> {}
