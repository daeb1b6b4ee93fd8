//! Decoder trait for type-safe conversions.
//!
//! `Decoder<T, D>` turns a source `T` into a destination `D`. The destination
//! must opt in with `DecodableFrom<T>`, so only declared conversions compile.
//!
//! # Implementation Guide
//!
//! ```no_run
//! use jwkpem::decoder::{Decoder, DecodableFrom};
//!
//! struct Text(String);
//! struct Bytes(Vec<u8>);
//!
//! #[derive(Debug)]
//! struct MyError;
//!
//! impl DecodableFrom<Text> for Bytes {}
//!
//! impl Decoder<Text, Bytes> for Text {
//!     type Error = MyError;
//!
//!     fn decode(&self) -> Result<Bytes, Self::Error> {
//!         Ok(Bytes(self.0.as_bytes().to_vec()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type. In this workspace it reads JSON text into
/// a `JsonWebKey`, PEM into DER bytes, and DER bytes into a `Tlv` tree.
///
/// ```ignore
/// use jwkpem::decoder::Decoder;
/// use jwk::JsonWebKey;
///
/// let key: JsonWebKey = r#"{"kty":"RSA","n":"AQAB","e":"AQAB"}"#.decode()?;
/// ```
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is not a valid representation of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// It has no methods. It exists so the compiler rejects a `decode` call
/// between two types nobody declared convertible.
pub trait DecodableFrom<T> {}
