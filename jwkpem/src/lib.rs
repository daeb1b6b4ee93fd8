//! # jwkpem
//!
//! Core traits for the jwkpem conversion pipeline.
//!
//! This crate defines the `Decoder` and `Encoder` traits that every layer of
//! the workspace uses to move from one representation of a public key to the
//! next.
//!
//! ## Overview
//!
//! A conversion flows like this:
//! ```text
//! JSON text → JsonWebKey → Der → Pem
//! ```
//!
//! Reading a key back (used to verify output) goes the other way:
//! ```text
//! Pem → Vec<u8> → Tlv
//! ```
//!
//! ## Type Safety
//!
//! Both traits are constrained by a marker trait (`DecodableFrom` and
//! `EncodableTo`), so a conversion only exists where a crate has declared it.
//!
//! ## Example
//!
//! ```ignore
//! use jwkpem::decoder::Decoder;
//! use jwkpem::encoder::Encoder;
//! use jwk::JsonWebKey;
//! use der::Der;
//!
//! let json = r#"{"kty":"EC","crv":"P-256","x":"...","y":"..."}"#;
//! let key: JsonWebKey = json.decode()?;
//! let der: Der = key.encode()?;
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
