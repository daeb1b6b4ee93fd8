//! EC public keys.
//!
//! The subjectPublicKey is the uncompressed point `0x04 || X || Y`
//! (SEC 1 Section 2.3.3) and the algorithm is `id-ecPublicKey` with the
//! named curve OID as parameters (RFC 5480 Section 2.1.1).

use der::Der;
use jwkpem::encoder::{EncodableTo, Encoder};
use log::debug;

use crate::algorithm::ec_algorithm_identifier;
use crate::base64url::decode_parameter;
use crate::error::ConversionError;
use crate::key::EcPublicJwk;

const UNCOMPRESSED: u8 = 0x04;

impl EcPublicJwk {
    /// Uncompressed point. Coordinate lengths are taken as given.
    pub fn point(&self) -> Result<Vec<u8>, ConversionError> {
        let (x, y) = self.coordinates()?;
        Ok(uncompressed_point(&x, &y))
    }

    /// SubjectPublicKeyInfo, rejecting coordinates that are not exactly the
    /// curve's field size.
    pub fn encode_strict(&self) -> Result<Der, ConversionError> {
        let (x, y) = self.coordinates()?;
        let expected = self.crv().coordinate_size();
        for (parameter, coordinate) in [("x", &x), ("y", &y)] {
            if coordinate.len() != expected {
                return Err(ConversionError::CoordinateLength {
                    curve: self.crv(),
                    parameter,
                    expected,
                    actual: coordinate.len(),
                });
            }
        }
        Ok(self.spki(&uncompressed_point(&x, &y)))
    }

    fn coordinates(&self) -> Result<(Vec<u8>, Vec<u8>), ConversionError> {
        let x = decode_parameter("x", self.x())?;
        let y = decode_parameter("y", self.y())?;
        debug!(
            "{} coordinates are {} and {} bytes",
            self.crv(),
            x.len(),
            y.len()
        );
        Ok((x, y))
    }

    fn spki(&self, point: &[u8]) -> Der {
        Der::sequence(&[
            ec_algorithm_identifier(self.crv()),
            Der::bit_string(point),
        ])
    }
}

fn uncompressed_point(x: &[u8], y: &[u8]) -> Vec<u8> {
    let mut point = Vec::with_capacity(1 + x.len() + y.len());
    point.push(UNCOMPRESSED);
    point.extend_from_slice(x);
    point.extend_from_slice(y);
    point
}

impl EncodableTo<EcPublicJwk> for Der {}

impl Encoder<EcPublicJwk, Der> for EcPublicJwk {
    type Error = ConversionError;

    fn encode(&self) -> Result<Der, Self::Error> {
        Ok(self.spki(&self.point()?))
    }
}
