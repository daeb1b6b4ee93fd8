//! Distinguished Encoding Rules for public key structures.
//!
//! Building goes bottom-up: primitives are encoded into complete [`Der`]
//! elements, and SEQUENCEs are made by concatenating finished children.
//! Nothing is re-parsed while building.
//!
//! Reading ([`Tlv`]) is the reverse and is used to check what was built.

use jwkpem::decoder::{DecodableFrom, Decoder};
use log::trace;
use nom::{IResult, Parser};

pub mod error;

use error::Error;

const LONG_FORM: u8 = 0x80;
const CONSTRUCTED: u8 = 0x20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tag {
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Sequence,
    Set,
    Unimplemented(u8),
}

impl From<u8> for Tag {
    fn from(value: u8) -> Self {
        match value {
            0x02 => Self::Integer,
            0x03 => Self::BitString,
            0x04 => Self::OctetString,
            0x05 => Self::Null,
            0x06 => Self::ObjectIdentifier,
            0x30 => Self::Sequence,
            0x31 => Self::Set,
            _ => Self::Unimplemented(value),
        }
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        match tag {
            Tag::Integer => 0x02,
            Tag::BitString => 0x03,
            Tag::OctetString => 0x04,
            Tag::Null => 0x05,
            Tag::ObjectIdentifier => 0x06,
            Tag::Sequence => 0x30,
            Tag::Set => 0x31,
            Tag::Unimplemented(v) => v,
        }
    }
}

impl Tag {
    fn is_constructed(&self) -> bool {
        u8::from(*self) & CONSTRUCTED == CONSTRUCTED
    }
}

/// Encode a DER length.
///
/// Lengths below 128 use the short form. Anything larger uses the long form:
/// `0x80 | n` followed by the `n` minimal big-endian bytes of the length.
pub fn encode_length(length: usize) -> Vec<u8> {
    if length < LONG_FORM as usize {
        return vec![length as u8];
    }
    let bytes = length.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[skip..];

    let mut out = Vec::with_capacity(1 + significant.len());
    out.push(LONG_FORM | significant.len() as u8);
    out.extend_from_slice(significant);
    out
}

/// A complete tag-length-value encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    data: Vec<u8>,
}

impl Der {
    /// Wrap bytes that are already a full element, such as a registry OID.
    pub fn from_encoded(data: &[u8]) -> Self {
        Der {
            data: data.to_vec(),
        }
    }

    /// INTEGER from unsigned big-endian magnitude bytes.
    ///
    /// A `0x00` is prepended when the high bit of the first byte is set so the
    /// value stays non-negative.
    pub fn integer(magnitude: &[u8]) -> Result<Self, Error> {
        let first = magnitude.first().ok_or(Error::EmptyInteger)?;
        if first & 0x80 != 0 {
            Ok(Self::tlv(Tag::Integer, &[&[0x00], magnitude]))
        } else {
            Ok(Self::tlv(Tag::Integer, &[magnitude]))
        }
    }

    /// BIT STRING over whole bytes; the unused-bits octet is always zero.
    pub fn bit_string(bytes: &[u8]) -> Self {
        Self::tlv(Tag::BitString, &[&[0x00], bytes])
    }

    /// SEQUENCE of already encoded children, kept in the given order.
    pub fn sequence(children: &[Der]) -> Self {
        let parts = children.iter().map(Der::as_bytes).collect::<Vec<_>>();
        Self::tlv(Tag::Sequence, &parts)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn tlv(tag: Tag, content: &[&[u8]]) -> Self {
        let content_len = content.iter().map(|c| c.len()).sum();
        let length = encode_length(content_len);

        let mut data = Vec::with_capacity(1 + length.len() + content_len);
        data.push(u8::from(tag));
        data.extend_from_slice(&length);
        for part in content {
            data.extend_from_slice(part);
        }
        trace!("built {:?}: {} content bytes", tag, content_len);
        Der { data }
    }
}

impl AsRef<[u8]> for Der {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// A parsed element. Constructed elements hold their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    length: usize,
    value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Tlv(Vec<Tlv>),
    Data(Vec<u8>),
}

impl Tlv {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Content octets of a primitive element.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Data(data) => Some(data),
            Value::Tlv(_) => None,
        }
    }

    /// Children of a SEQUENCE or SET.
    pub fn children(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Tlv(children) => Some(children),
            Value::Data(_) => None,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Tlv> {
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        let (input, data) = nom::bytes::complete::take(length).parse(input)?;

        if tag.is_constructed() {
            let mut children = Vec::new();
            let mut data = data;
            while !data.is_empty() {
                let (rest, child) = Self::parse(data)?;
                data = rest;
                children.push(child);
            }
            return Ok((
                input,
                Tlv {
                    tag,
                    length,
                    value: Value::Tlv(children),
                },
            ));
        }

        Ok((
            input,
            Tlv {
                tag,
                length,
                value: Value::Data(data.to_vec()),
            },
        ))
    }
}

impl DecodableFrom<&[u8]> for Tlv {}

impl Decoder<&[u8], Tlv> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Tlv, Self::Error> {
        let (rest, tlv) = Tlv::parse(self).map_err(|e| match e {
            nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
            nom::Err::Error(e) | nom::Err::Failure(e) => Error::Parser(e.code),
        })?;
        if !rest.is_empty() {
            return Err(Error::TrailingData(rest.len()));
        }
        Ok(tlv)
    }
}

impl DecodableFrom<Der> for Tlv {}

impl Decoder<Der, Tlv> for Der {
    type Error = Error;

    fn decode(&self) -> Result<Tlv, Self::Error> {
        self.as_bytes().decode()
    }
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag> {
    let (input, n) = nom::number::be_u8().parse(input)?;
    Ok((input, Tag::from(n)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize> {
    let (rest, n) = nom::number::be_u8().parse(input)?;
    if n & LONG_FORM == 0 {
        return Ok((rest, n as usize));
    }
    // long form: the low 7 bits count the length octets that follow
    let count = (n & !LONG_FORM) as usize;
    if count > size_of::<usize>() {
        return Err(nom::Err::Failure(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TooLarge,
        )));
    }
    let (rest, bs) = nom::bytes::complete::take(count).parse(rest)?;
    let length = bs.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
    Ok((rest, length))
}

#[cfg(test)]
mod tests {
    use jwkpem::decoder::Decoder;
    use rstest::rstest;

    use crate::error::Error;
    use crate::{Der, Tag, Tlv, Value, encode_length, parse_length, parse_tag};

    #[rstest(length, expected,
        case(0, vec![0x00]),
        case(5, vec![0x05]),
        case(127, vec![0x7f]),
        case(128, vec![0x81, 0x80]),
        case(255, vec![0x81, 0xff]),
        case(256, vec![0x82, 0x01, 0x00]),
        case(65535, vec![0x82, 0xff, 0xff]),
        case(65536, vec![0x83, 0x01, 0x00, 0x00]),
    )]
    fn test_encode_length(length: usize, expected: Vec<u8>) {
        assert_eq!(expected, encode_length(length));
    }

    #[rstest(input, expected,
        case(vec![0x01], vec![0x02, 0x01, 0x01]),
        case(vec![0x01, 0x00, 0x01], vec![0x02, 0x03, 0x01, 0x00, 0x01]),
        case(vec![0x7f], vec![0x02, 0x01, 0x7f]),
        case(vec![0x80], vec![0x02, 0x02, 0x00, 0x80]),
        case(vec![0xc3, 0x79], vec![0x02, 0x03, 0x00, 0xc3, 0x79]),
        case(vec![0x00, 0x80], vec![0x02, 0x02, 0x00, 0x80]),
    )]
    fn test_integer(input: Vec<u8>, expected: Vec<u8>) {
        let der = Der::integer(&input).unwrap();
        assert_eq!(expected, der.as_bytes());
    }

    #[test]
    fn test_integer_high_bit_adds_one_byte() {
        let mut modulus = vec![0xab; 256];
        modulus[255] = 0x01;
        let der = Der::integer(&modulus).unwrap();

        // tag, 0x82 0x01 0x01, leading zero, modulus
        assert_eq!(&[0x02, 0x82, 0x01, 0x01, 0x00], &der.as_bytes()[..5]);
        assert_eq!(&modulus[..], &der.as_bytes()[5..]);
        assert_eq!(1 + 3 + modulus.len() + 1, der.len());
    }

    #[test]
    fn test_integer_empty() {
        assert_eq!(Err(Error::EmptyInteger), Der::integer(&[]));
    }

    #[rstest(input, expected,
        case(vec![], vec![0x03, 0x01, 0x00]),
        case(vec![0x04, 0x01], vec![0x03, 0x03, 0x00, 0x04, 0x01]),
    )]
    fn test_bit_string(input: Vec<u8>, expected: Vec<u8>) {
        assert_eq!(expected, Der::bit_string(&input).into_bytes());
    }

    #[test]
    fn test_bit_string_long_form() {
        let der = Der::bit_string(&[0x11; 200]);
        assert_eq!(&[0x03, 0x81, 0xc9, 0x00], &der.as_bytes()[..4]);
        assert_eq!(204, der.len());
    }

    #[test]
    fn test_sequence_keeps_order() {
        let oid = Der::from_encoded(&[0x06, 0x03, 0x2a, 0x03, 0x04]);
        let null = Der::from_encoded(&[0x05, 0x00]);
        let seq = Der::sequence(&[oid, null]);
        assert_eq!(
            vec![0x30, 0x07, 0x06, 0x03, 0x2a, 0x03, 0x04, 0x05, 0x00],
            seq.into_bytes()
        );
    }

    #[test]
    fn test_sequence_empty() {
        assert_eq!(vec![0x30, 0x00], Der::sequence(&[]).into_bytes());
    }

    #[rstest(input, expected,
        case(vec![0x02], Tag::Integer),
        case(vec![0x30, 0x01], Tag::Sequence),
        case(vec![0x06, 0x01], Tag::ObjectIdentifier),
        case(vec![0xa0, 0x01], Tag::Unimplemented(0xa0)),
    )]
    fn test_parse_tag(input: Vec<u8>, expected: Tag) {
        let (_, actual) = parse_tag(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case(vec![0x02], 0x02),
        case(vec![0x7f], 0x7f),
        case(vec![0x81, 0x80], 0x80),
        case(vec![0x82, 0x02, 0x10], 256 * 0x02 + 0x10),
        case(vec![0x83, 0x01, 0x00, 0x00], 256 * 256),
        case(vec![0x82, 0xff, 0xff], 256 * 0xff + 0xff),
    )]
    fn test_parse_length(input: Vec<u8>, expected: usize) {
        let (_, actual) = parse_length(&input).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_parse_length_rejects_oversized_field() {
        let input = [0x89, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        assert!(parse_length(&input).is_err());
    }

    #[rstest]
    #[case(0)]
    #[case(127)]
    #[case(128)]
    #[case(300)]
    #[case(70000)]
    fn test_length_read_back(#[case] length: usize) {
        let encoded = encode_length(length);
        let (rest, decoded) = parse_length(&encoded).unwrap();
        assert!(rest.is_empty());
        assert_eq!(length, decoded);
    }

    #[test]
    fn test_decode_built_sequence() {
        let seq = Der::sequence(&[
            Der::integer(&[0x80]).unwrap(),
            Der::from_encoded(&[0x05, 0x00]),
            Der::bit_string(&[0x04]),
        ]);
        let tlv: Tlv = seq.decode().unwrap();

        assert_eq!(Tag::Sequence, tlv.tag());
        assert_eq!(seq.len() - 2, tlv.length());
        let children = tlv.children().unwrap();
        assert_eq!(3, children.len());
        assert_eq!(Tag::Integer, children[0].tag());
        assert_eq!(Some(&[0x00, 0x80][..]), children[0].data());
        assert_eq!(Value::Data(vec![]), *children[1].value());
        assert_eq!(Some(&[0x00, 0x04][..]), children[2].data());
    }

    #[test]
    fn test_decode_trailing_data() {
        let input: &[u8] = &[0x05, 0x00, 0xff];
        let result: Result<Tlv, Error> = input.decode();
        assert_eq!(Err(Error::TrailingData(1)), result);
    }

    #[test]
    fn test_decode_truncated() {
        let input: &[u8] = &[0x02, 0x05, 0x01];
        let result: Result<Tlv, Error> = input.decode();
        assert!(result.is_err());
    }
}
