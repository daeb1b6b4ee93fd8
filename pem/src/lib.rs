pub mod error;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use error::Error;
use jwkpem::decoder::{DecodableFrom, Decoder};
use regex::Regex;

const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// RFC 7468: base64 text is wrapped at 64 characters.
const LINE_WIDTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// X.509 SubjectPublicKeyInfo
    PublicKey,
    /// PKCS#1 RSAPublicKey
    RSAPublicKey,
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::PublicKey => write!(f, "{}", PUBLIC_KEY_LABEL),
            Label::RSAPublicKey => write!(f, "{}", RSA_PUBLIC_KEY_LABEL),
        }
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PUBLIC_KEY_LABEL => Ok(Label::PublicKey),
            RSA_PUBLIC_KEY_LABEL => Ok(Label::RSAPublicKey),
            _ => Err(Error::InvalidLabel),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Begin(Label),
    End(Label),
}

impl Boundary {
    /// `Ok(None)` means the line is not a boundary at all.
    fn parse(line: &str) -> Result<Option<Boundary>, Error> {
        let re = Regex::new(r"^-----(BEGIN|END) ([A-Z0-9 ]+)-----\s*$")
            .map_err(|_| Error::InvalidEncapsulationBoundary)?;
        let Some(captured) = re.captures(line) else {
            return Ok(None);
        };
        let (Some(kind), Some(label)) = (captured.get(1), captured.get(2)) else {
            return Err(Error::InvalidEncapsulationBoundary);
        };
        let label = Label::from_str(label.as_str())?;
        match kind.as_str() {
            "BEGIN" => Ok(Some(Boundary::Begin(label))),
            _ => Ok(Some(Boundary::End(label))),
        }
    }
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    base64_data: String, // base64 encoded data, no line breaks
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem { label, base64_data }
    }

    /// Frame DER bytes under `label`.
    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        let base64_data = STANDARD.encode(data);
        Pem { label, base64_data }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }

    /// Body lines as they appear in the rendered document.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        // base64 output is ASCII, so every chunk boundary is a char boundary
        self.base64_data
            .as_bytes()
            .chunks(LINE_WIDTH)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        write!(f, "-----END {}-----", self.label)
    }
}

impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();

        // Explanatory text before the block is ignored.
        let label = loop {
            let line = lines.next().ok_or(Error::MissingPreEncapsulationBoundary)?;
            match Boundary::parse(line)? {
                Some(Boundary::Begin(label)) => break label,
                Some(Boundary::End(_)) => return Err(Error::MissingPreEncapsulationBoundary),
                None => continue,
            }
        };

        let mut base64_data = String::new();
        loop {
            let line = lines
                .next()
                .ok_or(Error::MissingPostEncapsulationBoundary)?;
            match Boundary::parse(line)? {
                Some(Boundary::End(end)) if end == label => break,
                Some(_) => return Err(Error::LabelMissMatch),
                None => base64_data.push_str(line.trim()),
            }
        }

        if base64_data.is_empty() {
            return Err(Error::MissingData);
        }
        Ok(Pem { label, base64_data })
    }
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        STANDARD.decode(self.data()).map_err(Error::Base64Decode)
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}
