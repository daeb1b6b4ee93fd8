use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("INTEGER: no data")]
    EmptyInteger,
    #[error("parser error {0:?}")]
    Parser(nom::error::ErrorKind),
    #[error("parser incomplete: {0:?}")]
    ParserIncomplete(nom::Needed),
    #[error("{0} trailing bytes after the outer element")]
    TrailingData(usize),
}
