// =====================================================================
// File: error.rs
//
// Description:
//   Error types surfaced by the index, the record codec, and the
//   persistence / ingestion layers built on top of them.
// =====================================================================
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring the B-tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("B-tree minimum degree must be >= 2, got {min_degree}")]
    InvalidConfiguration { min_degree: usize },
}

/// Errors raised by the fixed-width record codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("field '{field}' is {len} bytes, exceeds fixed width {width}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        width: usize,
    },

    #[error("field '{field}' contains a NUL byte")]
    EmbeddedNul { field: &'static str },

    #[error("record schema includes '{field}' but the record has no value for it")]
    MissingField { field: &'static str },

    #[error("record has a value for '{field}' but the record schema cannot store it")]
    UnstoredField { field: &'static str },

    #[error("wrong block length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("field '{field}' is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    #[error("invalid record schema: {0}")]
    InvalidSchema(String),
}

/// Crate-level error covering every fallible operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
