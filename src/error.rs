use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use serde::de;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the library can produce. Parsing surfaces these through the
/// top level `parse` call, typed extraction through the accessor that
/// triggered them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown token, offset: {offset}")]
    UnknownToken { offset: usize },

    #[error("unterminated quoted text")]
    UnterminatedString,

    #[error("unterminated triple quoted text")]
    UnterminatedTripleQuotedText,

    #[error("unknown escape code: \\{0}")]
    UnknownEscape(char),

    #[error("invalid unicode escape: \\u{0}")]
    InvalidUnicodeEscape(String),

    #[error("end of input reached while trying to read a value")]
    UnexpectedEof,

    #[error("unexpected {token} in {context}")]
    UnexpectedToken {
        token: &'static str,
        context: &'static str,
    },

    #[error("end of input reached while reading an array")]
    UnterminatedArray,

    #[error("unresolved substitution: {0}")]
    UnresolvedSubstitution(String),

    #[error("cycle reference in path of {0}")]
    CycleDetected(String),

    #[error("cannot read {actual} value as {expected}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("cannot merge into a non-object value")]
    NotAnObject,

    #[error("unknown boolean format: {0}")]
    BadBoolean(String),

    #[error("cannot parse time value: {0}")]
    BadDuration(String),

    #[error("infinite time duration not allowed")]
    InfiniteDisallowed,

    #[error("unknown byte size unit: {0}")]
    BadByteSize(String),

    #[error("byte size out of range: {0}")]
    ByteSizeOverflow(String),

    #[error("expected a positive value instead of {0}")]
    NegativeValue(String),

    #[error("no include loader configured, cannot process include \"{0}\"")]
    NoIncludeLoader(String),

    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Message(String),
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}
