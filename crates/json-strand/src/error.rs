use thiserror::Error;

use crate::reader::Token;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("encoded JSON is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("expected {expected} but was {actual:?} at byte {offset}")]
    UnexpectedToken {
        expected: &'static str,
        actual: Token,
        offset: usize,
    },

    #[error("syntax error at byte {offset}: expected {expected}")]
    Syntax { expected: &'static str, offset: usize },

    #[error("writer misuse: {0}")]
    IllegalState(&'static str),

    #[error("no JSON adapter for {ty}")]
    NoAdapter { ty: String },

    #[error("factory is not part of this codec's chain")]
    UnknownFactory,

    #[error("adapter produced a value that is not a {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("value sink closed without a value")]
    EmptyValueSink,

    /// Failure raised by an adapter that belongs to another library.
    #[error(transparent)]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
