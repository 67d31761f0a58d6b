use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("encoded JSON is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("syntax error at byte {offset}: expected {expected}")]
    Syntax { expected: &'static str, offset: usize },

    #[error("JSON document not fully consumed, trailing content at byte {offset}")]
    TrailingContent { offset: usize },

    #[error("writer misuse: {0}")]
    IllegalState(&'static str),

    #[error("no type adapter for {ty}")]
    NoAdapter { ty: String },

    #[error("adapter produced a value that is not a {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("{value:?} is not a constant of {ty}")]
    UnknownConstant { ty: &'static str, value: String },

    /// Failure raised by an adapter that belongs to another library.
    #[error(transparent)]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
