use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The secondary codec's tree broke its own grammar.
    #[error("malformed document tree: {0}")]
    MalformedNode(String),

    #[error("the {codec} codec of this pair is gone")]
    Detached { codec: &'static str },
}

impl From<BridgeError> for json_strand::Error {
    fn from(err: BridgeError) -> Self {
        json_strand::Error::Adapter(Box::new(err))
    }
}

impl From<BridgeError> for json_lattice::Error {
    fn from(err: BridgeError) -> Self {
        json_lattice::Error::Adapter(Box::new(err))
    }
}

/// Carries a secondary-codec failure into the primary codec's error type.
/// A primary failure that travelled the other way is handed back unchanged.
pub(crate) fn into_strand(err: json_lattice::Error) -> json_strand::Error {
    match err {
        json_lattice::Error::Adapter(inner) => match inner.downcast::<json_strand::Error>() {
            Ok(original) => *original,
            Err(other) => json_strand::Error::Adapter(other),
        },
        other => json_strand::Error::Adapter(Box::new(other)),
    }
}

/// Mirror of [`into_strand`].
pub(crate) fn into_lattice(err: json_strand::Error) -> json_lattice::Error {
    match err {
        json_strand::Error::Adapter(inner) => match inner.downcast::<json_lattice::Error>() {
            Ok(original) => *original,
            Err(other) => json_lattice::Error::Adapter(other),
        },
        other => json_lattice::Error::Adapter(Box::new(other)),
    }
}
