//! Error types for token encoding, decoding and selection operations.

use thiserror::Error;

/// The specific way an incoming token failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// The token does not start with the `b2:idmask:` prefix.
    MissingPrefix,
    /// The token body is not valid URL-safe base64.
    InvalidBase64,
    /// The payload ended inside a varint id.
    TruncatedVarint { offset: usize },
    /// An id was read but no mask byte follows it.
    MissingMask { offset: usize },
}

impl std::fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedKind::MissingPrefix => write!(f, "missing token prefix"),
            MalformedKind::InvalidBase64 => write!(f, "invalid base64 body"),
            MalformedKind::TruncatedVarint { offset } => {
                write!(f, "truncated varint at byte {}", offset)
            }
            MalformedKind::MissingMask { offset } => {
                write!(f, "missing mask byte at byte {}", offset)
            }
        }
    }
}

/// Errors that can occur while working with selections and tokens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdmaskError {
    /// A token or payload could not be parsed.
    #[error("Malformed input: {0}")]
    MalformedInput(MalformedKind),

    /// The set id is not present in the catalog.
    #[error("Unknown set id: {0}")]
    UnknownSet(u32),

    /// The component index does not address a representable bit of the set.
    #[error("Component index {index} out of range for set {set_id} ({count} bits)")]
    ComponentOutOfRange { set_id: u32, index: usize, count: usize },

    /// The catalog document could not be read or parsed.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// The preferences file could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// URL parsing failed using the url crate.
    #[error("URL parsing error: {0}")]
    UrlParse(String),

    /// A compact id-set string could not be decoded.
    #[error("Invalid id set: {0}")]
    InvalidIdSet(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IdmaskError>;

impl From<url::ParseError> for IdmaskError {
    fn from(err: url::ParseError) -> Self {
        IdmaskError::UrlParse(err.to_string())
    }
}

impl From<std::io::Error> for IdmaskError {
    fn from(err: std::io::Error) -> Self {
        IdmaskError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for IdmaskError {
    fn from(err: serde_json::Error) -> Self {
        IdmaskError::Catalog(err.to_string())
    }
}

impl From<base64::DecodeError> for IdmaskError {
    fn from(_: base64::DecodeError) -> Self {
        IdmaskError::MalformedInput(MalformedKind::InvalidBase64)
    }
}
