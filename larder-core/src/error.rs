use thiserror::Error;

/// The persisted image tag disagrees with the sub-records attached to it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageStateError {
    #[error("Unknown image type: {0}")]
    UnknownTag(String),

    #[error("Image tagged '{tag}' is missing its {missing} record")]
    MissingRecord {
        tag: &'static str,
        missing: &'static str,
    },

    #[error("Image tagged '{tag}' also carries a {extra} record")]
    ConflictingRecord {
        tag: &'static str,
        extra: &'static str,
    },

    #[error("Image sub-record present without an image row")]
    Orphaned,
}

/// Rejected image metadata or url supplied by a client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageValidationError {
    #[error("Image name cannot be empty")]
    EmptyName,

    #[error("Image size must be between 1 and {max} bytes, got {size}")]
    InvalidSize { size: i64, max: i64 },

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Invalid image url: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parser request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Parser returned status {0}")]
    Status(u16),

    #[error("Parser is not configured: {0}")]
    NotConfigured(String),
}

/// A recipe draft that cannot be saved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Duplicate {list} order {position}")]
    DuplicatePosition { list: &'static str, position: i32 },

    #[error("{0} cannot be negative")]
    NegativeTime(&'static str),
}
