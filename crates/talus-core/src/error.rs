//! Shared error type for the talus engine.

use thiserror::Error;

/// Engine-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading or writing a chunk or world metadata file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized into the fixed on-disk layout.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization encountered data that doesn't fit the expected shape.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A requested resource (chunk, world save) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An index or coordinate fell outside the bounds it was checked against.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
