//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! caller contract violations (an empty image pool), invalid configuration, image
//! buffer failures, and generic errors. Degraded-but-usable conditions such as a
//! failed path extraction are never errors; see [`crate::path::PathExtraction`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("image pool is empty; at least one candidate image is required")]
    EmptyImagePool,

    #[error("guide image has zero width or height")]
    EmptyGuideImage,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
