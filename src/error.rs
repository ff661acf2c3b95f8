//! Error types for the schedule renderer

use thiserror::Error;

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can reach the caller of a render.
///
/// Font-load failures, avatar-fetch failures and unsupported glyphs are
/// recovered where they happen and never show up here.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to initialize the composer
    #[error("Composer initialization failed: {0}")]
    InitializationError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The request could not be drawn
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode the canvas
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to persist the output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
