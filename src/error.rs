//! Error type shared by every encoder and renderer.

use thiserror::Error;

/// Everything that can go wrong while encoding or rendering a symbol.
///
/// Errors are reported at the call that triggered them. No variant is ever
/// accompanied by partial output.
#[derive(Debug, Error)]
pub enum BarcodeError {
    /// The payload violates the symbology's alphabet or length rules.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// An option key or enumerated value is not recognised.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// The payload does not fit in the largest QR Code version at the requested level.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Writing the output file failed.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The raster encoder refused the pixel buffer.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// A freshly built symbol failed its own consistency check.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BarcodeError {
    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedInput(message.into())
    }

    pub(crate) fn unknown_option(message: impl Into<String>) -> Self {
        Self::UnknownOption(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BarcodeError>;
