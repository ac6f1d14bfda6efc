//! Error types for the retina_match library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for retina_match operations
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors raised while enhancing or comparing fundus images.
///
/// The core (`Enhancer`, `Comparator`) only produces `InvalidImage`,
/// `DimensionMismatch` and `InvalidParams`; the I/O variants belong to the
/// loaders and the binaries.
#[derive(Error, Debug)]
pub enum MatchError {
    /// Malformed, empty or unsupported pixel buffer
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    /// The two masks cannot be partitioned into a common grid
    #[error(
        "Dimension mismatch: {}x{} vs {}x{} (grid of {splits}x{splits})",
        .left.0, .left.1, .right.0, .right.1
    )]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
        splits: usize,
    },

    /// Parameter set rejected by validation
    #[error("Invalid parameter: {reason}")]
    InvalidParams { reason: String },

    /// Image file could not be decoded or encoded
    #[error("Image I/O failed for {}: {message}", .path.display())]
    ImageIo { path: PathBuf, message: String },

    /// Configuration or report file could not be read, parsed or written
    #[error("Config error for {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl MatchError {
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }

    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    pub fn image_io(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ImageIo {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
