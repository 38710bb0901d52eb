//! Error types for the panorama pipeline.
//!
//! Tile-level problems (failed downloads, undecodable tiles, missing faces
//! at assembly time) are absorbed by the stages and only logged. The errors
//! here abort the current panorama; the batch runner records them and moves
//! on to the next one.

use std::path::PathBuf;
use thiserror::Error;

use crate::coord::Face;
use crate::projection::ProjectionError;

/// Errors that abort processing of one panorama.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A face file expected by the projector is not on disk
    #[error("missing face image: {}", path.display())]
    MissingFace { face: Face, path: PathBuf },

    /// A face file exists but cannot be decoded
    #[error("failed to decode face image {}: {source}", path.display())]
    FaceDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Encoding or writing an output image failed
    #[error("failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem error around an output path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The projector rejected the faces
    #[error("projection failed: {0}")]
    Projection(#[from] ProjectionError),

    /// A blocking task panicked or was cancelled
    #[error("task panicked: {0}")]
    TaskPanicked(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(e: tokio::task::JoinError) -> Self {
        PipelineError::TaskPanicked(e.to_string())
    }
}
