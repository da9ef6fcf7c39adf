use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the classification pipeline.
///
/// Image handling distinguishes unreadable, undecodable and empty inputs;
/// everything on the model side (weight loading, tensor ops, the forward
/// pass) funnels through candle and is passed along unchanged.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {path} decoded to an empty pixel grid")]
    EmptyImage { path: PathBuf },

    #[error(transparent)]
    Candle(#[from] candle_core::Error),
}
