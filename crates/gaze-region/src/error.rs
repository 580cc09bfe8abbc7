use thiserror::Error;

/// Failure from a [`crate::LocalVision`] primitive.
#[derive(Debug, Error)]
pub enum RegionError {
    /// The primitive could not complete detection.
    #[error("local detection failed: {0}")]
    DetectionFailed(String),
}
