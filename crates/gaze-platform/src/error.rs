use thiserror::Error;

/// Errors a [`crate::PlatformAdapter`] implementation may report.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// The underlying OS call failed; the message is adapter-specific.
    #[error("platform adapter failure: {0}")]
    Failed(String),

    /// This adapter does not implement the requested operation.
    #[error("operation not supported by this platform adapter: {0}")]
    Unsupported(&'static str),

    /// The adapter's scripted scenario (test doubles only) was exhausted.
    #[error("scripted platform scenario exhausted")]
    ScenarioExhausted,
}
