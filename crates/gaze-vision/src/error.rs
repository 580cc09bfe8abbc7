use thiserror::Error;

/// Failure modes a [`crate::VisionBackend`] call can report.
///
/// `Network` and `ServerError` are transport failures; `ParseFailure` means
/// the transport succeeded but the structured reply could not be parsed.
/// Spec.md §4.4 treats all three as transient and retryable, distinct from
/// the non-error "parse-success, empty zones" outcome.
#[derive(Debug, Error, Clone)]
pub enum VisionError {
    /// The request could not reach the remote endpoint.
    #[error("network error calling vision backend: {0}")]
    Network(String),

    /// The remote endpoint returned a server-side error status.
    #[error("vision backend returned server error: {0}")]
    ServerError(u16),

    /// The response body could not be parsed into a zone list.
    #[error("failed to parse vision backend response: {0}")]
    ParseFailure(String),
}
