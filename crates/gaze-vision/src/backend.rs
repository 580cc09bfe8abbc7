use async_trait::async_trait;
use gaze_protocol::Zone;

use crate::error::VisionError;

/// Request body for a single vision call (spec.md §6 wire contract).
#[derive(Clone, Debug)]
pub struct VisionRequest<'a> {
    /// Encoded frame bytes (a compact lossless encoding; the encoder is an
    /// external concern, not pinned by this crate).
    pub image: &'a [u8],
    /// Screen width in logical pixels.
    pub screen_width: u32,
    /// Screen height in logical pixels.
    pub screen_height: u32,
    /// Short free-text hint about what the caller is looking for.
    pub context_hint: &'a str,
}

/// Successful response body: a parsed zone inventory plus diagnostics.
#[derive(Clone, Debug, Default)]
pub struct VisionResponse {
    /// Zones parsed from the reply. An empty vector with an `Ok` result is
    /// a valid, distinct outcome ("parse-success-empty").
    pub zones: Vec<Zone>,
    /// Raw response text, kept for diagnostics.
    pub raw_response: String,
    /// Tokens consumed by the call, if the backend reports it.
    pub token_count: u32,
}

/// External remote vision/text LLM endpoint (spec.md §1, §6). The wire
/// format and credentials are pinned interface, not implemented here; this
/// crate owns only the retry/backoff/outcome logic layered on top of a
/// single call.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Perform one call. Implementations should not retry internally;
    /// [`crate::call_with_retry`] owns retry policy.
    async fn analyze(&self, request: VisionRequest<'_>) -> Result<VisionResponse, VisionError>;
}
