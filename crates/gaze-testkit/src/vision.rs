use async_trait::async_trait;
use gaze_vision::{VisionBackend, VisionError, VisionRequest, VisionResponse};
use parking_lot::Mutex;

/// A scripted [`VisionBackend`] shared across this workspace's integration
/// tests, the exported counterpart to `gaze-vision`'s own test-local
/// double (which stays private to its unit tests).
pub struct ScriptedVision {
    responses: Mutex<Vec<Result<VisionResponse, VisionError>>>,
}

impl ScriptedVision {
    /// Build a vision double that replies with `responses` in order, then
    /// a server error once exhausted.
    #[must_use]
    pub fn new(responses: Vec<Result<VisionResponse, VisionError>>) -> Self {
        Self { responses: Mutex::new(responses) }
    }
}

#[async_trait]
impl VisionBackend for ScriptedVision {
    async fn analyze(&self, _request: VisionRequest<'_>) -> Result<VisionResponse, VisionError> {
        let mut guard = self.responses.lock();
        if guard.is_empty() { Err(VisionError::ServerError(500)) } else { guard.remove(0) }
    }
}
