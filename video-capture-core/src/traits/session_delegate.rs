use crate::models::artifact::ArtifactMetadata;
use crate::models::error::CaptureError;
use crate::models::state::RecordingState;

/// Event delegate for recording session notifications.
///
/// All methods are called synchronously from inside the session operation
/// that caused them. Implementations should hand off to the UI thread if needed.
pub trait SessionDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &RecordingState);

    /// Called when acquisition or the encoder fails.
    fn on_error(&self, error: &CaptureError);

    /// Called each time `complete` registers a new artifact.
    fn on_artifact_created(&self, metadata: &ArtifactMetadata);
}
