use async_trait::async_trait;

use crate::models::capture_models::TrackInfo;
use crate::models::config::CaptureConstraints;
use crate::models::error::CaptureError;

/// A live camera/microphone feed handed out by a [`CaptureDevice`].
///
/// Owned exclusively by the recording session while it is held.
pub trait CaptureStream: Send {
    /// Stable identifier of this stream.
    fn id(&self) -> &str;

    /// The tracks making up this stream.
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Stop every track of the stream, turning the device off.
    fn stop_tracks(&mut self);
}

/// Host-provided camera capture.
///
/// Implemented by:
/// - `SimulatedCamera` (video-capture-sim)
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    type Stream: CaptureStream;

    /// Whether the host exposes a capture API at all.
    fn is_available(&self) -> bool;

    /// Request a capture stream matching `constraints`.
    ///
    /// May wait indefinitely on a user permission prompt. Fails with
    /// `PermissionDenied`, `DeviceNotFound` or `DeviceBusy`.
    async fn request_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Self::Stream, CaptureError>;
}
