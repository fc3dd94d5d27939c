//! Simulated camera capture device.
//!
//! Hands out [`SimulatedStream`]s or fails the way a real host would
//! (permission denied, no camera, camera in use). Every stream shares a
//! counter block with the camera so tests can check that tracks were
//! stopped exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use video_capture_core::models::capture_models::{TrackInfo, TrackKind};
use video_capture_core::models::config::CaptureConstraints;
use video_capture_core::models::error::CaptureError;
use video_capture_core::traits::capture_device::{CaptureDevice, CaptureStream};

/// How the camera answers a stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraBehavior {
    Grant,
    Deny,
    NotFound,
    Busy,
    /// Never answers, like a permission prompt the user ignores.
    Hang,
}

#[derive(Debug, Default)]
struct CameraCounters {
    requests: AtomicUsize,
    streams_opened: AtomicUsize,
    stop_calls: AtomicUsize,
    tracks_stopped: AtomicUsize,
}

/// Read-only view of a camera's counters.
#[derive(Debug, Clone)]
pub struct CameraProbe {
    counters: Arc<CameraCounters>,
}

impl CameraProbe {
    /// Number of stream requests received.
    pub fn requests(&self) -> usize {
        self.counters.requests.load(Ordering::SeqCst)
    }

    pub fn streams_opened(&self) -> usize {
        self.counters.streams_opened.load(Ordering::SeqCst)
    }

    /// Number of `stop_tracks` calls across all streams.
    pub fn stop_calls(&self) -> usize {
        self.counters.stop_calls.load(Ordering::SeqCst)
    }

    pub fn tracks_stopped(&self) -> usize {
        self.counters.tracks_stopped.load(Ordering::SeqCst)
    }

    /// Streams opened whose tracks have not been stopped yet.
    pub fn live_streams(&self) -> usize {
        self.streams_opened() - self.stop_calls().min(self.streams_opened())
    }
}

/// Camera device with scripted behavior.
#[derive(Debug)]
pub struct SimulatedCamera {
    behavior: CameraBehavior,
    available: bool,
    counters: Arc<CameraCounters>,
}

impl SimulatedCamera {
    /// A camera that grants every request.
    pub fn new() -> Self {
        Self::with_behavior(CameraBehavior::Grant)
    }

    pub fn with_behavior(behavior: CameraBehavior) -> Self {
        Self {
            behavior,
            available: true,
            counters: Arc::new(CameraCounters::default()),
        }
    }

    /// A host without any capture API.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn probe(&self) -> CameraProbe {
        CameraProbe {
            counters: Arc::clone(&self.counters),
        }
    }
}

impl Default for SimulatedCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureDevice for SimulatedCamera {
    type Stream = SimulatedStream;

    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<SimulatedStream, CaptureError> {
        let request = self.counters.requests.fetch_add(1, Ordering::SeqCst);

        // Real hosts answer asynchronously.
        tokio::task::yield_now().await;

        match self.behavior {
            CameraBehavior::Grant => {}
            CameraBehavior::Deny => return Err(CaptureError::PermissionDenied),
            CameraBehavior::NotFound => return Err(CaptureError::DeviceNotFound),
            CameraBehavior::Busy => return Err(CaptureError::DeviceBusy),
            CameraBehavior::Hang => std::future::pending::<()>().await,
        }

        let id = format!("sim-stream-{}", request);
        let mut tracks = Vec::new();
        if constraints.video {
            tracks.push(TrackInfo {
                id: format!("{}-video", id),
                label: "Simulated Camera".into(),
                kind: TrackKind::Video,
            });
        }
        if constraints.audio {
            tracks.push(TrackInfo {
                id: format!("{}-audio", id),
                label: "Simulated Microphone".into(),
                kind: TrackKind::Audio,
            });
        }

        self.counters.streams_opened.fetch_add(1, Ordering::SeqCst);
        log::debug!("simulated camera opened {} with {} tracks", id, tracks.len());
        Ok(SimulatedStream {
            id,
            tracks,
            live: true,
            counters: Arc::clone(&self.counters),
        })
    }
}

/// Stream handed out by [`SimulatedCamera`].
#[derive(Debug)]
pub struct SimulatedStream {
    id: String,
    tracks: Vec<TrackInfo>,
    live: bool,
    counters: Arc<CameraCounters>,
}

impl SimulatedStream {
    /// Whether the tracks are still running.
    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl CaptureStream for SimulatedStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<TrackInfo> {
        self.tracks.clone()
    }

    fn stop_tracks(&mut self) {
        self.counters.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.live {
            self.counters
                .tracks_stopped
                .fetch_add(self.tracks.len(), Ordering::SeqCst);
            self.live = false;
        }
    }
}
