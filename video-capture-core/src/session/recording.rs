use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};

use crate::models::artifact::{Artifact, ArtifactRef};
use crate::models::config::SessionConfiguration;
use crate::models::error::CaptureError;
use crate::models::event::{EncoderEvent, EncoderEvents};
use crate::models::state::RecordingState;
use crate::processing::fragment_buffer::FragmentBuffer;
use crate::session::stream_guard::StreamGuard;
use crate::storage::artifact_store::ArtifactStore;
use crate::traits::capture_device::{CaptureDevice, CaptureStream};
use crate::traits::media_encoder::{EncoderFactory, MediaEncoder};
use crate::traits::session_delegate::SessionDelegate;

/// Resources held between a successful `start` and the encoder's stop.
struct ActiveCapture<S: CaptureStream, E> {
    encoder: E,
    events: UnboundedReceiver<EncoderEvent>,
    // Dropped last: stops the capture tracks.
    stream: StreamGuard<S>,
}

/// Active recording time, excluding pauses.
#[derive(Debug, Default)]
struct RecordingClock {
    started: Option<Instant>,
    paused_total: Duration,
    paused_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl RecordingClock {
    fn begin(&mut self) {
        *self = Self {
            started: Some(Instant::now()),
            ..Self::default()
        };
    }

    fn pause(&mut self) {
        self.paused_at = Some(Instant::now());
    }

    fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += paused_at.elapsed();
        }
    }

    fn stop(&mut self) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(Instant::now());
        }
    }

    fn elapsed(&self) -> Duration {
        let Some(started) = self.started else {
            return Duration::ZERO;
        };
        let end = self.stopped_at.unwrap_or_else(Instant::now);
        let mut paused = self.paused_total;
        if let Some(paused_at) = self.paused_at {
            paused += end.saturating_duration_since(paused_at);
        }
        end.saturating_duration_since(started).saturating_sub(paused)
    }
}

/// A single video recording session over a host camera and encoder.
///
/// Generic over the capture device and the encoder backend. The session
/// owns the capture stream and encoder exclusively from `start` until the
/// encoder reports it has stopped, buffers every encoded fragment in order,
/// and assembles the buffer into an artifact on `complete`.
///
/// ```text
/// [CaptureDevice] → stream ─→ [EncoderFactory] → encoder
///                                                   │ EncoderEvents (mpsc)
///                                                   ↓
///                    process_events / wait_for_stop → [FragmentBuffer] → complete → [ArtifactStore]
/// ```
///
/// Every operation first handles the encoder notifications already
/// delivered, so it sees the state those notifications produced. The
/// read-only accessors report the state as of the last operation.
///
/// Operations that are not valid for the current state are silently
/// ignored. Acquisition and encoder failures are reported through the log,
/// the delegate and [`last_error`](Self::last_error), never returned.
pub struct RecordingSession<D, F>
where
    D: CaptureDevice,
    F: EncoderFactory<D::Stream>,
{
    device: D,
    encoders: F,
    config: SessionConfiguration,
    state: RecordingState,
    active: Option<ActiveCapture<D::Stream, F::Encoder>>,
    fragments: FragmentBuffer,
    clock: RecordingClock,
    last_error: Option<CaptureError>,
    artifacts: ArtifactStore,
    delegate: Option<Arc<dyn SessionDelegate>>,
}

impl<D, F> RecordingSession<D, F>
where
    D: CaptureDevice,
    F: EncoderFactory<D::Stream>,
{
    pub fn new(device: D, encoders: F) -> Self {
        Self {
            device,
            encoders,
            config: SessionConfiguration::default(),
            state: RecordingState::Idle,
            active: None,
            fragments: FragmentBuffer::new(),
            clock: RecordingClock::default(),
            last_error: None,
            artifacts: ArtifactStore::new(),
            delegate: None,
        }
    }

    pub fn with_configuration(
        device: D,
        encoders: F,
        config: SessionConfiguration,
    ) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        let mut session = Self::new(device, encoders);
        session.config = config;
        Ok(session)
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Share an existing artifact registry instead of the session's own.
    pub fn set_artifact_store(&mut self, store: ArtifactStore) {
        self.artifacts = store;
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// True while recording or paused.
    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// The live capture stream, for preview. `None` once it has been released.
    pub fn stream(&self) -> Option<&D::Stream> {
        if !self.state.holds_capture() {
            return None;
        }
        self.active.as_ref().map(|active| &*active.stream)
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    pub fn buffered_bytes(&self) -> usize {
        self.fragments.total_bytes()
    }

    /// Time spent recording in the current session, pauses excluded.
    pub fn recorded_duration(&self) -> Duration {
        self.clock.elapsed()
    }

    /// The most recent acquisition or encoder failure, cleared by a successful start.
    pub fn last_error(&self) -> Option<&CaptureError> {
        self.last_error.as_ref()
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn configuration(&self) -> &SessionConfiguration {
        &self.config
    }

    /// Acquire the camera and begin encoding. Transitions: idle → recording.
    ///
    /// Suspends only while the capture device is being requested. On failure
    /// the session stays idle and anything already acquired is released.
    pub async fn start(&mut self) {
        self.process_events();
        if !self.state.is_idle() {
            debug!("start ignored in {} state", self.state.as_str());
            return;
        }

        if let Err(e) = self.try_start().await {
            self.report_error("failed to start recording", e);
        }
    }

    async fn try_start(&mut self) -> Result<(), CaptureError> {
        if !self.device.is_available() {
            return Err(CaptureError::DeviceNotAvailable);
        }

        let stream = self.device.request_stream(&self.config.constraints).await?;
        let stream = StreamGuard::new(stream);

        let (tx, rx) = mpsc::unbounded_channel();
        let mut encoder = self.encoders.create(&*stream, EncoderEvents::new(tx))?;
        encoder.start()?;

        self.fragments.clear();
        self.clock.begin();
        self.last_error = None;
        info!("recording started on stream {}", stream.id());

        self.active = Some(ActiveCapture {
            encoder,
            events: rx,
            stream,
        });
        self.set_state(RecordingState::Recording);
        Ok(())
    }

    /// Pause encoding, keeping the camera open. Transitions: recording → paused.
    pub fn pause(&mut self) {
        self.process_events();
        if self.state != RecordingState::Recording {
            debug!("pause ignored in {} state", self.state.as_str());
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if let Err(e) = active.encoder.pause() {
            self.report_error("failed to pause encoder", e);
            return;
        }
        self.clock.pause();
        self.set_state(RecordingState::Paused);
    }

    /// Resume encoding. Transitions: paused → recording.
    pub fn resume(&mut self) {
        self.process_events();
        if self.state != RecordingState::Paused {
            debug!("resume ignored in {} state", self.state.as_str());
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if let Err(e) = active.encoder.resume() {
            self.report_error("failed to resume encoder", e);
            return;
        }
        self.clock.resume();
        self.set_state(RecordingState::Recording);
    }

    /// Ask the encoder to stop. Transitions: recording/paused → stopping.
    ///
    /// The session becomes `Stopped`, and the camera is released, only once
    /// the encoder's stop notification has been processed.
    pub fn stop(&mut self) {
        self.process_events();
        if !self.state.is_recording() {
            debug!("stop ignored in {} state", self.state.as_str());
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };

        if let Err(e) = active.encoder.stop() {
            self.report_error("failed to stop encoder", e);
            return;
        }
        self.clock.stop();
        self.set_state(RecordingState::Stopping);
    }

    /// Handle every encoder notification already delivered, without waiting.
    ///
    /// Returns the number of notifications handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(active) = self.active.as_mut() {
            match active.events.try_recv() {
                Ok(event) => {
                    handled += 1;
                    self.handle_event(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("encoder dropped its event channel without reporting stop");
                    self.finish_stop();
                }
            }
        }
        handled
    }

    /// Handle encoder notifications until the session reaches `Stopped`.
    ///
    /// Returns immediately when no encoder is active. Does not request a
    /// stop itself; pair it with [`stop`](Self::stop) or an encoder that
    /// stops on its own.
    pub async fn wait_for_stop(&mut self) {
        while let Some(active) = self.active.as_mut() {
            match active.events.recv().await {
                Some(event) => self.handle_event(event),
                None => {
                    warn!("encoder dropped its event channel without reporting stop");
                    self.finish_stop();
                }
            }
        }
    }

    /// Assemble the buffered fragments into an artifact and register it.
    ///
    /// Only effective once stopped. Returns `None` if nothing was recorded.
    /// Each call issues a new reference; the bytes are identical. Session
    /// state is only changed by pending encoder notifications handled first.
    pub fn complete(&mut self) -> Option<ArtifactRef> {
        self.process_events();
        if !self.state.is_stopped() {
            debug!("complete ignored in {} state", self.state.as_str());
            return None;
        }
        let Some(bytes) = self.fragments.assemble() else {
            debug!("complete: no fragments recorded");
            return None;
        };

        let artifact = Artifact::new(
            bytes,
            &self.config.media_type,
            self.fragments.len(),
            self.recorded_duration().as_secs_f64(),
        );
        let metadata = artifact.metadata.clone();
        let reference = self.artifacts.insert(artifact);
        info!(
            "assembled {} ({} bytes from {} fragments)",
            reference, metadata.size_bytes, metadata.fragment_count
        );

        if let Some(ref delegate) = self.delegate {
            delegate.on_artifact_created(&metadata);
        }
        Some(reference)
    }

    /// Discard the finished session so `start` can run again. Transitions: stopped → idle.
    ///
    /// Artifact references already issued stay valid.
    pub fn reset(&mut self) {
        self.process_events();
        if !self.state.is_stopped() {
            debug!("reset ignored in {} state", self.state.as_str());
            return;
        }
        self.fragments.clear();
        self.clock = RecordingClock::default();
        self.last_error = None;
        self.set_state(RecordingState::Idle);
    }

    // --- Internal helpers ---

    fn handle_event(&mut self, event: EncoderEvent) {
        match event {
            EncoderEvent::Fragment(data) => {
                debug!("fragment {} ({} bytes)", self.fragments.len(), data.len());
                self.fragments.push(data);
            }
            EncoderEvent::Stopped => self.finish_stop(),
        }
    }

    /// Release the encoder and camera and enter `Stopped`.
    fn finish_stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if !matches!(self.state, RecordingState::Stopping) {
            info!("encoder stopped on its own while {}", self.state.as_str());
        }
        self.clock.stop();
        drop(active);
        self.set_state(RecordingState::Stopped);
    }

    fn set_state(&mut self, new_state: RecordingState) {
        debug!("{} → {}", self.state.as_str(), new_state.as_str());
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }

    fn report_error(&mut self, context: &str, error: CaptureError) {
        error!("{}: {}", context, error);
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(&error);
        }
        self.last_error = Some(error);
    }
}

impl<D, F> Drop for RecordingSession<D, F>
where
    D: CaptureDevice,
    F: EncoderFactory<D::Stream>,
{
    fn drop(&mut self) {
        self.process_events();
        if let Some(mut active) = self.active.take() {
            if self.state.is_recording() {
                if let Err(e) = active.encoder.stop() {
                    warn!("failed to stop encoder on drop: {}", e);
                }
            }
        }
    }
}
