//! Simulated media encoder.
//!
//! Encoders do not produce data on their own. Tests and the demo push
//! fragments through an [`EncoderProbe`], which only forwards them while the
//! most recently created encoder is actively recording, the same way a real
//! encoder stays silent while paused.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use video_capture_core::models::error::CaptureError;
use video_capture_core::models::event::EncoderEvents;
use video_capture_core::traits::capture_device::CaptureStream;
use video_capture_core::traits::media_encoder::{EncoderFactory, MediaEncoder};

use crate::simulated_camera::SimulatedStream;

/// Lifecycle of a simulated encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderPhase {
    Inactive,
    Recording,
    Paused,
    /// `stop` was called but the stop notification is held back.
    Stopping,
    Stopped,
}

/// Scripted encoder behavior.
#[derive(Debug, Clone, Default)]
pub struct EncoderOptions {
    /// Fail inside `EncoderFactory::create`.
    pub fail_create: bool,
    /// Fail inside `MediaEncoder::start`.
    pub fail_start: bool,
    /// Reject `MediaEncoder::pause`.
    pub fail_pause: bool,
    /// Reject `MediaEncoder::resume`.
    pub fail_resume: bool,
    /// Reject `MediaEncoder::stop`; the encoder keeps running.
    pub fail_stop: bool,
    /// Hold the stop notification until `EncoderProbe::finish_stop`.
    pub deferred_stop: bool,
    /// Fragment flushed right before the stop notification.
    pub final_fragment: Option<Vec<u8>>,
}

#[derive(Debug)]
struct EncoderShared {
    phase: EncoderPhase,
    stream_id: String,
    events: Option<EncoderEvents>,
    final_fragment: Option<Vec<u8>>,
}

impl EncoderShared {
    /// Flush the final fragment and report stopped.
    fn finish(&mut self) {
        if let Some(ref events) = self.events {
            if let Some(data) = self.final_fragment.take() {
                events.fragment(data);
            }
            events.stopped();
        }
        self.phase = EncoderPhase::Stopped;
    }
}

type SharedSlot = Arc<Mutex<Option<Arc<Mutex<EncoderShared>>>>>;

/// Builds [`SimulatedEncoder`]s for [`SimulatedStream`]s.
#[derive(Debug, Default)]
pub struct SimulatedEncoderFactory {
    options: EncoderOptions,
    current: SharedSlot,
    created: Arc<AtomicUsize>,
}

impl SimulatedEncoderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn probe(&self) -> EncoderProbe {
        EncoderProbe {
            current: Arc::clone(&self.current),
            created: Arc::clone(&self.created),
        }
    }
}

impl EncoderFactory<SimulatedStream> for SimulatedEncoderFactory {
    type Encoder = SimulatedEncoder;

    fn create(
        &self,
        stream: &SimulatedStream,
        events: EncoderEvents,
    ) -> Result<SimulatedEncoder, CaptureError> {
        if self.options.fail_create {
            return Err(CaptureError::EncoderFailed(
                "no encoder available for stream".into(),
            ));
        }

        let shared = Arc::new(Mutex::new(EncoderShared {
            phase: EncoderPhase::Inactive,
            stream_id: stream.id().to_string(),
            events: Some(events),
            final_fragment: self.options.final_fragment.clone(),
        }));
        *self.current.lock() = Some(Arc::clone(&shared));
        self.created.fetch_add(1, Ordering::SeqCst);

        Ok(SimulatedEncoder {
            shared,
            options: self.options.clone(),
        })
    }
}

/// Encoder bound to one [`SimulatedStream`].
#[derive(Debug)]
pub struct SimulatedEncoder {
    shared: Arc<Mutex<EncoderShared>>,
    options: EncoderOptions,
}

impl SimulatedEncoder {
    fn transition(
        &self,
        from: &[EncoderPhase],
        to: EncoderPhase,
        op: &str,
    ) -> Result<(), CaptureError> {
        let mut shared = self.shared.lock();
        if !from.contains(&shared.phase) {
            return Err(CaptureError::EncoderFailed(format!(
                "cannot {} while {:?}",
                op, shared.phase
            )));
        }
        shared.phase = to;
        Ok(())
    }
}

impl MediaEncoder for SimulatedEncoder {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.options.fail_start {
            return Err(CaptureError::EncoderFailed("encoder refused to start".into()));
        }
        self.transition(&[EncoderPhase::Inactive], EncoderPhase::Recording, "start")?;
        log::debug!("simulated encoder recording {}", self.shared.lock().stream_id);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), CaptureError> {
        if self.options.fail_pause {
            return Err(CaptureError::EncoderFailed("encoder refused to pause".into()));
        }
        self.transition(&[EncoderPhase::Recording], EncoderPhase::Paused, "pause")
    }

    fn resume(&mut self) -> Result<(), CaptureError> {
        if self.options.fail_resume {
            return Err(CaptureError::EncoderFailed("encoder refused to resume".into()));
        }
        self.transition(&[EncoderPhase::Paused], EncoderPhase::Recording, "resume")
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if self.options.fail_stop {
            return Err(CaptureError::EncoderFailed("encoder refused to stop".into()));
        }
        self.transition(
            &[EncoderPhase::Recording, EncoderPhase::Paused],
            EncoderPhase::Stopping,
            "stop",
        )?;
        if !self.options.deferred_stop {
            self.shared.lock().finish();
        }
        Ok(())
    }
}

/// Test-side handle driving the most recently created encoder.
#[derive(Debug, Clone)]
pub struct EncoderProbe {
    current: SharedSlot,
    created: Arc<AtomicUsize>,
}

impl EncoderProbe {
    /// Number of encoders created so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> Option<EncoderPhase> {
        self.with_current(|shared| shared.phase)
    }

    /// Emit a fragment. Dropped (returns `false`) unless the encoder is recording
    /// and its session is still listening.
    pub fn emit(&self, data: impl Into<Vec<u8>>) -> bool {
        let data = data.into();
        self.with_current(|shared| {
            if shared.phase != EncoderPhase::Recording {
                return false;
            }
            shared
                .events
                .as_ref()
                .map(|events| events.fragment(data))
                .unwrap_or(false)
        })
        .unwrap_or(false)
    }

    /// Deliver a stop notification held back by `deferred_stop`.
    pub fn finish_stop(&self) -> bool {
        self.with_current(|shared| {
            if shared.phase != EncoderPhase::Stopping {
                return false;
            }
            shared.finish();
            true
        })
        .unwrap_or(false)
    }

    /// Stop without being asked, as when the camera is unplugged.
    pub fn fail(&self) -> bool {
        self.with_current(|shared| {
            if !matches!(shared.phase, EncoderPhase::Recording | EncoderPhase::Paused) {
                return false;
            }
            shared.finish();
            true
        })
        .unwrap_or(false)
    }

    /// Drop the event sender without reporting stop, as when the encoder crashes.
    pub fn crash(&self) {
        self.with_current(|shared| {
            shared.events = None;
            shared.phase = EncoderPhase::Stopped;
        });
    }

    fn with_current<T>(&self, f: impl FnOnce(&mut EncoderShared) -> T) -> Option<T> {
        let current = self.current.lock().clone()?;
        let mut shared = current.lock();
        Some(f(&mut shared))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use video_capture_core::models::config::CaptureConstraints;
    use video_capture_core::models::event::EncoderEvent;
    use video_capture_core::traits::capture_device::CaptureDevice;

    use crate::simulated_camera::SimulatedCamera;

    async fn stream() -> SimulatedStream {
        SimulatedCamera::new()
            .request_stream(&CaptureConstraints::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn encoder_enforces_its_own_transitions() {
        let stream = stream().await;
        let factory = SimulatedEncoderFactory::new();
        let probe = factory.probe();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut encoder = factory.create(&stream, EncoderEvents::new(tx)).unwrap();

        assert!(encoder.pause().is_err());
        encoder.start().unwrap();
        assert_eq!(probe.phase(), Some(EncoderPhase::Recording));
        assert!(probe.emit(vec![1]));

        encoder.pause().unwrap();
        assert!(!probe.emit(vec![2]));
        encoder.resume().unwrap();
        encoder.stop().unwrap();
        assert_eq!(probe.phase(), Some(EncoderPhase::Stopped));

        assert_eq!(rx.try_recv().unwrap(), EncoderEvent::Fragment(vec![1]));
        assert_eq!(rx.try_recv().unwrap(), EncoderEvent::Stopped);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn deferred_stop_flushes_final_fragment_first() {
        let stream = stream().await;
        let factory = SimulatedEncoderFactory::with_options(EncoderOptions {
            deferred_stop: true,
            final_fragment: Some(vec![9]),
            ..Default::default()
        });
        let probe = factory.probe();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut encoder = factory.create(&stream, EncoderEvents::new(tx)).unwrap();

        encoder.start().unwrap();
        encoder.stop().unwrap();
        assert_eq!(probe.phase(), Some(EncoderPhase::Stopping));
        assert!(rx.try_recv().is_err());

        assert!(probe.finish_stop());
        assert!(!probe.finish_stop());
        assert_eq!(rx.try_recv().unwrap(), EncoderEvent::Fragment(vec![9]));
        assert_eq!(rx.try_recv().unwrap(), EncoderEvent::Stopped);
    }

    #[tokio::test]
    async fn scripted_failures() {
        let stream = stream().await;
        let (tx, _rx) = mpsc::unbounded_channel();

        let factory = SimulatedEncoderFactory::with_options(EncoderOptions {
            fail_create: true,
            ..Default::default()
        });
        assert!(factory.create(&stream, EncoderEvents::new(tx.clone())).is_err());
        assert_eq!(factory.probe().created(), 0);

        let factory = SimulatedEncoderFactory::with_options(EncoderOptions {
            fail_start: true,
            ..Default::default()
        });
        let mut encoder = factory.create(&stream, EncoderEvents::new(tx.clone())).unwrap();
        assert!(encoder.start().is_err());
        assert_eq!(factory.probe().phase(), Some(EncoderPhase::Inactive));

        let factory = SimulatedEncoderFactory::with_options(EncoderOptions {
            fail_pause: true,
            fail_stop: true,
            ..Default::default()
        });
        let mut encoder = factory.create(&stream, EncoderEvents::new(tx)).unwrap();
        encoder.start().unwrap();
        assert!(encoder.pause().is_err());
        assert!(encoder.stop().is_err());
        assert_eq!(factory.probe().phase(), Some(EncoderPhase::Recording));
    }
}
