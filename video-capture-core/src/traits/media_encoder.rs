use crate::models::error::CaptureError;
use crate::models::event::EncoderEvents;
use crate::traits::capture_device::CaptureStream;

/// Host-provided media encoder bound to one capture stream.
///
/// Encoded output and shutdown are reported through the [`EncoderEvents`]
/// the encoder was created with, never through return values. `stop` only
/// requests shutdown; the encoder sends `Stopped` once it has flushed.
pub trait MediaEncoder: Send {
    fn start(&mut self) -> Result<(), CaptureError>;

    fn pause(&mut self) -> Result<(), CaptureError>;

    fn resume(&mut self) -> Result<(), CaptureError>;

    fn stop(&mut self) -> Result<(), CaptureError>;
}

/// Constructs encoders for streams of type `S`.
pub trait EncoderFactory<S: CaptureStream>: Send + Sync {
    type Encoder: MediaEncoder;

    fn create(&self, stream: &S, events: EncoderEvents) -> Result<Self::Encoder, CaptureError>;
}
