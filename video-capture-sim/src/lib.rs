//! # video-capture-sim
//!
//! Simulated host backend for video-capture-kit.
//!
//! Provides:
//! - `SimulatedCamera` — capture device with scripted grant/deny/not-found/busy answers
//! - `SimulatedStream` — capture stream that counts track stops
//! - `SimulatedEncoderFactory` / `SimulatedEncoder` — encoder driven through an `EncoderProbe`
//!
//! ## Usage
//! ```ignore
//! use video_capture_core::RecordingSession;
//! use video_capture_sim::{SimulatedCamera, SimulatedEncoderFactory};
//!
//! let encoders = SimulatedEncoderFactory::new();
//! let probe = encoders.probe();
//! let mut session = RecordingSession::new(SimulatedCamera::new(), encoders);
//! session.start().await;
//! probe.emit(b"frame".to_vec());
//! session.stop();
//! session.wait_for_stop().await;
//! let artifact = session.complete();
//! ```

pub mod simulated_camera;
pub mod simulated_encoder;

pub use simulated_camera::{CameraBehavior, CameraProbe, SimulatedCamera, SimulatedStream};
pub use simulated_encoder::{
    EncoderOptions, EncoderPhase, EncoderProbe, SimulatedEncoder, SimulatedEncoderFactory,
};
