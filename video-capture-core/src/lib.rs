//! # video-capture-core
//!
//! Platform-agnostic video recording core library.
//!
//! Provides the recording session state machine, ordered fragment buffering
//! and artifact assembly. Host backends (a browser bridge, a native camera
//! stack, the simulator in `video-capture-sim`) implement the `CaptureDevice`
//! and `EncoderFactory` traits and plug into the generic `RecordingSession`.
//!
//! ## Architecture
//!
//! ```text
//! video-capture-core (this crate)
//! ├── traits/       ← CaptureDevice, CaptureStream, MediaEncoder, EncoderFactory, SessionDelegate
//! ├── models/       ← CaptureError, RecordingState, SessionConfiguration, EncoderEvent, Artifact
//! ├── processing/   ← FragmentBuffer
//! ├── session/      ← RecordingSession (generic orchestrator)
//! └── storage/      ← ArtifactStore
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::artifact::{Artifact, ArtifactMetadata, ArtifactRef};
pub use models::capture_models::{TrackInfo, TrackKind};
pub use models::config::{CaptureConstraints, SessionConfiguration, DEFAULT_MEDIA_TYPE};
pub use models::error::CaptureError;
pub use models::event::{EncoderEvent, EncoderEvents};
pub use models::state::RecordingState;
pub use processing::fragment_buffer::{Fragment, FragmentBuffer};
pub use session::recording::RecordingSession;
pub use storage::artifact_store::ArtifactStore;
pub use traits::capture_device::{CaptureDevice, CaptureStream};
pub use traits::media_encoder::{EncoderFactory, MediaEncoder};
pub use traits::session_delegate::SessionDelegate;
