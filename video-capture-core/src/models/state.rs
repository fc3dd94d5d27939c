use serde::{Deserialize, Serialize};

/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle → recording ↔ paused
///            ↓          ↓
///            stopping ←─┘
///               ↓ (encoder reports stopped)
///            stopped → idle (reset)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
    Paused,
    /// Stop was requested; waiting for the encoder to report it has stopped.
    Stopping,
    Stopped,
}

impl RecordingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// True while a session is live: recording or paused.
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Whether the session still owns the capture stream and encoder.
    pub fn holds_capture(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused | Self::Stopping)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_state() {
        assert!(!RecordingState::Idle.is_recording());
        assert!(RecordingState::Recording.is_recording());
        assert!(RecordingState::Paused.is_recording());
        assert!(RecordingState::Paused.is_paused());
        assert!(!RecordingState::Recording.is_paused());
        assert!(!RecordingState::Stopping.is_recording());
        assert!(!RecordingState::Stopped.is_recording());
    }

    #[test]
    fn capture_is_held_until_stopped() {
        assert!(RecordingState::Stopping.holds_capture());
        assert!(!RecordingState::Stopped.holds_capture());
        assert!(!RecordingState::Idle.holds_capture());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&RecordingState::Stopping).unwrap();
        assert_eq!(json, "\"stopping\"");
        assert_eq!(RecordingState::default(), RecordingState::Idle);
    }
}
