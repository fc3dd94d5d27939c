use serde::{Deserialize, Serialize};

/// Media type attached to assembled artifacts unless configured otherwise.
pub const DEFAULT_MEDIA_TYPE: &str = "video/webm";

/// Which kinds of tracks to request from the capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

/// Configuration for a recording session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfiguration {
    /// Tracks requested from the capture device (default: video only).
    pub constraints: CaptureConstraints,

    /// Media type tagged on the assembled artifact (default: `video/webm`).
    pub media_type: String,
}

impl SessionConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !self.constraints.video {
            return Err("video capture must be requested".into());
        }
        let Some(subtype) = self.media_type.strip_prefix("video/") else {
            return Err(format!("unsupported media type: {}", self.media_type));
        };
        if subtype.is_empty() {
            return Err(format!("unsupported media type: {}", self.media_type));
        }
        Ok(())
    }
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            constraints: CaptureConstraints::default(),
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_video_only_webm() {
        let config = SessionConfiguration::default();
        assert!(config.constraints.video);
        assert!(!config.constraints.audio);
        assert_eq!(config.media_type, "video/webm");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_missing_video() {
        let config = SessionConfiguration {
            constraints: CaptureConstraints {
                video: false,
                audio: true,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_video_media_type() {
        for media_type in ["audio/ogg", "video/", ""] {
            let config = SessionConfiguration {
                media_type: media_type.to_string(),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{media_type} should be rejected");
        }
    }

    #[test]
    fn accepts_other_video_containers() {
        let config = SessionConfiguration {
            media_type: "video/mp4".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
