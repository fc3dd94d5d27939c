use thiserror::Error;

/// Errors that can occur while acquiring or driving a capture session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("capture device not found")]
    DeviceNotFound,

    #[error("capture device busy")]
    DeviceBusy,

    #[error("capture devices not available")]
    DeviceNotAvailable,

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("encoder failed: {0}")]
    EncoderFailed(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Whether this error came from requesting the capture stream.
    ///
    /// Covers both the denied case and the unavailable cases (no device,
    /// device busy, capture API missing on the host).
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied
                | Self::DeviceNotFound
                | Self::DeviceBusy
                | Self::DeviceNotAvailable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_failures_are_classified() {
        assert!(CaptureError::PermissionDenied.is_acquisition_failure());
        assert!(CaptureError::DeviceNotFound.is_acquisition_failure());
        assert!(CaptureError::DeviceBusy.is_acquisition_failure());
        assert!(CaptureError::DeviceNotAvailable.is_acquisition_failure());

        assert!(!CaptureError::EncoderFailed("x".into()).is_acquisition_failure());
        assert!(!CaptureError::ConfigurationFailed("x".into()).is_acquisition_failure());
    }

    #[test]
    fn display_messages() {
        assert_eq!(CaptureError::PermissionDenied.to_string(), "permission denied");
        assert_eq!(
            CaptureError::EncoderFailed("codec gone".into()).to_string(),
            "encoder failed: codec gone"
        );
    }
}
