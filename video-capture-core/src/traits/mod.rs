pub mod capture_device;
pub mod media_encoder;
pub mod session_delegate;
