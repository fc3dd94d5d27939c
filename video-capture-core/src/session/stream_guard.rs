use std::ops::Deref;

use crate::traits::capture_device::CaptureStream;

/// Owns an acquired capture stream and stops its tracks when dropped.
///
/// This is the only place capture tracks are stopped by the session, so
/// every exit path (normal stop, failed start, session dropped) releases
/// the device exactly once.
pub(crate) struct StreamGuard<S: CaptureStream> {
    stream: S,
}

impl<S: CaptureStream> StreamGuard<S> {
    pub(crate) fn new(stream: S) -> Self {
        log::debug!("acquired capture stream {}", stream.id());
        Self { stream }
    }
}

impl<S: CaptureStream> Deref for StreamGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.stream
    }
}

impl<S: CaptureStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        log::info!(
            "releasing capture stream {} ({} tracks)",
            self.stream.id(),
            self.stream.tracks().len()
        );
        self.stream.stop_tracks();
    }
}
