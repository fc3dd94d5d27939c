use tokio::sync::mpsc::UnboundedSender;

/// Notification emitted by a media encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// One chunk of encoded media, in emission order.
    Fragment(Vec<u8>),
    /// The encoder has shut down. No fragment follows this event.
    Stopped,
}

/// Sending half of a session's encoder notification channel.
///
/// Handed to the encoder when it is created. Each session start opens a
/// fresh channel, so events from a previous encoder never reach a new session.
#[derive(Debug, Clone)]
pub struct EncoderEvents {
    tx: UnboundedSender<EncoderEvent>,
}

impl EncoderEvents {
    /// Wrap a sender. Sessions create these themselves; this is public so
    /// encoder backends can be exercised against a bare channel.
    pub fn new(tx: UnboundedSender<EncoderEvent>) -> Self {
        Self { tx }
    }

    /// Deliver an encoded fragment. Returns `false` if the session is gone.
    pub fn fragment(&self, data: Vec<u8>) -> bool {
        self.tx.send(EncoderEvent::Fragment(data)).is_ok()
    }

    /// Report that the encoder has stopped. Returns `false` if the session is gone.
    pub fn stopped(&self) -> bool {
        self.tx.send(EncoderEvent::Stopped).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
