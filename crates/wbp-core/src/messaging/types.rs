use crate::domain::{ChatId, ChatKind};

/// A plain text message that reached the pipeline.
///
/// Commands and non-text updates are filtered out by the adapter's router.
#[derive(Clone, Debug)]
pub struct IncomingText {
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    pub text: String,
}

/// Capabilities / limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
    pub max_album_size: usize,
}

/// Result of one outbound photo/album send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent)
    }
}

impl<T> From<crate::Result<T>> for DeliveryOutcome {
    fn from(r: crate::Result<T>) -> Self {
        match r {
            Ok(_) => DeliveryOutcome::Sent,
            Err(e) => DeliveryOutcome::Failed(e.to_string()),
        }
    }
}
