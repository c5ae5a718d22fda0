use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef, PhotoUrl},
    messaging::types::MessagingCapabilities,
    Result,
};

/// Outbound messaging port.
///
/// Telegram is the only implementation; tests plug in recording fakes.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_photo(&self, chat_id: ChatId, photo: &PhotoUrl) -> Result<MessageRef>;

    /// Send up to `max_album_size` photos as one grouped message.
    async fn send_album(&self, chat_id: ChatId, photos: &[PhotoUrl]) -> Result<Vec<MessageRef>>;
}
