//! Telegram adapter (teloxide).
//!
//! This crate implements the `wbp-core` MessagingPort over the Telegram Bot API
//! and routes incoming updates into the pipeline.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InputFile, InputMedia, InputMediaPhoto},
};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use wbp_core::{
    config::MAX_ALBUM_SIZE,
    domain::{ChatId, MessageId, MessageRef, PhotoUrl},
    errors::Error,
    messaging::{port::MessagingPort, types::MessagingCapabilities},
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn msg_ref(chat_id: ChatId, msg: &Message) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        }
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Delivery(format!("telegram error: {e}"))
    }

    fn input_file(photo: &PhotoUrl) -> Result<InputFile> {
        let url = reqwest::Url::parse(photo.as_str())
            .map_err(|e| Error::Delivery(format!("invalid photo url {photo}: {e}")))?;
        Ok(InputFile::url(url))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        tracing::warn!(retry_after = ?d, "telegram flood control, retrying once");
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
            max_album_size: MAX_ALBUM_SIZE,
        }
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;
        Ok(Self::msg_ref(chat_id, &msg))
    }

    async fn send_photo(&self, chat_id: ChatId, photo: &PhotoUrl) -> Result<MessageRef> {
        let file = Self::input_file(photo)?;
        let msg = self
            .with_retry(|| self.bot.send_photo(Self::tg_chat(chat_id), file.clone()))
            .await?;
        Ok(Self::msg_ref(chat_id, &msg))
    }

    async fn send_album(&self, chat_id: ChatId, photos: &[PhotoUrl]) -> Result<Vec<MessageRef>> {
        let media = photos
            .iter()
            .map(|p| Self::input_file(p).map(|f| InputMedia::Photo(InputMediaPhoto::new(f))))
            .collect::<Result<Vec<_>>>()?;

        let msgs = self
            .with_retry(|| {
                self.bot
                    .send_media_group(Self::tg_chat(chat_id), media.clone())
            })
            .await?;
        Ok(msgs.iter().map(|m| Self::msg_ref(chat_id, m)).collect())
    }
}

/// Map Telegram's chat type onto the pipeline's notion of chat kind.
pub fn chat_kind(chat: &teloxide::types::Chat) -> wbp_core::domain::ChatKind {
    use wbp_core::domain::ChatKind;

    if chat.is_private() {
        ChatKind::Private
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else if chat.is_channel() {
        ChatKind::Channel
    } else {
        ChatKind::Group
    }
}
