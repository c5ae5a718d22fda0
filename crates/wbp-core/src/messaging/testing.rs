use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{
    domain::{ChatId, MessageId, MessageRef, PhotoUrl},
    errors::Error,
    messaging::{port::MessagingPort, types::MessagingCapabilities},
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Sent {
    Text(String),
    Photo(String),
    Album(Vec<String>),
}

/// Recording messenger. Album sends listed in `fail_albums` (0-based) and photo
/// sends fail when asked to; texts longer than the advertised limit are rejected
/// the way Telegram rejects them.
#[derive(Default)]
pub(crate) struct FakeMessenger {
    pub(crate) next_id: Mutex<i32>,
    pub(crate) calls: Mutex<Vec<(ChatId, Sent, Instant)>>,
    pub(crate) album_attempts: Mutex<usize>,
    pub(crate) fail_albums: Vec<usize>,
    pub(crate) fail_photo: bool,
    pub(crate) fail_text: bool,
}

impl FakeMessenger {
    pub(crate) fn new() -> Self {
        Self {
            next_id: Mutex::new(1),
            ..Default::default()
        }
    }

    fn alloc(&self, chat_id: ChatId) -> MessageRef {
        let mut guard = self.next_id.lock().unwrap();
        let id = *guard;
        *guard += 1;
        MessageRef {
            chat_id,
            message_id: MessageId(id),
        }
    }

    fn record(&self, chat_id: ChatId, sent: Sent) {
        self.calls
            .lock()
            .unwrap()
            .push((chat_id, sent, Instant::now()));
    }

    pub(crate) fn calls(&self) -> Vec<Sent> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, s, _)| s.clone())
            .collect()
    }

    pub(crate) fn timed_calls(&self) -> Vec<(Sent, Instant)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, s, t)| (s.clone(), *t))
            .collect()
    }

    pub(crate) fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn albums(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Album(a) => Some(a),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
            max_album_size: 10,
        }
    }

    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        self.record(chat_id, Sent::Text(text.to_string()));
        if text.chars().count() > self.capabilities().max_message_len {
            return Err(Error::Delivery("message is too long".to_string()));
        }
        if self.fail_text {
            return Err(Error::Delivery("text rejected".to_string()));
        }
        Ok(self.alloc(chat_id))
    }

    async fn send_photo(&self, chat_id: ChatId, photo: &PhotoUrl) -> Result<MessageRef> {
        self.record(chat_id, Sent::Photo(photo.as_str().to_string()));
        if self.fail_photo {
            return Err(Error::Delivery("photo rejected".to_string()));
        }
        Ok(self.alloc(chat_id))
    }

    async fn send_album(&self, chat_id: ChatId, photos: &[PhotoUrl]) -> Result<Vec<MessageRef>> {
        self.record(
            chat_id,
            Sent::Album(photos.iter().map(|p| p.as_str().to_string()).collect()),
        );
        let attempt = {
            let mut n = self.album_attempts.lock().unwrap();
            let cur = *n;
            *n += 1;
            cur
        };
        if self.fail_albums.contains(&attempt) {
            return Err(Error::Delivery(format!("album {attempt} rejected")));
        }
        Ok(photos.iter().map(|_| self.alloc(chat_id)).collect())
    }
}
