use std::{sync::Arc, time::Duration};

use crate::{
    batch::BatchReport,
    domain::{ChatId, PhotoUrl},
    messaging::{port::MessagingPort, types::DeliveryOutcome},
};

/// Split `photos` into consecutive chunks of at most `size` (minimum 1), order kept.
pub fn chunk_photos(photos: &[PhotoUrl], size: usize) -> Vec<&[PhotoUrl]> {
    photos.chunks(size.max(1)).collect()
}

/// What happened to each outbound send of one message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// One entry per album (or the single photo), in send order.
    pub photo_sends: Vec<DeliveryOutcome>,
    pub summary: Option<DeliveryOutcome>,
}

impl DispatchReport {
    pub fn failed_sends(&self) -> usize {
        self.photo_sends.iter().filter(|o| !o.is_sent()).count()
    }
}

/// Delivers found photos as paced albums, then the summary text.
#[derive(Clone)]
pub struct ResponseDispatcher {
    messenger: Arc<dyn MessagingPort>,
    chunk_size: usize,
    album_pacing: Duration,
    max_message_len: usize,
}

impl ResponseDispatcher {
    pub fn new(messenger: Arc<dyn MessagingPort>, chunk_size: usize, album_pacing: Duration) -> Self {
        let caps = messenger.capabilities();
        let max = caps.max_album_size.max(1);
        Self {
            messenger,
            chunk_size: chunk_size.clamp(1, max),
            album_pacing,
            max_message_len: caps.max_message_len.max(1),
        }
    }

    pub async fn dispatch(
        &self,
        chat_id: ChatId,
        photos: &[PhotoUrl],
        report: &BatchReport,
    ) -> DispatchReport {
        let mut out = DispatchReport::default();

        match photos {
            [] => {}
            [single] => {
                let outcome = DeliveryOutcome::from(self.messenger.send_photo(chat_id, single).await);
                if let DeliveryOutcome::Failed(reason) = &outcome {
                    tracing::error!(chat_id = chat_id.0, %reason, "failed to send photo");
                }
                out.photo_sends.push(outcome);
            }
            _ => {
                for (idx, chunk) in chunk_photos(photos, self.chunk_size).into_iter().enumerate() {
                    let outcome =
                        DeliveryOutcome::from(self.messenger.send_album(chat_id, chunk).await);
                    if let DeliveryOutcome::Failed(reason) = &outcome {
                        tracing::error!(
                            chat_id = chat_id.0,
                            album = idx,
                            size = chunk.len(),
                            %reason,
                            "failed to send album"
                        );
                    }
                    out.photo_sends.push(outcome);

                    // Pause after every album, the last one included.
                    if !self.album_pacing.is_zero() {
                        tokio::time::sleep(self.album_pacing).await;
                    }
                }
            }
        }

        // A long summary goes out as several texts; one failed part does not stop the rest.
        let mut summary = DeliveryOutcome::Sent;
        for (part, text) in report
            .summary_messages(self.max_message_len)
            .iter()
            .enumerate()
        {
            let outcome = DeliveryOutcome::from(self.messenger.send_text(chat_id, text).await);
            if let DeliveryOutcome::Failed(reason) = outcome {
                tracing::error!(chat_id = chat_id.0, part, %reason, "failed to send summary");
                if summary.is_sent() {
                    summary = DeliveryOutcome::Failed(reason);
                }
            }
        }
        out.summary = Some(summary);

        out
    }
}
