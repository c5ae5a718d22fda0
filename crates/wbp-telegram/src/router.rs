use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use wbp_core::{
    catalog::CatalogPort,
    config::Config,
    messaging::{
        port::MessagingPort,
        throttled::{ThrottleConfig, ThrottledMessenger},
    },
    pipeline::Pipeline,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub messenger: Arc<dyn MessagingPort>,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(
        cfg: Arc<Config>,
        messenger: Arc<dyn MessagingPort>,
        catalog: Arc<dyn CatalogPort>,
    ) -> Self {
        let pipeline = Arc::new(Pipeline::new(
            cfg.pipeline,
            &cfg.catalog,
            catalog,
            messenger.clone(),
        ));
        Self {
            cfg,
            messenger,
            pipeline,
        }
    }
}

/// Long-poll Telegram until ctrl-c.
///
/// The dispatcher handles updates from one chat in order and different chats concurrently,
/// so each message gets its own pipeline run without extra locking.
pub async fn run_polling(cfg: Arc<Config>, catalog: Arc<dyn CatalogPort>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "bot started"),
        Err(e) => tracing::warn!(error = %e, "get_me failed; continuing"),
    }
    tracing::info!(
        credentials = cfg.catalog.credentials.len(),
        max_items = cfg.pipeline.max_items,
        dedup = ?cfg.pipeline.dedup,
        "pipeline configured"
    );

    // Wrap the raw Telegram messenger with a throttling decorator to reduce 429s when many chats
    // are active. We still keep a 429 RetryAfter retry at the Telegram adapter layer.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::from(cfg.as_ref()),
    ));

    let state = Arc::new(AppState::new(cfg, messenger, catalog));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_channel_post().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
