use std::sync::Arc;

use teloxide::prelude::*;

use wbp_core::{domain::ChatId, pipeline::GREETING};

use crate::router::AppState;

fn parse_command(text: &str) -> String {
    // Telegram may send `/cmd@botname arg1 ...`
    let first = text.split_whitespace().next().unwrap_or("");
    first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let text = msg.text().unwrap_or("");
    let chat_id = ChatId(msg.chat.id.0);

    match parse_command(text).as_str() {
        "start" | "help" => {
            if let Err(e) = state.messenger.send_text(chat_id, GREETING).await {
                tracing::error!(chat_id = chat_id.0, error = %e, "failed to send greeting");
            }
        }
        other => tracing::debug!(chat_id = chat_id.0, command = other, "ignoring command"),
    }

    Ok(())
}
