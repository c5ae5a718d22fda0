use std::sync::Arc;

use teloxide::prelude::*;

use wbp_core::{
    domain::ChatId, messaging::types::IncomingText, pipeline::PipelineOutcome,
};

use crate::{chat_kind, router::AppState};

pub async fn handle_text(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let incoming = IncomingText {
        chat_id: ChatId(msg.chat.id.0),
        chat_kind: chat_kind(&msg.chat),
        text: text.to_string(),
    };

    if let PipelineOutcome::Ignored = state.pipeline.handle_text(incoming).await {
        tracing::trace!(chat_id = msg.chat.id.0, "no identifiers in group message");
    }

    Ok(())
}
