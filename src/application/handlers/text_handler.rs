use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::{
    application::services::messenger::MessagingClient,
    domain::{events::TextEvent, models::OutboundMessage},
};

/// Echoes a text message back through the event's reply token.
pub struct TextHandler {
    messenger: Arc<dyn MessagingClient>,
}

impl TextHandler {
    pub fn new(messenger: Arc<dyn MessagingClient>) -> Self {
        Self { messenger }
    }

    /// A failed reply is logged only; reply tokens cannot be retried.
    pub async fn handle(&self, event: TextEvent) {
        let reply = compose_echo(&event.message.text, Local::now());
        let user_id = event.source.user_id.as_deref().unwrap_or("-");
        debug!(
            user_id,
            source = ?event.source.kind,
            message_id = %event.message.id,
            timestamp = event.timestamp,
            reply_chars = reply.body().chars().count(),
            "echoing text message"
        );

        match self.messenger.reply(event.reply_token, &[reply]).await {
            Ok(()) => info!(user_id, "text echo sent"),
            Err(err) => error!(user_id, error = %format!("{err:#}"), "failed to send text echo"),
        }
    }
}

fn compose_echo(text: &str, now: DateTime<Local>) -> OutboundMessage {
    OutboundMessage::text(format!(
        "You said:\n{text}\nat {}",
        now.format("%Y-%m-%d %H:%M:%S %:z")
    ))
}
