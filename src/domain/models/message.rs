use serde::Serialize;

/// Outbound message as the platform's send endpoints expect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Text { text: String },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    pub fn body(&self) -> &str {
        match self {
            OutboundMessage::Text { text } => text,
        }
    }
}
