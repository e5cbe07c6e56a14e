use serde::Deserialize;

use crate::domain::value_objects::ReplyToken;

/// Inbound webhook payload. Only the first event is decoded and acted
/// upon; the rest of the batch is counted, never read.
#[derive(Debug)]
pub struct WebhookEnvelope {
    pub destination: String,
    pub first: Option<Event>,
    pub batch_size: usize,
}

impl WebhookEnvelope {
    pub fn first_event(&self) -> Option<&Event> {
        self.first.as_ref()
    }

    pub fn into_first_event(self) -> Option<Event> {
        self.first
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Text,
    Image,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Text => "text",
            EventCategory::Image => "image",
            EventCategory::Other => "other",
        }
    }
}

#[derive(Debug)]
pub enum Event {
    Text(TextEvent),
    Image(ImageEvent),
    Other(OtherEvent),
}

impl Event {
    pub fn category(&self) -> EventCategory {
        match self {
            Event::Text(_) => EventCategory::Text,
            Event::Image(_) => EventCategory::Image,
            Event::Other(_) => EventCategory::Other,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEvent {
    pub reply_token: ReplyToken,
    pub source: EventSource,
    pub timestamp: i64,
    pub message: TextMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextMessage {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEvent {
    pub reply_token: Option<ReplyToken>,
    pub source: EventSource,
    pub timestamp: i64,
    pub message: ImageMessage,
}

/// `id` is the platform content handle, valid only for a short time.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageMessage {
    #[serde(rename = "id")]
    pub content_id: String,
}

/// Anything that is not a text or image message: follow, postback,
/// sticker and so on. Kept only for logging.
#[derive(Debug, Clone)]
pub struct OtherEvent {
    pub event_type: Option<String>,
    pub message_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    User,
    Group,
    Room,
    #[serde(other)]
    Unknown,
}
