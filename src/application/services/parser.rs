use serde::Deserialize;
use serde_json::Value;

use crate::domain::{
    errors::WebhookError,
    events::{Event, EventCategory, OtherEvent, WebhookEnvelope},
};

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    destination: String,
    #[serde(default)]
    events: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Discriminator {
    #[serde(rename = "type")]
    event_type: Option<String>,
    message: Option<MessageDiscriminator>,
}

#[derive(Debug, Deserialize)]
struct MessageDiscriminator {
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl Discriminator {
    fn read(value: &Value) -> Self {
        Discriminator::deserialize(value).unwrap_or_default()
    }

    fn message_kind(&self) -> Option<&str> {
        self.message.as_ref().and_then(|message| message.kind.as_deref())
    }

    fn category(&self) -> EventCategory {
        if !matches!(self.event_type.as_deref(), None | Some("message")) {
            return EventCategory::Other;
        }
        match self.message_kind() {
            Some("text") => EventCategory::Text,
            Some("image") => EventCategory::Image,
            _ => EventCategory::Other,
        }
    }
}

/// Decodes webhook bodies into typed events.
///
/// The first event is read in two passes: the discriminator first, then the
/// payload for that one shape. Unknown shapes become [`Event::Other`]. Later
/// events stay raw JSON and cannot fail the parse.
pub struct EventParser;

impl EventParser {
    pub fn parse(raw: &[u8]) -> Result<WebhookEnvelope, WebhookError> {
        let envelope: RawEnvelope = serde_json::from_slice(raw)?;
        let batch_size = envelope.events.len();
        let first = envelope
            .events
            .into_iter()
            .next()
            .map(Self::decode_event)
            .transpose()?;

        Ok(WebhookEnvelope {
            destination: envelope.destination,
            first,
            batch_size,
        })
    }

    /// Category of the first event. Later events in a batch are not
    /// considered; an empty batch is [`EventCategory::Other`].
    pub fn determine(envelope: &WebhookEnvelope) -> EventCategory {
        envelope
            .first_event()
            .map(Event::category)
            .unwrap_or(EventCategory::Other)
    }

    fn decode_event(value: Value) -> Result<Event, WebhookError> {
        let discriminator = Discriminator::read(&value);
        let malformed = |source| WebhookError::MalformedEvent {
            discriminator: discriminator.message_kind().unwrap_or_default().to_string(),
            source,
        };

        match discriminator.category() {
            EventCategory::Text => serde_json::from_value(value)
                .map(Event::Text)
                .map_err(malformed),
            EventCategory::Image => serde_json::from_value(value)
                .map(Event::Image)
                .map_err(malformed),
            EventCategory::Other => Ok(Event::Other(OtherEvent {
                event_type: discriminator.event_type.clone(),
                message_type: discriminator.message_kind().map(str::to_string),
            })),
        }
    }
}
