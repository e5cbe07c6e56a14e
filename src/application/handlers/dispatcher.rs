use tracing::{debug, warn};

use crate::{
    application::handlers::{image_pipeline::ImagePipeline, text_handler::TextHandler},
    domain::events::{Event, EventCategory, WebhookEnvelope},
};

/// Category → handler table. Holds no business logic.
pub struct Dispatcher {
    text: TextHandler,
    image: ImagePipeline,
}

impl Dispatcher {
    pub fn new(text: TextHandler, image: ImagePipeline) -> Self {
        Self { text, image }
    }

    /// Acts on the first event only; the envelope is consumed so its reply
    /// token cannot be used twice.
    pub async fn dispatch(&self, category: EventCategory, envelope: WebhookEnvelope) {
        let batch_size = envelope.batch_size;
        if batch_size > 1 {
            debug!(batch_size, "ignoring all but the first event in batch");
        }

        match (category, envelope.into_first_event()) {
            (EventCategory::Text, Some(Event::Text(event))) => self.text.handle(event).await,
            (EventCategory::Image, Some(Event::Image(event))) => self.image.process(event).await,
            (EventCategory::Other, event) => {
                if let Some(Event::Other(other)) = event {
                    debug!(
                        event_type = other.event_type.as_deref().unwrap_or("-"),
                        message_type = other.message_type.as_deref().unwrap_or("-"),
                        "ignoring unsupported event"
                    );
                }
            }
            (category, _) => warn!(
                category = category.as_str(),
                "first event does not match its category"
            ),
        }
    }
}
