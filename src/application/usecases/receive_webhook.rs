use tracing::info;

use crate::{
    application::{
        handlers::dispatcher::Dispatcher,
        services::{parser::EventParser, signature::SignatureVerifier},
    },
    domain::{errors::WebhookError, events::EventCategory},
};

/// Verify → parse → determine → dispatch for one webhook delivery.
pub struct ReceiveWebhookUseCase {
    verifier: SignatureVerifier,
    dispatcher: Dispatcher,
}

impl ReceiveWebhookUseCase {
    pub fn new(verifier: SignatureVerifier, dispatcher: Dispatcher) -> Self {
        Self {
            verifier,
            dispatcher,
        }
    }

    /// Returns the category that was acted upon. Handler failures are
    /// logged by the handlers themselves and do not surface here.
    pub async fn execute(
        &self,
        body: &[u8],
        signature: &str,
    ) -> Result<EventCategory, WebhookError> {
        let check = self.verifier.verify(body, signature);
        if !check.valid {
            return Err(WebhookError::Authentication {
                provided: signature.to_string(),
                computed: check.computed,
            });
        }

        let envelope = EventParser::parse(body)?;
        let category = EventParser::determine(&envelope);
        info!(
            destination = %envelope.destination,
            category = category.as_str(),
            "webhook accepted"
        );

        self.dispatcher.dispatch(category, envelope).await;
        Ok(category)
    }
}
