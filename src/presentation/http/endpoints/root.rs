use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::usecases::receive_webhook::ReceiveWebhookUseCase;

#[derive(Clone)]
pub struct ApiState {
    pub receive_webhook: Arc<ReceiveWebhookUseCase>,
}

/// Documented API; the webhook itself is mounted outside it.
pub struct Endpoints;

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
}
