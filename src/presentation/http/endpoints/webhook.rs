use std::sync::Arc;

use bytes::Bytes;
use poem::{
    handler,
    http::HeaderMap,
    web::{Data, Json},
};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::{domain::errors::WebhookError, presentation::http::endpoints::root::ApiState};

pub const SIGNATURE_HEADER: &str = "X-Line-Signature";

/// Platform webhook. Always answers `200 {}` so the platform never retries;
/// outcomes are visible only in the logs.
#[handler]
pub async fn receive(state: Data<&Arc<ApiState>>, headers: &HeaderMap, body: Bytes) -> Json<Value> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    debug!(body = %String::from_utf8_lossy(&body), "webhook body");
    info!(signature = %signature, "webhook received");

    // Spawned so a dropped connection does not cancel a running pipeline.
    let usecase = state.receive_webhook.clone();
    let outcome = tokio::spawn(async move { usecase.execute(&body, &signature).await }).await;

    match outcome {
        Ok(Ok(category)) => debug!(category = category.as_str(), "webhook handled"),
        Ok(Err(WebhookError::Authentication { provided, computed })) => error!(
            provided = %provided,
            computed = %computed,
            "signature verification failed"
        ),
        Ok(Err(err)) => warn!(error = %err, "webhook body has no actionable event"),
        Err(err) => error!(error = %err, "webhook task did not complete"),
    }

    Json(json!({}))
}
