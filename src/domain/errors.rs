use std::fmt;

use thiserror::Error;

/// Failures that stop a webhook before any event is acted upon.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("signature mismatch: provided '{provided}', computed '{computed}'")]
    Authentication { provided: String, computed: String },
    #[error("malformed webhook body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("event with discriminator '{discriminator}' has an unexpected shape: {source}")]
    MalformedEvent {
        discriminator: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    ResolveRecipient,
    FetchContent,
    StoreAsset,
    NotifyStored,
    Recognize,
    NotifyRecognized,
}

impl PipelineStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::ResolveRecipient => "resolve_recipient",
            PipelineStep::FetchContent => "fetch_content",
            PipelineStep::StoreAsset => "store_asset",
            PipelineStep::NotifyStored => "notify_stored",
            PipelineStep::Recognize => "recognize",
            PipelineStep::NotifyRecognized => "notify_recognized",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external call failed; the image pipeline stops at `step`.
#[derive(Debug, Error)]
#[error("image pipeline stopped at {step}: {source:#}")]
pub struct PipelineError {
    pub step: PipelineStep,
    #[source]
    pub source: anyhow::Error,
}

impl PipelineError {
    pub fn new(step: PipelineStep, source: impl Into<anyhow::Error>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }
}
