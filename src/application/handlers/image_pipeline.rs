use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    application::services::{
        messenger::MessagingClient,
        ocr::{OcrResultAggregator, OcrService},
    },
    domain::{
        errors::{PipelineError, PipelineStep},
        events::ImageEvent,
        models::{ImageContent, OcrDocument, OutboundMessage, StoredAsset},
        repositories::BlobStore,
        value_objects::BlobFileName,
    },
};

pub const OCR_LANGUAGE: &str = "en";

pub struct ImagePipelineConfig {
    pub container: String,
}

#[derive(Debug)]
pub struct PipelineReport {
    pub asset: StoredAsset,
    pub recognized_text: String,
}

/// Fetch → store → notify → OCR → notify, one attempt per step.
///
/// Every outbound message is a push addressed to the sender: by the time the
/// first external call returns, the event's reply token may have expired.
pub struct ImagePipeline {
    messenger: Arc<dyn MessagingClient>,
    blob_store: Arc<dyn BlobStore>,
    ocr: Arc<dyn OcrService>,
    config: ImagePipelineConfig,
}

impl ImagePipeline {
    pub fn new(
        messenger: Arc<dyn MessagingClient>,
        blob_store: Arc<dyn BlobStore>,
        ocr: Arc<dyn OcrService>,
        config: ImagePipelineConfig,
    ) -> Self {
        Self {
            messenger,
            blob_store,
            ocr,
            config,
        }
    }

    /// Runs the pipeline and logs the outcome. Failures stop at the
    /// failing step and are never reported to the sender.
    pub async fn process(&self, event: ImageEvent) {
        let content_id = event.message.content_id.clone();
        debug!(
            content_id = %content_id,
            timestamp = event.timestamp,
            has_reply_token = event.reply_token.is_some(),
            "processing image; replies go out as pushes"
        );
        match self.run(event).await {
            Ok(report) => info!(
                content_id = %content_id,
                file_name = %report.asset.file_name,
                url = %report.asset.url,
                content_type = report.asset.content_type.as_deref().unwrap_or("-"),
                recognized_bytes = report.recognized_text.len(),
                "image pipeline finished"
            ),
            Err(err) => error!(
                content_id = %content_id,
                step = %err.step,
                error = %format!("{:#}", err.source),
                "image pipeline failed"
            ),
        }
    }

    pub async fn run(&self, event: ImageEvent) -> Result<PipelineReport, PipelineError> {
        let recipient = Self::resolve_recipient(&event)?;
        let content = self.fetch_content(&event.message.content_id).await?;
        let asset = self.store(content).await?;

        self.notify(
            recipient,
            PipelineStep::NotifyStored,
            format!("Your image is stored here:\n{}", asset.url),
        )
        .await?;

        let document = self.recognize(&asset).await?;
        let recognized_text = OcrResultAggregator::aggregate(&document);

        self.notify(
            recipient,
            PipelineStep::NotifyRecognized,
            format!("In the image above I found:\n{recognized_text}"),
        )
        .await?;

        Ok(PipelineReport {
            asset,
            recognized_text,
        })
    }

    fn resolve_recipient(event: &ImageEvent) -> Result<&str, PipelineError> {
        event.source.user_id.as_deref().ok_or_else(|| {
            PipelineError::new(
                PipelineStep::ResolveRecipient,
                anyhow::anyhow!("image event has no sender user id"),
            )
        })
    }

    async fn fetch_content(&self, content_id: &str) -> Result<ImageContent, PipelineError> {
        self.messenger
            .fetch_content(content_id)
            .await
            .map_err(|err| PipelineError::new(PipelineStep::FetchContent, err))
    }

    async fn store(&self, content: ImageContent) -> Result<StoredAsset, PipelineError> {
        let file_name = BlobFileName::generate(content.content_type.as_deref());
        let url = self
            .blob_store
            .save(
                &self.config.container,
                file_name.as_str(),
                content.bytes,
                content.content_type.as_deref(),
            )
            .await
            .map_err(|err| PipelineError::new(PipelineStep::StoreAsset, err))?;

        Ok(StoredAsset {
            url,
            file_name,
            content_type: content.content_type,
        })
    }

    async fn recognize(&self, asset: &StoredAsset) -> Result<OcrDocument, PipelineError> {
        let document = self
            .ocr
            .analyze(&asset.url, OCR_LANGUAGE, true)
            .await
            .map_err(|err| PipelineError::new(PipelineStep::Recognize, err))?;

        debug!(
            language = document.language.as_deref().unwrap_or("-"),
            orientation = document.orientation.as_deref().unwrap_or("-"),
            text_angle = document.text_angle.unwrap_or_default(),
            regions = document.regions.len(),
            located_boxes = document.located_boxes(),
            first_region = %document
                .regions
                .first()
                .and_then(|region| region.bounding_box)
                .map(|bounding_box| bounding_box.to_string())
                .unwrap_or_default(),
            "ocr document received"
        );
        Ok(document)
    }

    async fn notify(
        &self,
        recipient: &str,
        step: PipelineStep,
        text: String,
    ) -> Result<(), PipelineError> {
        self.messenger
            .push(recipient, &[OutboundMessage::text(text)])
            .await
            .map_err(|err| PipelineError::new(step, err))
    }
}
