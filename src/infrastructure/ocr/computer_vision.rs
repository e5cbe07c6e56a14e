use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{application::services::ocr::OcrService, domain::models::OcrDocument};

#[derive(Clone)]
pub struct ComputerVisionConfig {
    pub endpoint: String,
    pub api_key: String,
}

/// Computer Vision `ocr` endpoint; the image is passed by URL.
pub struct ComputerVisionClient {
    http: Client,
    config: ComputerVisionConfig,
}

impl ComputerVisionClient {
    pub fn new(http: Client, config: ComputerVisionConfig) -> Self {
        Self { http, config }
    }
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    url: &'a str,
}

#[async_trait]
impl OcrService for ComputerVisionClient {
    async fn analyze(
        &self,
        image_url: &str,
        language: &str,
        detect_orientation: bool,
    ) -> anyhow::Result<OcrDocument> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .query(&[
                ("language", language),
                ("detectOrientation", if detect_orientation { "true" } else { "false" }),
            ])
            .header("Ocp-Apim-Subscription-Key", &self.config.api_key)
            .json(&AnalyzeRequest { url: image_url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("ocr returned {status}: {body}");
        }

        Ok(response.json::<OcrDocument>().await?)
    }
}
