use async_trait::async_trait;

use crate::domain::models::OcrDocument;

#[async_trait]
pub trait OcrService: Send + Sync {
    async fn analyze(
        &self,
        image_url: &str,
        language: &str,
        detect_orientation: bool,
    ) -> anyhow::Result<OcrDocument>;
}

pub struct OcrResultAggregator;

impl OcrResultAggregator {
    /// One word per line, in region → line → word order, each followed by
    /// `\n`. A document without regions yields an empty string.
    pub fn aggregate(document: &OcrDocument) -> String {
        document
            .regions
            .iter()
            .flat_map(|region| &region.lines)
            .flat_map(|line| &line.words)
            .fold(String::new(), |mut text, word| {
                text.push_str(&word.text);
                text.push('\n');
                text
            })
    }
}
