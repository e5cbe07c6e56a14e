//! Recording fakes for the three external collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    application::{
        handlers::{
            dispatcher::Dispatcher,
            image_pipeline::{ImagePipeline, ImagePipelineConfig},
            text_handler::TextHandler,
        },
        services::{messenger::MessagingClient, ocr::OcrService, signature::SignatureVerifier},
        usecases::receive_webhook::ReceiveWebhookUseCase,
    },
    domain::{
        models::{ImageContent, OcrDocument, OcrLine, OcrRegion, OcrWord, OutboundMessage},
        repositories::BlobStore,
        value_objects::ReplyToken,
    },
    infrastructure::storage::in_memory::InMemoryBlobStore,
};

pub const CHANNEL_SECRET: &str = "test-channel-secret";
pub const CONTAINER: &str = "images";
pub const PUBLIC_ENDPOINT: &str = "https://blobs.test";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessengerCall {
    FetchContent(String),
    Reply {
        reply_token: String,
        messages: Vec<OutboundMessage>,
    },
    Push {
        user_id: String,
        messages: Vec<OutboundMessage>,
    },
}

pub struct RecordingMessenger {
    content_type: Option<String>,
    fail_fetch: bool,
    fail_sends: bool,
    calls: Mutex<Vec<MessengerCall>>,
}

impl RecordingMessenger {
    fn build(content_type: Option<&str>, fail_fetch: bool, fail_sends: bool) -> Arc<Self> {
        Arc::new(Self {
            content_type: content_type.map(str::to_string),
            fail_fetch,
            fail_sends,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn new() -> Arc<Self> {
        Self::with_content("image/png")
    }

    pub fn with_content(content_type: &str) -> Arc<Self> {
        Self::build(Some(content_type), false, false)
    }

    pub fn without_content_type() -> Arc<Self> {
        Self::build(None, false, false)
    }

    pub fn failing_fetch() -> Arc<Self> {
        Self::build(Some("image/png"), true, false)
    }

    pub fn failing_sends() -> Arc<Self> {
        Self::build(Some("image/png"), false, true)
    }

    pub fn calls(&self) -> Vec<MessengerCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MessengerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MessagingClient for RecordingMessenger {
    async fn fetch_content(&self, content_id: &str) -> anyhow::Result<ImageContent> {
        self.record(MessengerCall::FetchContent(content_id.to_string()));
        if self.fail_fetch {
            anyhow::bail!("content {content_id} expired");
        }
        Ok(ImageContent {
            bytes: Bytes::from_static(b"image-bytes"),
            content_type: self.content_type.clone(),
        })
    }

    async fn reply(
        &self,
        reply_token: ReplyToken,
        messages: &[OutboundMessage],
    ) -> anyhow::Result<()> {
        self.record(MessengerCall::Reply {
            reply_token: reply_token.as_str().to_string(),
            messages: messages.to_vec(),
        });
        if self.fail_sends {
            anyhow::bail!("Invalid reply token");
        }
        Ok(())
    }

    async fn push(&self, user_id: &str, messages: &[OutboundMessage]) -> anyhow::Result<()> {
        self.record(MessengerCall::Push {
            user_id: user_id.to_string(),
            messages: messages.to_vec(),
        });
        if self.fail_sends {
            anyhow::bail!("push rejected");
        }
        Ok(())
    }
}

pub struct StubOcr {
    document: Option<OcrDocument>,
    requests: Mutex<Vec<(String, String, bool)>>,
}

impl StubOcr {
    pub fn returning(document: OcrDocument) -> Arc<Self> {
        Arc::new(Self {
            document: Some(document),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            document: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<(String, String, bool)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrService for StubOcr {
    async fn analyze(
        &self,
        image_url: &str,
        language: &str,
        detect_orientation: bool,
    ) -> anyhow::Result<OcrDocument> {
        self.requests.lock().unwrap().push((
            image_url.to_string(),
            language.to_string(),
            detect_orientation,
        ));
        self.document
            .clone()
            .ok_or_else(|| anyhow::anyhow!("ocr service unavailable"))
    }
}

pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn save(
        &self,
        container: &str,
        _file_name: &str,
        _bytes: Bytes,
        _content_type: Option<&str>,
    ) -> anyhow::Result<String> {
        anyhow::bail!("container {container} is not writable")
    }
}

/// One region whose lines hold the given words.
pub fn document(lines: &[&[&str]]) -> OcrDocument {
    OcrDocument {
        regions: vec![OcrRegion {
            bounding_box: None,
            lines: lines
                .iter()
                .map(|words| OcrLine {
                    bounding_box: None,
                    words: words
                        .iter()
                        .map(|text| OcrWord {
                            bounding_box: None,
                            text: text.to_string(),
                        })
                        .collect(),
                })
                .collect(),
        }],
        ..Default::default()
    }
}

pub struct Harness {
    pub messenger: Arc<RecordingMessenger>,
    pub store: Arc<InMemoryBlobStore>,
    pub ocr: Arc<StubOcr>,
    pub usecase: Arc<ReceiveWebhookUseCase>,
}

impl Harness {
    pub fn new(ocr_document: OcrDocument) -> Self {
        let messenger = RecordingMessenger::new();
        let store = Arc::new(InMemoryBlobStore::new(PUBLIC_ENDPOINT));
        let ocr = StubOcr::returning(ocr_document);

        let dispatcher = Dispatcher::new(
            TextHandler::new(messenger.clone()),
            ImagePipeline::new(
                messenger.clone(),
                store.clone(),
                ocr.clone(),
                ImagePipelineConfig {
                    container: CONTAINER.to_string(),
                },
            ),
        );
        let usecase = Arc::new(ReceiveWebhookUseCase::new(
            SignatureVerifier::new(CHANNEL_SECRET),
            dispatcher,
        ));

        Self {
            messenger,
            store,
            ocr,
            usecase,
        }
    }

    pub fn sign(body: &[u8]) -> String {
        SignatureVerifier::new(CHANNEL_SECRET).sign(body)
    }
}

pub fn text_webhook(text: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "destination": "Ubot",
        "events": [{
            "type": "message",
            "replyToken": "9b3b1ebbae04424795449febea80ebb1",
            "source": { "userId": "U9b91b518d6888d33993f22", "type": "user" },
            "timestamp": 1555777816998i64,
            "message": { "type": "text", "id": "9727800348111", "text": text }
        }]
    }))
    .unwrap()
}

pub fn image_webhook() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "destination": "Ubot",
        "events": [{
            "type": "message",
            "replyToken": "34e78522e9fc4017a856b2b48139ff1e",
            "source": { "userId": "U9b91b518d6888d33993f22", "type": "user" },
            "timestamp": 1556126154438i64,
            "message": { "type": "image", "id": "9750780588237", "contentProvider": { "type": "line" } }
        }]
    }))
    .unwrap()
}
