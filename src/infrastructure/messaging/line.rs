use async_trait::async_trait;
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::{
    application::services::messenger::MessagingClient,
    domain::{
        models::{ImageContent, OutboundMessage},
        value_objects::ReplyToken,
    },
};

#[derive(Clone)]
pub struct LineConfig {
    pub channel_access_token: String,
    pub api_base: String,
    pub data_api_base: String,
}

/// LINE Messaging API: content download, reply and push.
pub struct LineClient {
    http: Client,
    config: LineConfig,
}

impl LineClient {
    pub fn new(http: Client, config: LineConfig) -> Self {
        Self { http, config }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v2/bot/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    fn data_url(&self, path: &str) -> String {
        format!(
            "{}/v2/bot/{}",
            self.config.data_api_base.trim_end_matches('/'),
            path
        )
    }

    async fn post_messages<T: Serialize + Sync>(&self, path: &str, body: &T) -> anyhow::Result<()> {
        let response = self
            .http
            .post(self.api_url(path))
            .bearer_auth(&self.config.channel_access_token)
            .json(body)
            .send()
            .await?;

        Self::ensure_success(response, path).await?;
        Ok(())
    }

    async fn ensure_success(response: Response, operation: &str) -> anyhow::Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<LineErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| "unreadable error body".to_string());
        anyhow::bail!("line {operation} returned {status}: {detail}")
    }
}

#[async_trait]
impl MessagingClient for LineClient {
    async fn fetch_content(&self, content_id: &str) -> anyhow::Result<ImageContent> {
        let response = self
            .http
            .get(self.data_url(&format!("message/{content_id}/content")))
            .bearer_auth(&self.config.channel_access_token)
            .send()
            .await?;
        let response = Self::ensure_success(response, "content").await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(ImageContent {
            bytes,
            content_type,
        })
    }

    async fn reply(
        &self,
        reply_token: ReplyToken,
        messages: &[OutboundMessage],
    ) -> anyhow::Result<()> {
        self.post_messages(
            "message/reply",
            &ReplyRequest {
                reply_token: reply_token.as_str(),
                messages,
            },
        )
        .await
    }

    async fn push(&self, user_id: &str, messages: &[OutboundMessage]) -> anyhow::Result<()> {
        self.post_messages(
            "message/push",
            &PushRequest {
                to: user_id,
                messages,
            },
        )
        .await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [OutboundMessage],
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: &'a [OutboundMessage],
}

#[derive(Debug, Deserialize)]
struct LineErrorBody {
    message: String,
}
