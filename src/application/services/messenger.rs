use async_trait::async_trait;

use crate::domain::{
    models::{ImageContent, OutboundMessage},
    value_objects::ReplyToken,
};

/// The messaging platform: content retrieval and both send modes.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn fetch_content(&self, content_id: &str) -> anyhow::Result<ImageContent>;

    /// Answers an event through its reply token. The token is consumed.
    async fn reply(
        &self,
        reply_token: ReplyToken,
        messages: &[OutboundMessage],
    ) -> anyhow::Result<()>;

    /// Sends to a user directly; usable at any time.
    async fn push(&self, user_id: &str, messages: &[OutboundMessage]) -> anyhow::Result<()>;
}
