// The chat platform as seen by the core.
//
// Handlers receive a gateway explicitly instead of reaching for a global
// client, which lets the tests swap in a recording fake.

use crate::core::authorization::MemberSnapshot;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Not found")]
    NotFound,
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Who wrote a message. Looked up only once a reaction has passed every
/// reactor-side gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageAuthor {
    pub user_id: u64,
    pub is_bot: bool,
}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Fresh role/permission snapshot of a guild member.
    async fn fetch_member(&self, guild_id: u64, user_id: u64)
        -> Result<MemberSnapshot, GatewayError>;

    async fn fetch_message_author(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<MessageAuthor, GatewayError>;

    /// Reply to a specific message.
    async fn reply(&self, channel_id: u64, message_id: u64, content: &str)
        -> Result<(), GatewayError>;

    /// Plain message to a channel.
    async fn send(&self, channel_id: u64, content: &str) -> Result<(), GatewayError>;

    /// Check that a channel exists and is reachable.
    async fn resolve_channel(&self, channel_id: u64) -> Result<(), GatewayError>;

    async fn channel_name(&self, channel_id: u64) -> Result<String, GatewayError>;
}

/// Reply to a message, falling back to a plain send in the same channel.
/// If both fail the error is logged and the user gets no feedback.
pub async fn reply_or_send<G: ChatGateway + ?Sized>(
    gateway: &G,
    channel_id: u64,
    message_id: u64,
    content: &str,
) {
    let Err(reply_err) = gateway.reply(channel_id, message_id, content).await else {
        return;
    };
    tracing::warn!(
        "Reply failed, falling back to a plain message: {}",
        reply_err
    );

    if let Err(send_err) = gateway.send(channel_id, content).await {
        tracing::error!("Failed to send message: {}", send_err);
    }
}
