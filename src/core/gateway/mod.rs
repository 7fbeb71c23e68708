pub mod chat_gateway;

#[cfg(test)]
pub use chat_gateway::fake;
pub use chat_gateway::{reply_or_send, ChatGateway, GatewayError, MessageAuthor};
