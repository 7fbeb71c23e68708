// Routes text commands to the points and settings services.
//
// **Flow per message:**
// 1. Drop bot authors and direct messages
// 2. Parse the text (see `command_parser`)
// 3. Check the author's permissions against a fresh member snapshot
// 4. Mutate + persist, then notify
//
// Notifications are best-effort: a failed reply or mirror never undoes a
// change that was already persisted.

use super::command_parser::{parse_command, BotCommand, PointAction};
use crate::core::authorization::JudgePolicy;
use crate::core::gateway::{reply_or_send, ChatGateway};
use crate::core::points::{PointsDocument, PointsService};
use crate::core::settings::{SettingsDocument, SettingsService};
use crate::core::store::DocumentStore;
use std::sync::Arc;

pub const PERMISSION_DENIED: &str = "You don't have permission to use this command.";

/// The parts of a chat message the dispatcher needs, stripped of platform types.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    pub author_id: u64,
    pub author_is_bot: bool,
    pub content: String,
}

pub struct CommandDispatcher<P, S>
where
    P: DocumentStore<PointsDocument>,
    S: DocumentStore<SettingsDocument>,
{
    points: Arc<PointsService<P>>,
    settings: Arc<SettingsService<S>>,
    policy: JudgePolicy,
}

impl<P, S> CommandDispatcher<P, S>
where
    P: DocumentStore<PointsDocument>,
    S: DocumentStore<SettingsDocument>,
{
    pub fn new(
        points: Arc<PointsService<P>>,
        settings: Arc<SettingsService<S>>,
        policy: JudgePolicy,
    ) -> Self {
        Self {
            points,
            settings,
            policy,
        }
    }

    pub async fn handle_message<G: ChatGateway + ?Sized>(
        &self,
        gateway: &G,
        message: &IncomingMessage,
    ) {
        if message.author_is_bot {
            return;
        }
        let Some(guild_id) = message.guild_id else {
            return;
        };
        let Some(command) = parse_command(&message.content) else {
            return;
        };

        tracing::debug!(guild_id, author_id = message.author_id, ?command, "Command received");

        match command {
            BotCommand::SetChannel => self.set_channel(gateway, guild_id, message).await,
            BotCommand::ShowPoints => self.show_points(gateway, guild_id, message).await,
            BotCommand::Usage(action) => {
                reply_or_send(gateway, message.channel_id, message.message_id, &action.usage())
                    .await
            }
            BotCommand::AdjustPoints {
                action,
                target_user_id,
                amount,
            } => {
                self.adjust_points(gateway, guild_id, message, action, target_user_id, amount)
                    .await
            }
        }
    }

    async fn set_channel<G: ChatGateway + ?Sized>(
        &self,
        gateway: &G,
        guild_id: u64,
        message: &IncomingMessage,
    ) {
        let member = match gateway.fetch_member(guild_id, message.author_id).await {
            Ok(member) => member,
            Err(e) => {
                tracing::error!("Failed to fetch member {}: {}", message.author_id, e);
                return;
            }
        };

        if !self.policy.can_configure_channel(&member) {
            reply_or_send(gateway, message.channel_id, message.message_id, PERMISSION_DENIED)
                .await;
            return;
        }

        self.settings
            .set_notification_channel(guild_id, message.channel_id)
            .await;

        let channel_name = gateway
            .channel_name(message.channel_id)
            .await
            .unwrap_or_else(|_| format!("<#{}>", message.channel_id));
        let confirmation = format!(
            "Point notifications will be posted in this channel ({})!",
            channel_name
        );
        reply_or_send(gateway, message.channel_id, message.message_id, &confirmation).await;
    }

    async fn show_points<G: ChatGateway + ?Sized>(
        &self,
        gateway: &G,
        guild_id: u64,
        message: &IncomingMessage,
    ) {
        let balance = self.points.get_balance(guild_id, message.author_id).await;
        let text = format!("You currently have **{}** points!", balance);
        reply_or_send(gateway, message.channel_id, message.message_id, &text).await;
    }

    async fn adjust_points<G: ChatGateway + ?Sized>(
        &self,
        gateway: &G,
        guild_id: u64,
        message: &IncomingMessage,
        action: PointAction,
        target_user_id: u64,
        amount: i64,
    ) {
        let member = match gateway.fetch_member(guild_id, message.author_id).await {
            Ok(member) => member,
            Err(e) => {
                tracing::error!("Failed to fetch member {}: {}", message.author_id, e);
                return;
            }
        };

        if !self.policy.can_adjust_points(&member) {
            reply_or_send(gateway, message.channel_id, message.message_id, PERMISSION_DENIED)
                .await;
            return;
        }

        let balance = self
            .points
            .adjust(guild_id, target_user_id, action.delta(amount))
            .await;

        let notification = point_change_notice(action, target_user_id, amount, balance);
        reply_or_send(gateway, message.channel_id, message.message_id, &notification).await;

        // Mirror to the notification channel unless the command was run there
        let Some(notify_channel) = self.settings.notification_channel(guild_id).await else {
            return;
        };
        if notify_channel == message.channel_id {
            return;
        }

        let mirrored = match gateway.resolve_channel(notify_channel).await {
            Ok(()) => gateway.send(notify_channel, &notification).await,
            Err(e) => Err(e),
        };
        if let Err(e) = mirrored {
            tracing::error!(
                "Failed to send to notification channel {}: {}",
                notify_channel,
                e
            );
        }
    }
}

fn point_change_notice(action: PointAction, user_id: u64, amount: i64, balance: i64) -> String {
    match action {
        PointAction::Add => format!(
            "Added {} points to <@{}>. (Current points: {})",
            amount, user_id, balance
        ),
        PointAction::Subtract => format!(
            "Subtracted {} points from <@{}>. (Current points: {})",
            amount, user_id, balance
        ),
    }
}
