// Reaction awards: a judge reacting with the target emoji gives the message
// author one point.
//
// Every step is a hard gate. Reactions have no natural reply channel, so
// rejections are only logged, never answered.

use crate::core::authorization::JudgePolicy;
use crate::core::gateway::ChatGateway;
use crate::core::points::{PointsDocument, PointsService};
use crate::core::settings::{SettingsDocument, SettingsService};
use crate::core::store::DocumentStore;
use std::sync::Arc;

/// Points awarded per qualifying reaction.
pub const REACTION_AWARD: i64 = 1;

/// A reaction-add event as delivered by the gateway, before any lookups.
/// The message author is not part of the payload; the handler fetches it
/// only for reactions that pass every reactor-side gate.
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub message_id: u64,
    /// Unicode symbol, or the name of a custom emoji.
    pub emoji: Option<String>,
    pub reactor_id: u64,
    /// Known when the payload carries the reacting member; otherwise the
    /// member lookup decides.
    pub reactor_is_bot: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// Not a qualifying reaction (bot, emoji, no guild, bot author).
    Ignored,
    /// The reactor's member record could not be fetched.
    MemberUnavailable,
    /// The reactor does not hold the judge role.
    NotAuthorized,
    /// The reacted message could not be fetched.
    MessageUnavailable,
    Awarded { balance: i64 },
}

pub struct ReactionHandler<P, S>
where
    P: DocumentStore<PointsDocument>,
    S: DocumentStore<SettingsDocument>,
{
    points: Arc<PointsService<P>>,
    settings: Arc<SettingsService<S>>,
    policy: JudgePolicy,
    target_emoji: String,
}

impl<P, S> ReactionHandler<P, S>
where
    P: DocumentStore<PointsDocument>,
    S: DocumentStore<SettingsDocument>,
{
    pub fn new(
        points: Arc<PointsService<P>>,
        settings: Arc<SettingsService<S>>,
        policy: JudgePolicy,
        target_emoji: impl Into<String>,
    ) -> Self {
        Self {
            points,
            settings,
            policy,
            target_emoji: target_emoji.into(),
        }
    }

    /// Gates run cheapest first: payload checks, then the member lookup,
    /// then the message lookup. Nothing is fetched for a reaction that an
    /// earlier gate already rejected.
    pub async fn handle_reaction<G: ChatGateway + ?Sized>(
        &self,
        gateway: &G,
        event: &ReactionEvent,
    ) -> ReactionOutcome {
        if event.reactor_is_bot == Some(true) {
            return ReactionOutcome::Ignored;
        }
        if event.emoji.as_deref() != Some(self.target_emoji.as_str()) {
            return ReactionOutcome::Ignored;
        }
        let Some(guild_id) = event.guild_id else {
            return ReactionOutcome::Ignored;
        };

        let reactor = match gateway.fetch_member(guild_id, event.reactor_id).await {
            Ok(member) => member,
            Err(e) => {
                tracing::error!("Failed to fetch member {}: {}", event.reactor_id, e);
                return ReactionOutcome::MemberUnavailable;
            }
        };
        if reactor.is_bot {
            return ReactionOutcome::Ignored;
        }

        if !self.policy.can_award_via_reaction(&reactor) {
            tracing::info!(
                "User {} does not have the {} role",
                event.reactor_id,
                self.policy.judge_role_name()
            );
            return ReactionOutcome::NotAuthorized;
        }

        let author = match gateway
            .fetch_message_author(event.channel_id, event.message_id)
            .await
        {
            Ok(author) => author,
            Err(e) => {
                tracing::warn!("Failed to fetch message {}: {}", event.message_id, e);
                return ReactionOutcome::MessageUnavailable;
            }
        };
        if author.is_bot {
            return ReactionOutcome::Ignored;
        }

        // Judges reacting to their own messages are awarded too.
        let balance = self
            .points
            .adjust(guild_id, author.user_id, REACTION_AWARD)
            .await;

        tracing::info!(
            guild_id,
            reactor_id = event.reactor_id,
            author_id = author.user_id,
            balance,
            "Point awarded via reaction"
        );

        self.notify(gateway, guild_id, event.channel_id, author.user_id, balance)
            .await;
        ReactionOutcome::Awarded { balance }
    }

    /// Post to the configured notification channel when it resolves, else to
    /// the channel the reaction happened in.
    async fn notify<G: ChatGateway + ?Sized>(
        &self,
        gateway: &G,
        guild_id: u64,
        origin_channel_id: u64,
        author_id: u64,
        balance: i64,
    ) {
        let text = format!(
            "<@{}> was awarded {} point! (Current points: {})",
            author_id, REACTION_AWARD, balance
        );

        let mut target = origin_channel_id;
        if let Some(configured) = self.settings.notification_channel(guild_id).await {
            match gateway.resolve_channel(configured).await {
                Ok(()) => target = configured,
                Err(e) => tracing::warn!(
                    "Notification channel {} unavailable, using origin channel: {}",
                    configured,
                    e
                ),
            }
        }

        if let Err(e) = gateway.send(target, &text).await {
            tracing::error!("Failed to send award notification: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::authorization::MemberSnapshot;
    use crate::core::gateway::fake::{FakeGateway, Outbound};
    use crate::core::gateway::MessageAuthor;
    use crate::infra::store::InMemoryStore;

    const GUILD: u64 = 10;
    const CHANNEL: u64 = 20;
    const NOTIFY_CHANNEL: u64 = 21;
    const JUDGE: u64 = 1;
    const MEMBER: u64 = 2;
    const AUTHOR: u64 = 3;
    const BOT_JUDGE: u64 = 4;
    const MESSAGE: u64 = 500;
    const OWN_MESSAGE: u64 = 501;
    const BOT_MESSAGE: u64 = 502;

    type TestHandler =
        ReactionHandler<InMemoryStore<PointsDocument>, InMemoryStore<SettingsDocument>>;

    fn handler() -> TestHandler {
        ReactionHandler::new(
            Arc::new(PointsService::new(InMemoryStore::new())),
            Arc::new(SettingsService::new(InMemoryStore::new())),
            JudgePolicy::new("judge"),
            "✅",
        )
    }

    fn author(user_id: u64, is_bot: bool) -> MessageAuthor {
        MessageAuthor { user_id, is_bot }
    }

    fn gateway() -> FakeGateway {
        FakeGateway::default()
            .with_member(
                GUILD,
                JUDGE,
                MemberSnapshot {
                    is_administrator: false,
                    role_names: vec!["judge".to_string()],
                    ..Default::default()
                },
            )
            .with_member(
                GUILD,
                MEMBER,
                MemberSnapshot {
                    is_administrator: true,
                    role_names: vec!["member".to_string()],
                    ..Default::default()
                },
            )
            .with_member(
                GUILD,
                BOT_JUDGE,
                MemberSnapshot {
                    is_bot: true,
                    role_names: vec!["judge".to_string()],
                    ..Default::default()
                },
            )
            .with_message(CHANNEL, MESSAGE, author(AUTHOR, false))
            .with_message(CHANNEL, OWN_MESSAGE, author(JUDGE, false))
            .with_message(CHANNEL, BOT_MESSAGE, author(99, true))
    }

    fn reaction(reactor_id: u64) -> ReactionEvent {
        ReactionEvent {
            guild_id: Some(GUILD),
            channel_id: CHANNEL,
            message_id: MESSAGE,
            emoji: Some("✅".to_string()),
            reactor_id,
            reactor_is_bot: Some(false),
        }
    }

    #[tokio::test]
    async fn test_judge_reaction_awards_one_point() {
        let handler = handler();
        let gateway = gateway();

        let outcome = handler.handle_reaction(&gateway, &reaction(JUDGE)).await;
        assert_eq!(outcome, ReactionOutcome::Awarded { balance: 1 });
        let outcome = handler.handle_reaction(&gateway, &reaction(JUDGE)).await;
        assert_eq!(outcome, ReactionOutcome::Awarded { balance: 2 });

        assert_eq!(handler.points.get_balance(GUILD, AUTHOR).await, 2);
        assert_eq!(
            gateway.sent()[0],
            Outbound::Send {
                channel_id: CHANNEL,
                content: "<@3> was awarded 1 point! (Current points: 1)".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_award_notifies_configured_channel_only() {
        let handler = handler();
        let gateway = gateway();
        handler
            .settings
            .set_notification_channel(GUILD, NOTIFY_CHANNEL)
            .await;

        handler.handle_reaction(&gateway, &reaction(JUDGE)).await;

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].channel_id(), NOTIFY_CHANNEL);
    }

    #[tokio::test]
    async fn test_unresolvable_notification_channel_falls_back() {
        let handler = handler();
        let mut gateway = gateway();
        gateway.missing_channels.insert(NOTIFY_CHANNEL);
        handler
            .settings
            .set_notification_channel(GUILD, NOTIFY_CHANNEL)
            .await;

        handler.handle_reaction(&gateway, &reaction(JUDGE)).await;

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].channel_id(), CHANNEL);
    }

    #[tokio::test]
    async fn test_non_judge_reaction_does_nothing() {
        let handler = handler();
        let gateway = gateway();

        let outcome = handler.handle_reaction(&gateway, &reaction(MEMBER)).await;

        assert_eq!(outcome, ReactionOutcome::NotAuthorized);
        assert_eq!(handler.points.get_balance(GUILD, AUTHOR).await, 0);
        assert!(gateway.sent().is_empty());
        assert_eq!(gateway.author_fetches(), 0);
    }

    #[tokio::test]
    async fn test_payload_gates_run_before_any_lookup() {
        let handler = handler();
        let gateway = gateway();

        let mut wrong_emoji = reaction(JUDGE);
        wrong_emoji.emoji = Some("👍".to_string());
        let mut no_emoji = reaction(JUDGE);
        no_emoji.emoji = None;
        let mut bot_reactor = reaction(JUDGE);
        bot_reactor.reactor_is_bot = Some(true);
        let mut no_guild = reaction(JUDGE);
        no_guild.guild_id = None;

        for event in [wrong_emoji, no_emoji, bot_reactor, no_guild] {
            assert_eq!(
                handler.handle_reaction(&gateway, &event).await,
                ReactionOutcome::Ignored
            );
        }

        assert_eq!(gateway.member_fetches(), 0);
        assert_eq!(gateway.author_fetches(), 0);
        assert_eq!(handler.points.get_balance(GUILD, AUTHOR).await, 0);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bot_reactor_without_payload_flag_is_ignored_after_member_lookup() {
        let handler = handler();
        let gateway = gateway();

        let mut event = reaction(BOT_JUDGE);
        event.reactor_is_bot = None;

        let outcome = handler.handle_reaction(&gateway, &event).await;

        assert_eq!(outcome, ReactionOutcome::Ignored);
        assert_eq!(gateway.member_fetches(), 1);
        assert_eq!(gateway.author_fetches(), 0);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bot_author_is_ignored() {
        let handler = handler();
        let gateway = gateway();

        let mut event = reaction(JUDGE);
        event.message_id = BOT_MESSAGE;

        let outcome = handler.handle_reaction(&gateway, &event).await;

        assert_eq!(outcome, ReactionOutcome::Ignored);
        assert_eq!(gateway.author_fetches(), 1);
        assert_eq!(handler.points.get_balance(GUILD, 99).await, 0);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_member_fetch_failure_aborts() {
        let handler = handler();
        let gateway = gateway();

        let outcome = handler.handle_reaction(&gateway, &reaction(99)).await;

        assert_eq!(outcome, ReactionOutcome::MemberUnavailable);
        assert_eq!(gateway.author_fetches(), 0);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_message_fetch_failure_aborts() {
        let handler = handler();
        let gateway = gateway();

        let mut deleted = reaction(JUDGE);
        deleted.message_id = 404;

        let outcome = handler.handle_reaction(&gateway, &deleted).await;

        assert_eq!(outcome, ReactionOutcome::MessageUnavailable);
        assert_eq!(handler.points.get_balance(GUILD, AUTHOR).await, 0);
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_judge_reacting_to_own_message_is_awarded() {
        let handler = handler();
        let gateway = gateway();

        let mut own = reaction(JUDGE);
        own.message_id = OWN_MESSAGE;

        let outcome = handler.handle_reaction(&gateway, &own).await;
        assert_eq!(outcome, ReactionOutcome::Awarded { balance: 1 });
        assert_eq!(handler.points.get_balance(GUILD, JUDGE).await, 1);
    }
}
