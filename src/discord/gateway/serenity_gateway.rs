// ChatGateway backed by serenity.
//
// Built per event from the serenity Context, so the core never touches the
// client directly. Translation only: ids in, primitives out.

use crate::core::authorization::MemberSnapshot;
use crate::core::gateway::{ChatGateway, GatewayError, MessageAuthor};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::future::Future;

pub struct SerenityGateway<'a> {
    ctx: &'a serenity::Context,
}

impl<'a> SerenityGateway<'a> {
    pub fn new(ctx: &'a serenity::Context) -> Self {
        Self { ctx }
    }

    fn is_guild_owner(&self, guild_id: serenity::GuildId, user_id: serenity::UserId) -> bool {
        self.ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.owner_id == user_id)
            .unwrap_or(false)
    }
}

fn platform(err: serenity::Error) -> GatewayError {
    if let serenity::Error::Http(http_err) = &err {
        if http_err.status_code().map(|status| status.as_u16()) == Some(404) {
            return GatewayError::NotFound;
        }
    }
    GatewayError::Platform(err.to_string())
}

/// Use the cached value when there is one, otherwise run the fetch.
async fn cached_or_fetch<T, F, Fut>(cached: Option<T>, fetch: F) -> Result<T, GatewayError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, GatewayError>>,
{
    match cached {
        Some(value) => Ok(value),
        None => fetch().await,
    }
}

#[async_trait]
impl ChatGateway for SerenityGateway<'_> {
    async fn fetch_member(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<MemberSnapshot, GatewayError> {
        let guild_id = serenity::GuildId::new(guild_id);
        let user_id = serenity::UserId::new(user_id);

        let member = guild_id.member(self.ctx, user_id).await.map_err(platform)?;

        // The cache guard must be gone before the next await
        let cached_roles = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.roles.clone());
        let guild_roles = cached_or_fetch(cached_roles, || async {
            guild_id.roles(self.ctx).await.map_err(platform)
        })
        .await?;

        let member_roles: Vec<&serenity::Role> = member
            .roles
            .iter()
            .filter_map(|role_id| guild_roles.get(role_id))
            .collect();

        // @everyone shares the guild's id and is not listed on the member
        let everyone_is_admin = guild_roles
            .get(&serenity::RoleId::new(guild_id.get()))
            .map(|role| role.permissions.administrator())
            .unwrap_or(false);

        let is_administrator = everyone_is_admin
            || member_roles
                .iter()
                .any(|role| role.permissions.administrator())
            || self.is_guild_owner(guild_id, user_id);

        Ok(MemberSnapshot {
            is_bot: member.user.bot,
            is_administrator,
            role_names: member_roles.iter().map(|role| role.name.clone()).collect(),
        })
    }

    async fn fetch_message_author(
        &self,
        channel_id: u64,
        message_id: u64,
    ) -> Result<MessageAuthor, GatewayError> {
        let message = serenity::ChannelId::new(channel_id)
            .message(self.ctx, serenity::MessageId::new(message_id))
            .await
            .map_err(platform)?;

        Ok(MessageAuthor {
            user_id: message.author.id.get(),
            is_bot: message.author.bot,
        })
    }

    async fn reply(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> Result<(), GatewayError> {
        let channel_id = serenity::ChannelId::new(channel_id);
        let message_id = serenity::MessageId::new(message_id);

        channel_id
            .send_message(
                self.ctx,
                serenity::CreateMessage::new()
                    .content(content)
                    .reference_message((channel_id, message_id)),
            )
            .await
            .map(|_| ())
            .map_err(platform)
    }

    async fn send(&self, channel_id: u64, content: &str) -> Result<(), GatewayError> {
        serenity::ChannelId::new(channel_id)
            .say(self.ctx, content)
            .await
            .map(|_| ())
            .map_err(platform)
    }

    async fn resolve_channel(&self, channel_id: u64) -> Result<(), GatewayError> {
        serenity::ChannelId::new(channel_id)
            .to_channel(self.ctx)
            .await
            .map(|_| ())
            .map_err(platform)
    }

    async fn channel_name(&self, channel_id: u64) -> Result<String, GatewayError> {
        serenity::ChannelId::new(channel_id)
            .name(self.ctx)
            .await
            .map_err(platform)
    }
}
