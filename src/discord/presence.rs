// Bot presence. Discord-layer glue only: the status line tells members which
// reaction the bot is watching for.

use poise::serenity_prelude as serenity;

pub fn status_text(target_emoji: &str) -> String {
    format!("for {} reactions", target_emoji)
}

/// Called once the bot is ready.
pub fn on_ready(ctx: &serenity::Context, target_emoji: &str) {
    let activity = serenity::ActivityData::watching(status_text(target_emoji));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
