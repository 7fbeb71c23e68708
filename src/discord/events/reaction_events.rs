use crate::core::reactions::ReactionEvent;
use crate::discord::gateway::SerenityGateway;
use crate::discord::Data;
use poise::serenity_prelude::{self as serenity, Context};

/// Hands the raw payload to the core. Any lookups happen there, and only
/// for reactions that pass the payload gates.
pub async fn handle_reaction_add(ctx: &Context, data: &Data, reaction: &serenity::Reaction) {
    let Some(event) = reaction_event(reaction) else {
        tracing::debug!(message_id = reaction.message_id.get(), "Reaction without a user id");
        return;
    };

    let gateway = SerenityGateway::new(ctx);
    let outcome = data.reactions.handle_reaction(&gateway, &event).await;
    tracing::debug!(message_id = event.message_id, ?outcome, "Reaction handled");
}

fn reaction_event(reaction: &serenity::Reaction) -> Option<ReactionEvent> {
    Some(ReactionEvent {
        guild_id: reaction.guild_id.map(|id| id.get()),
        channel_id: reaction.channel_id.get(),
        message_id: reaction.message_id.get(),
        emoji: emoji_name(&reaction.emoji),
        reactor_id: reaction.user_id?.get(),
        // Guild reactions carry the member; without it the core's member
        // lookup decides
        reactor_is_bot: reaction.member.as_ref().map(|member| member.user.bot),
    })
}

fn emoji_name(emoji: &serenity::ReactionType) -> Option<String> {
    match emoji {
        serenity::ReactionType::Unicode(symbol) => Some(symbol.clone()),
        serenity::ReactionType::Custom { name, .. } => name.clone(),
        _ => None,
    }
}
