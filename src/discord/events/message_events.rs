use crate::core::commands::IncomingMessage;
use crate::discord::gateway::SerenityGateway;
use crate::discord::Data;
use poise::serenity_prelude as serenity;

/// Hand a new chat message to the command dispatcher.
pub async fn handle_message(ctx: &serenity::Context, data: &Data, message: &serenity::Message) {
    let incoming = IncomingMessage {
        guild_id: message.guild_id.map(|id| id.get()),
        channel_id: message.channel_id.get(),
        message_id: message.id.get(),
        author_id: message.author.id.get(),
        author_is_bot: message.author.bot,
        content: message.content.clone(),
    };

    let gateway = SerenityGateway::new(ctx);
    data.dispatcher.handle_message(&gateway, &incoming).await;
}
