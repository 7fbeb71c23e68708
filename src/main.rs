// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON document files)
// - `discord/` = Discord-specific adapters (events, gateway, presence)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Route gateway events to the adapters

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::authorization::JudgePolicy;
use crate::core::commands::CommandDispatcher;
use crate::core::config::BotConfig;
use crate::core::points::PointsService;
use crate::core::reactions::ReactionHandler;
use crate::core::settings::SettingsService;
use crate::discord::events::{message_events, reaction_events};
use crate::discord::{presence, Data, Error, PointsStore, SettingsStore};
use crate::infra::store::JsonFileStore;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
/// Both bot features live here: text commands and reaction awards.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            message_events::handle_message(ctx, data, new_message).await;
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            reaction_events::handle_reaction_add(ctx, data, add_reaction).await;
        }
        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").context(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    )?;

    let config = BotConfig::from_env();

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Two independent document stores; the services serialize their own writes.

    let points_store: PointsStore = JsonFileStore::new(&config.points_path);
    let settings_store: SettingsStore = JsonFileStore::new(&config.settings_path);
    tracing::info!(
        points = %points_store.path().display(),
        settings = %settings_store.path().display(),
        "Using JSON stores"
    );

    let points_service = Arc::new(PointsService::new(points_store));
    let settings_service = Arc::new(SettingsService::new(settings_store));
    let policy = JudgePolicy::new(config.judge_role_name.clone());

    let dispatcher = Arc::new(CommandDispatcher::new(
        Arc::clone(&points_service),
        Arc::clone(&settings_service),
        policy.clone(),
    ));
    let reactions = Arc::new(ReactionHandler::new(
        Arc::clone(&points_service),
        Arc::clone(&settings_service),
        policy,
        config.target_emoji.clone(),
    ));

    let data = Data {
        config,
        dispatcher,
        reactions,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Commands are plain `!` text, so poise only hosts the event handler.

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!("Logged in as {}", ready.user.tag());
                tracing::info!("Watching for emoji: {}", data.config.target_emoji);
                tracing::info!("Judge role: {}", data.config.judge_role_name);

                presence::on_ready(ctx, &data.config.target_emoji);
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
