// Discord layer - event adapters and the serenity-backed gateway.

pub mod events;
pub mod gateway;

pub mod presence;

use crate::core::commands::CommandDispatcher;
use crate::core::config::BotConfig;
use crate::core::points::PointsDocument;
use crate::core::reactions::ReactionHandler;
use crate::core::settings::SettingsDocument;
use crate::infra::store::JsonFileStore;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub type PointsStore = JsonFileStore<PointsDocument>;
pub type SettingsStore = JsonFileStore<SettingsDocument>;

/// Shared state handed to every event.
pub struct Data {
    pub config: BotConfig,
    pub dispatcher: Arc<CommandDispatcher<PointsStore, SettingsStore>>,
    pub reactions: Arc<ReactionHandler<PointsStore, SettingsStore>>,
}
