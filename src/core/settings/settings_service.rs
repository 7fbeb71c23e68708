// Per-guild bot settings.
//
// Today the only setting is the notification channel, the channel where point
// changes are mirrored. Unknown fields in a guild entry are kept as-is, so
// adding settings later needs no migration.

use crate::core::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildSettings {
    /// Stored as a decimal string, the same way ids appear everywhere else in
    /// the JSON files.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "snowflake_string"
    )]
    pub notification_channel_id: Option<u64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// guild_id -> GuildSettings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument {
    guilds: BTreeMap<u64, GuildSettings>,
}

impl SettingsDocument {
    pub fn guild(&self, guild_id: u64) -> Option<&GuildSettings> {
        self.guilds.get(&guild_id)
    }

    pub fn notification_channel(&self, guild_id: u64) -> Option<u64> {
        self.guild(guild_id)
            .and_then(|settings| settings.notification_channel_id)
    }

    /// Upsert the guild's notification channel, leaving other fields intact.
    pub fn set_notification_channel(&mut self, guild_id: u64, channel_id: u64) {
        self.guilds
            .entry(guild_id)
            .or_default()
            .notification_channel_id = Some(channel_id);
    }
}

/// Same failure policy as `PointsService`: store errors are logged, never
/// returned.
pub struct SettingsService<S: DocumentStore<SettingsDocument>> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: DocumentStore<SettingsDocument>> SettingsService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn notification_channel(&self, guild_id: u64) -> Option<u64> {
        self.load_or_empty().await.notification_channel(guild_id)
    }

    pub async fn set_notification_channel(&self, guild_id: u64, channel_id: u64) {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load_or_empty().await;
        document.set_notification_channel(guild_id, channel_id);

        if let Err(e) = self.store.save(&document).await {
            tracing::error!("Failed to save settings document: {}", e);
        }

        tracing::info!(guild_id, channel_id, "Notification channel configured");
    }

    async fn load_or_empty(&self) -> SettingsDocument {
        match self.store.load().await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Failed to load settings document: {}", e);
                SettingsDocument::default()
            }
        }
    }
}

/// Reads a channel id written either as a JSON string or as a bare number.
mod snowflake_string {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(id) => serializer.serialize_str(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(id)) => Ok(Some(id)),
            Some(Raw::Text(text)) => text
                .parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid channel id: {text}"))),
        }
    }
}
