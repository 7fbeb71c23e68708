use std::path::PathBuf;

pub const DEFAULT_JUDGE_ROLE_NAME: &str = "judge";
pub const DEFAULT_TARGET_EMOJI: &str = "✅";
pub const DEFAULT_POINTS_FILE: &str = "points.json";
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Runtime settings read from the environment. Every field has a default;
/// only the bot token (read separately in `main`) is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Role required for privileged actions. Matched exactly, case-sensitive.
    pub judge_role_name: String,
    /// Reaction that awards a point.
    pub target_emoji: String,
    pub points_path: PathBuf,
    pub settings_path: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            judge_role_name: get("JUDGE_ROLE_NAME", DEFAULT_JUDGE_ROLE_NAME),
            target_emoji: get("TARGET_EMOJI", DEFAULT_TARGET_EMOJI),
            points_path: get("POINTS_FILE", DEFAULT_POINTS_FILE).into(),
            settings_path: get("SETTINGS_FILE", DEFAULT_SETTINGS_FILE).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = BotConfig::from_lookup(|_| None);
        assert_eq!(config.judge_role_name, "judge");
        assert_eq!(config.target_emoji, "✅");
        assert_eq!(config.points_path, PathBuf::from("points.json"));
        assert_eq!(config.settings_path, PathBuf::from("settings.json"));
    }

    #[test]
    fn test_overrides_and_empty_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("JUDGE_ROLE_NAME", "referee"),
            ("TARGET_EMOJI", "⭐"),
            ("POINTS_FILE", "data/points.json"),
            ("SETTINGS_FILE", ""),
        ]);
        let config = BotConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.judge_role_name, "referee");
        assert_eq!(config.target_emoji, "⭐");
        assert_eq!(config.points_path, PathBuf::from("data/points.json"));
        assert_eq!(config.settings_path, PathBuf::from("settings.json"));
    }
}
