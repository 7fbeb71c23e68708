// The point ledger - pure balance arithmetic over the points document.
//
// Nothing here performs IO. Callers load a fresh document, apply the change,
// and persist it (see `PointsService`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// guild_id -> (user_id -> balance)
///
/// Serialized as a plain JSON object keyed by the decimal snowflake strings:
/// `{ "123": { "456": 7 } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsDocument {
    guilds: BTreeMap<u64, BTreeMap<u64, i64>>,
}

impl PointsDocument {
    /// Current balance. Unknown guilds and users read as 0.
    pub fn get_balance(&self, guild_id: u64, user_id: u64) -> i64 {
        self.guilds
            .get(&guild_id)
            .and_then(|users| users.get(&user_id))
            .copied()
            .unwrap_or(0)
    }

    /// Apply `delta` (negative for deductions) and return the new balance.
    ///
    /// Missing guild and user entries are created at 0 first. Arithmetic
    /// saturates at the bounds of `i64`.
    pub fn adjust(&mut self, guild_id: u64, user_id: u64, delta: i64) -> i64 {
        let balance = self
            .guilds
            .entry(guild_id)
            .or_default()
            .entry(user_id)
            .or_insert(0);
        *balance = balance.saturating_add(delta);
        *balance
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty()
    }
}
