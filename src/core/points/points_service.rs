use super::points_ledger::PointsDocument;
use crate::core::store::DocumentStore;
use tokio::sync::Mutex;

/// Loads, adjusts and persists the points document.
///
/// Generic over S: DocumentStore so tests can swap the JSON file for memory.
///
/// **Failure policy:** store errors never reach the caller. A failed load is
/// logged and treated as an empty document for that call; a failed save is
/// logged and the computed balance is still returned.
pub struct PointsService<S: DocumentStore<PointsDocument>> {
    store: S,
    // Serenity runs event handlers concurrently, so the load-mutate-save
    // sequence must not interleave.
    write_lock: Mutex<()>,
}

impl<S: DocumentStore<PointsDocument>> PointsService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Read-only balance lookup. Never writes.
    pub async fn get_balance(&self, guild_id: u64, user_id: u64) -> i64 {
        self.load_or_empty().await.get_balance(guild_id, user_id)
    }

    /// Add `delta` to the user's balance, persist, and return the new balance.
    pub async fn adjust(&self, guild_id: u64, user_id: u64, delta: i64) -> i64 {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load_or_empty().await;
        let balance = document.adjust(guild_id, user_id, delta);

        if let Err(e) = self.store.save(&document).await {
            tracing::error!("Failed to save points document: {}", e);
        }

        tracing::info!(guild_id, user_id, delta, balance, "Points updated");
        balance
    }

    async fn load_or_empty(&self) -> PointsDocument {
        match self.store.load().await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!("Failed to load points document: {}", e);
                PointsDocument::default()
            }
        }
    }
}
