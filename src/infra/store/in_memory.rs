// In-memory implementation of DocumentStore.
//
// Used by the tests in place of the JSON files. Each load hands out a clone,
// so callers get the same load-mutate-save semantics as the file-backed store.

use crate::core::store::{DocumentStore, StoreError};
use async_trait::async_trait;
use std::sync::Mutex;

pub struct InMemoryStore<D> {
    document: Mutex<D>,
}

impl<D: Default> InMemoryStore<D> {
    pub fn new() -> Self {
        Self::with_document(D::default())
    }
}

impl<D> InMemoryStore<D> {
    pub fn with_document(document: D) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }
}

impl<D: Default> Default for InMemoryStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D> DocumentStore<D> for InMemoryStore<D>
where
    D: Clone + Send + Sync,
{
    async fn load(&self) -> Result<D, StoreError> {
        let document = self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(document.clone())
    }

    async fn save(&self, document: &D) -> Result<(), StoreError> {
        let mut current = self
            .document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = document.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::points::PointsDocument;

    #[tokio::test]
    async fn test_load_returns_independent_copy() {
        let store: InMemoryStore<PointsDocument> = InMemoryStore::new();

        let mut doc = store.load().await.unwrap();
        doc.adjust(1, 1, 5);

        // Not saved yet, so the store still holds the empty document
        assert_eq!(store.load().await.unwrap().get_balance(1, 1), 0);

        store.save(&doc).await.unwrap();
        assert_eq!(store.load().await.unwrap().get_balance(1, 1), 5);
    }
}
