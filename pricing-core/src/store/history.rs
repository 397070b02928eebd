//! Pricing history persisted as a JSON array under a single key.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::backend::{KeyValueStore, StoreError};
use crate::models::{HistoryList, PricingRecord};

/// Key holding the serialized history list.
pub const HISTORY_KEY: &str = "pricingHistory";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize history: {0}")]
    Serialize(String),

    #[error("history index {index} is out of range (history has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered, newest-first list of [`PricingRecord`]s on top of a
/// [`KeyValueStore`].
///
/// Every mutating call reads the persisted list, changes it and writes it
/// back before returning, so the backend is always the source of truth.
#[derive(Clone, Copy)]
pub struct HistoryStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> HistoryStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Reads the persisted history.
    ///
    /// A missing key yields an empty list. A payload that does not parse is
    /// discarded with a warning and also yields an empty list.
    pub async fn load(&self) -> Result<HistoryList, HistoryError> {
        let Some(payload) = self.store.get(HISTORY_KEY).await? else {
            debug!("no saved history");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<HistoryList>(&payload) {
            Ok(history) => {
                debug!(entries = history.len(), "history loaded");
                Ok(history)
            }
            Err(error) => {
                warn!(%error, "discarding malformed history payload");
                Ok(Vec::new())
            }
        }
    }

    /// Returns the record at `index`, if any.
    pub async fn get(
        &self,
        index: usize,
    ) -> Result<Option<PricingRecord>, HistoryError> {
        Ok(self.load().await?.into_iter().nth(index))
    }

    /// Puts `record` at the front of the history and persists the result.
    pub async fn append(
        &self,
        record: PricingRecord,
    ) -> Result<HistoryList, HistoryError> {
        let mut history = self.load().await?;
        info!(
            product = %record.product_name(),
            mode = record.mode().as_str(),
            "saving calculation"
        );
        history.insert(0, record);
        self.save(&history).await?;
        Ok(history)
    }

    /// Removes the record at `index` and persists the result. The remaining
    /// records keep their relative order.
    ///
    /// # Errors
    /// [`HistoryError::IndexOutOfRange`] when `index` is past the end; the
    /// persisted history is left untouched.
    pub async fn delete_at(
        &self,
        index: usize,
    ) -> Result<HistoryList, HistoryError> {
        let mut history = self.load().await?;
        if index >= history.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: history.len(),
            });
        }

        let removed = history.remove(index);
        info!(index, product = %removed.product_name(), "deleted calculation");
        self.save(&history).await?;
        Ok(history)
    }

    /// Forgets every record by removing the history key altogether.
    pub async fn clear(&self) -> Result<(), HistoryError> {
        self.store.remove(HISTORY_KEY).await?;
        info!("history cleared");
        Ok(())
    }

    async fn save(
        &self,
        history: &[PricingRecord],
    ) -> Result<(), HistoryError> {
        let payload =
            serde_json::to_string(history).map_err(|e| HistoryError::Serialize(e.to_string()))?;
        self.store.set(HISTORY_KEY, &payload).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::store::MemoryStore;
    use crate::{ItemizedInput, PricingEngine, PricingInput};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, minute, 0).unwrap()
    }

    fn record(name: &str) -> PricingRecord {
        let input = PricingInput::Itemized(ItemizedInput {
            product_name: name.to_string(),
            material_cost: dec!(10),
            ..ItemizedInput::default()
        });
        PricingEngine::new().compute_at(&input, at(0)).unwrap()
    }

    fn names(history: &[PricingRecord]) -> Vec<&str> {
        history.iter().map(|r| r.product_name()).collect()
    }

    /// Builds history `[A, B, C]` (newest first) by appending C, B, A.
    async fn seeded(store: &MemoryStore) -> HistoryStore<'_> {
        let history = HistoryStore::new(store);
        for name in ["C", "B", "A"] {
            history.append(record(name)).await.unwrap();
        }
        history
    }

    // =========================================================================
    // load
    // =========================================================================

    #[tokio::test]
    async fn load_without_saved_history_is_empty() {
        let store = MemoryStore::new();

        let history = HistoryStore::new(&store).load().await.unwrap();

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn load_discards_malformed_payload() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, "{not json").await.unwrap();

        let history = HistoryStore::new(&store).load().await.unwrap();

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn load_discards_payload_with_wrong_shape() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, r#"[{"mode":"itemized"}]"#).await.unwrap();

        let history = HistoryStore::new(&store).load().await.unwrap();

        assert!(history.is_empty());
    }

    // =========================================================================
    // append
    // =========================================================================

    #[tokio::test]
    async fn append_prepends_and_persists() {
        let store = MemoryStore::new();
        let history = HistoryStore::new(&store);
        history.append(record("old")).await.unwrap();

        let returned = history.append(record("new")).await.unwrap();
        let loaded = history.load().await.unwrap();

        assert_eq!(names(&returned), vec!["new", "old"]);
        assert_eq!(loaded, returned);
        assert_eq!(loaded[0], record("new"));
    }

    #[tokio::test]
    async fn append_grows_by_one_and_keeps_duplicates() {
        let store = MemoryStore::new();
        let history = HistoryStore::new(&store);

        history.append(record("same")).await.unwrap();
        let before = history.load().await.unwrap().len();
        history.append(record("same")).await.unwrap();

        let loaded = history.load().await.unwrap();
        assert_eq!(loaded.len(), before + 1);
        assert_eq!(loaded[0], loaded[1]);
    }

    #[tokio::test]
    async fn append_after_malformed_payload_starts_fresh() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, "garbage").await.unwrap();
        let history = HistoryStore::new(&store);

        let returned = history.append(record("A")).await.unwrap();

        assert_eq!(names(&returned), vec!["A"]);
        assert_eq!(history.load().await.unwrap().len(), 1);
    }

    // =========================================================================
    // delete_at
    // =========================================================================

    #[tokio::test]
    async fn delete_at_removes_one_and_keeps_order() {
        let store = MemoryStore::new();
        let history = seeded(&store).await;

        let returned = history.delete_at(1).await.unwrap();

        assert_eq!(names(&returned), vec!["A", "C"]);
        assert_eq!(names(&history.load().await.unwrap()), vec!["A", "C"]);
    }

    #[tokio::test]
    async fn delete_at_last_index() {
        let store = MemoryStore::new();
        let history = seeded(&store).await;

        let returned = history.delete_at(2).await.unwrap();

        assert_eq!(names(&returned), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn delete_at_out_of_range_is_error_and_changes_nothing() {
        let store = MemoryStore::new();
        let history = seeded(&store).await;

        let result = history.delete_at(3).await;

        assert_eq!(result, Err(HistoryError::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(names(&history.load().await.unwrap()), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn delete_last_remaining_record_keeps_empty_list() {
        let store = MemoryStore::new();
        let history = HistoryStore::new(&store);
        history.append(record("only")).await.unwrap();

        let returned = history.delete_at(0).await.unwrap();

        assert!(returned.is_empty());
        assert_eq!(store.get(HISTORY_KEY).await.unwrap(), Some("[]".to_string()));
    }

    // =========================================================================
    // clear / get
    // =========================================================================

    #[tokio::test]
    async fn clear_removes_the_key() {
        let store = MemoryStore::new();
        let history = seeded(&store).await;

        history.clear().await.unwrap();

        assert!(history.load().await.unwrap().is_empty());
        assert_eq!(store.get(HISTORY_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_returns_record_by_position() {
        let store = MemoryStore::new();
        let history = seeded(&store).await;

        let second = history.get(1).await.unwrap();

        assert_eq!(
            second.as_ref().map(PricingRecord::product_name),
            Some("B")
        );
        assert_eq!(history.get(9).await.unwrap(), None);
    }
}
