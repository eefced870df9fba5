#![allow(dead_code)]

//! History store — past CV artifacts, independent of the live draft.
//!
//! The whole list is replaced on every write (same overwrite pattern as the
//! draft slot). Ordering is applied at read time, most recently updated
//! first; nothing sorts on write.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::generated::GeneratedCV;
use crate::models::history::{CvHistoryItem, CvStatus};
use crate::storage::{KeyValueStore, HISTORY_KEY};

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        HistoryStore { store }
    }

    /// All items, most recently updated first. Absent or malformed history
    /// reads as empty; this never fails to the caller.
    pub async fn list(&self) -> Vec<CvHistoryItem> {
        let mut items = self.load_raw().await;
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        items
    }

    pub async fn get(&self, id: Uuid) -> Option<CvHistoryItem> {
        self.load_raw().await.into_iter().find(|i| i.id == id)
    }

    /// Inserts or replaces by id, bumping `updated_at` on replacement.
    pub async fn upsert(&self, mut item: CvHistoryItem) -> Result<(), AppError> {
        let mut items = self.load_raw().await;
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                item.updated_at = Utc::now();
                *existing = item;
            }
            None => items.push(item),
        }
        self.persist(&items).await
    }

    /// Duplicates an item under a fresh id and " (cópia)" name suffix. An
    /// exported source duplicates as generated; the copy was never exported.
    pub async fn duplicate(&self, id: Uuid) -> Result<Option<CvHistoryItem>, AppError> {
        let mut items = self.load_raw().await;
        let Some(source) = items.iter().find(|i| i.id == id).cloned() else {
            return Ok(None);
        };
        let now = Utc::now();
        let copy = CvHistoryItem {
            id: Uuid::new_v4(),
            name: format!("{} (cópia)", source.name),
            created_at: now,
            updated_at: now,
            status: match source.status {
                CvStatus::Exported => CvStatus::Generated,
                other => other,
            },
            ..source
        };
        items.push(copy.clone());
        self.persist(&items).await?;
        info!("duplicated history item {id} as {}", copy.id);
        Ok(Some(copy))
    }

    /// Renames an item. Returns false when the id is unknown.
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<bool, AppError> {
        self.update_item(id, |item| item.name = name.to_string())
            .await
    }

    pub async fn mark_exported(&self, id: Uuid) -> Result<bool, AppError> {
        self.update_item(id, |item| item.status = CvStatus::Exported)
            .await
    }

    /// Replaces the stored document after an editor change.
    pub async fn set_generated(&self, id: Uuid, cv: GeneratedCV) -> Result<bool, AppError> {
        self.update_item(id, |item| item.generated_content = Some(cv))
            .await
    }

    /// Deletes an item. Returns false when the id is unknown.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut items = self.load_raw().await;
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.persist(&items).await?;
        Ok(true)
    }

    async fn update_item(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut CvHistoryItem),
    ) -> Result<bool, AppError> {
        let mut items = self.load_raw().await;
        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                apply(item);
                item.updated_at = Utc::now();
                self.persist(&items).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn load_raw(&self) -> Vec<CvHistoryItem> {
        match self.store.get(HISTORY_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!("malformed history list, treating as empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("history unreadable, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    async fn persist(&self, items: &[CvHistoryItem]) -> Result<(), AppError> {
        let raw = serde_json::to_string(items)?;
        self.store.set(HISTORY_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::FormData;
    use crate::models::settings::GenerationSettings;
    use crate::storage::MemoryStore;

    fn history() -> HistoryStore {
        HistoryStore::new(Arc::new(MemoryStore::new()))
    }

    fn item(name: &str) -> CvHistoryItem {
        CvHistoryItem::from_working(
            name.to_string(),
            FormData::default(),
            GenerationSettings::default(),
            None,
            CvStatus::Draft,
        )
    }

    #[tokio::test]
    async fn test_empty_history_lists_nothing() {
        let history = history();
        assert!(history.list().await.is_empty());
        assert!(history.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_history_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.seed(HISTORY_KEY, "[{bad json");
        let history = HistoryStore::new(store);
        assert!(history.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_most_recent_update() {
        let history = history();
        let mut older = item("older");
        let mut newer = item("newer");
        older.updated_at = "2026-01-01T00:00:00Z".parse().unwrap();
        newer.updated_at = "2026-06-01T00:00:00Z".parse().unwrap();
        // Insert out of order on purpose.
        history.upsert(newer).await.unwrap();
        history.upsert(older).await.unwrap();

        let listed = history.list().await;
        assert_eq!(listed[0].name, "newer");
        assert_eq!(listed[1].name, "older");
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id_and_bumps_updated_at() {
        let history = history();
        let original = item("first");
        let id = original.id;
        let created = original.updated_at;
        history.upsert(original.clone()).await.unwrap();

        let mut edited = original;
        edited.name = "renamed".to_string();
        history.upsert(edited).await.unwrap();

        let listed = history.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].name, "renamed");
        assert!(listed[0].updated_at >= created);
    }

    #[tokio::test]
    async fn test_rename_unknown_id_is_noop() {
        let history = history();
        assert!(!history.rename(Uuid::new_v4(), "x").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_gets_fresh_id_and_copy_suffix() {
        let history = history();
        let source = item("Meu CV");
        let id = source.id;
        history.upsert(source).await.unwrap();

        let copy = history.duplicate(id).await.unwrap().unwrap();
        assert_ne!(copy.id, id);
        assert_eq!(copy.name, "Meu CV (cópia)");
        assert_eq!(history.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_of_exported_item_is_generated() {
        let history = history();
        let mut source = item("Exportado");
        source.status = CvStatus::Exported;
        let id = source.id;
        history.upsert(source).await.unwrap();

        let copy = history.duplicate(id).await.unwrap().unwrap();
        assert_eq!(copy.status, CvStatus::Generated);
    }

    #[tokio::test]
    async fn test_duplicate_unknown_id_is_none() {
        let history = history();
        assert!(history.duplicate(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_only_the_target() {
        let history = history();
        let keep = item("keep");
        let drop = item("drop");
        let drop_id = drop.id;
        history.upsert(keep).await.unwrap();
        history.upsert(drop).await.unwrap();

        assert!(history.delete(drop_id).await.unwrap());
        let listed = history.list().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "keep");
        assert!(!history.delete(drop_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_exported_flips_status() {
        let history = history();
        let source = item("CV");
        let id = source.id;
        history.upsert(source).await.unwrap();
        assert!(history.mark_exported(id).await.unwrap());
        assert_eq!(history.get(id).await.unwrap().status, CvStatus::Exported);
    }
}
