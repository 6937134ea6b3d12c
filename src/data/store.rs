//! Dataset Store
//!
//! Memoizing front of a [`DatasetSource`]. A dataset is fetched at most once
//! for the lifetime of the store; concurrent first requests for the same name
//! share one in-flight fetch. Failed fetches are not cached.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use super::error::{DataError, DataResult};
use super::source::DatasetSource;

type Entry = Arc<OnceCell<Arc<Value>>>;

/// Process-wide dataset cache
pub struct DatasetStore {
    source: Arc<dyn DatasetSource>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl DatasetStore {
    /// Create a store backed by the given source
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        tracing::debug!(source = %source.describe(), "Dataset store created");
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Description of the underlying source
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Fetch a dataset, serving it from cache after the first success
    pub async fn fetch(&self, name: &str) -> DataResult<Arc<Value>> {
        let entry = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(name.to_string()).or_default())
        };

        if let Some(value) = entry.get() {
            return Ok(Arc::clone(value));
        }

        let value = entry
            .get_or_try_init(|| async {
                tracing::debug!(dataset = %name, "Fetching dataset");
                let value = self.source.fetch(name).await.map_err(|e| {
                    tracing::warn!(dataset = %name, error = %e, "Dataset fetch failed");
                    e
                })?;
                Ok::<_, DataError>(Arc::new(value))
            })
            .await?;

        Ok(Arc::clone(value))
    }

    /// Fetch a dataset and decode it into a typed record set
    pub async fn fetch_as<T: DeserializeOwned>(&self, name: &str) -> DataResult<T> {
        let value = self.fetch(name).await?;
        T::deserialize(value.as_ref()).map_err(|e| DataError::malformed(name, e))
    }

    /// Whether a dataset has been successfully fetched
    pub async fn is_cached(&self, name: &str) -> bool {
        let entries = self.entries.lock().await;
        entries
            .get(name)
            .map(|entry| entry.initialized())
            .unwrap_or(false)
    }

    /// Names of all successfully fetched datasets, sorted
    pub async fn cached_names(&self) -> Vec<String> {
        let entries = self.entries.lock().await;
        let mut names: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.initialized())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Names the source can enumerate
    pub async fn available(&self) -> DataResult<Vec<String>> {
        self.source.list().await
    }

    /// Fetch several datasets concurrently, reporting each outcome
    pub async fn prefetch(&self, names: &[String]) -> Vec<(String, DataResult<()>)> {
        let fetches = names.iter().map(|name| async move {
            let result = self.fetch(name).await.map(|_| ());
            (name.clone(), result)
        });
        futures_util::future::join_all(fetches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::MemorySource;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    fn store_with(source: MemorySource) -> (Arc<MemorySource>, DatasetStore) {
        let source = Arc::new(source);
        let store = DatasetStore::new(Arc::clone(&source) as Arc<dyn DatasetSource>);
        (source, store)
    }

    #[tokio::test]
    async fn test_fetch_is_memoized() {
        let (source, store) = store_with(MemorySource::new().with("kpis.json", json!({"a": 1})));

        let first = store.fetch("kpis.json").await.unwrap();
        let second = store.fetch("kpis.json").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 1);
        assert!(store.is_cached("kpis.json").await);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (source, store) = store_with(MemorySource::new());

        assert!(store.fetch("missing.json").await.is_err());
        assert!(store.fetch("missing.json").await.is_err());

        assert_eq!(source.fetch_count(), 2);
        assert!(!store.is_cached("missing.json").await);
        assert!(store.cached_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_first_fetches_are_coalesced() {
        let (source, store) = store_with(
            MemorySource::new()
                .with("posts.json", json!([]))
                .with_latency("posts.json", Duration::from_millis(30)),
        );

        let (a, b, c) = tokio::join!(
            store.fetch("posts.json"),
            store.fetch("posts.json"),
            store.fetch("posts.json"),
        );

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_fetch_does_not_poison_entry() {
        let (source, store) = store_with(
            MemorySource::new()
                .with("slow.json", json!(1))
                .with_latency("slow.json", Duration::from_millis(50)),
        );

        let abandoned =
            tokio::time::timeout(Duration::from_millis(5), store.fetch("slow.json")).await;
        assert!(abandoned.is_err());
        assert!(!store.is_cached("slow.json").await);

        let value = store.fetch("slow.json").await.unwrap();
        assert_eq!(*value, json!(1));
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_as_typed() {
        #[derive(Deserialize)]
        struct Row {
            week: String,
        }

        let (_source, store) =
            store_with(MemorySource::new().with("weeks.json", json!([{"week": "2026-01-19"}])));

        let rows: Vec<Row> = store.fetch_as("weeks.json").await.unwrap();
        assert_eq!(rows[0].week, "2026-01-19");

        let err = store.fetch_as::<Vec<u32>>("weeks.json").await.unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_prefetch_reports_each_dataset() {
        let (_source, store) = store_with(MemorySource::new().with("a.json", json!(1)));

        let results = store
            .prefetch(&["a.json".to_string(), "b.json".to_string()])
            .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
        assert_eq!(store.cached_names().await, vec!["a.json"]);
    }
}
