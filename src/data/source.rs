//! Dataset Sources
//!
//! Where raw dataset JSON comes from: a directory of exported files, the
//! dataset server over HTTP, or an in-memory map.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::error::{validate_name, DataError, DataResult};

/// Common trait for all dataset sources
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable description used in logs
    fn describe(&self) -> String;

    /// Retrieve and parse one dataset by name
    async fn fetch(&self, name: &str) -> DataResult<Value>;

    /// Names this source can serve, when it can enumerate them
    async fn list(&self) -> DataResult<Vec<String>>;
}

/// Reads `<root>/<name>` from the local filesystem
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DatasetSource for DirectorySource {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    async fn fetch(&self, name: &str) -> DataResult<Value> {
        validate_name(name)?;
        let path = self.root.join(name);

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DataError::unavailable(name, e))?;

        serde_json::from_slice(&bytes).map_err(|e| DataError::malformed(name, e))
    }

    async fn list(&self) -> DataResult<Vec<String>> {
        list_json_files(&self.root).await
    }
}

/// List the `*.json` file names directly under `dir`, sorted.
pub async fn list_json_files(dir: &Path) -> DataResult<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| DataError::unavailable(&dir.display().to_string(), e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DataError::unavailable(&dir.display().to_string(), e))?
    {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".json") && validate_name(&name).is_ok() {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Body of the dataset server's `GET /data`
#[derive(Deserialize)]
struct Listing {
    datasets: Vec<String>,
}

/// Fetches `<base_url>/data/<name>` from the dataset server
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Create a source with the given request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DataResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Source(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, name: &str) -> String {
        format!("{}/data/{}", self.base_url, name)
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    fn describe(&self) -> String {
        format!("http {}", self.base_url)
    }

    async fn fetch(&self, name: &str) -> DataResult<Value> {
        validate_name(name)?;

        let response = self
            .client
            .get(self.url(name))
            .send()
            .await
            .map_err(|e| DataError::unavailable(name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::unavailable(name, format!("HTTP {}", status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| DataError::malformed(name, e))
    }

    async fn list(&self) -> DataResult<Vec<String>> {
        let url = format!("{}/data", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::unavailable("/data", e))?;

        if !response.status().is_success() {
            return Err(DataError::unavailable(
                "/data",
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json::<Listing>()
            .await
            .map(|listing| listing.datasets)
            .map_err(|e| DataError::malformed("/data", e))
    }
}

/// In-memory datasets, mainly for embedding fixtures and tests
#[derive(Default)]
pub struct MemorySource {
    datasets: HashMap<String, Value>,
    latency: HashMap<String, Duration>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a dataset
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.datasets.insert(name.into(), value);
        self
    }

    /// Builder method: delay every fetch of `name`
    pub fn with_latency(mut self, name: impl Into<String>, latency: Duration) -> Self {
        self.latency.insert(name.into(), latency);
        self
    }

    /// Number of fetches that reached this source
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} datasets)", self.datasets.len())
    }

    async fn fetch(&self, name: &str) -> DataResult<Value> {
        validate_name(name)?;
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.latency.get(name) {
            tokio::time::sleep(*delay).await;
        }

        self.datasets
            .get(name)
            .cloned()
            .ok_or_else(|| DataError::unavailable(name, "not found"))
    }

    async fn list(&self) -> DataResult<Vec<String>> {
        let mut names: Vec<String> = self.datasets.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_directory_source_reads_json() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("kpis.json"), r#"{"total_posts": 10}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = DirectorySource::new(dir.path());
        let value = source.fetch("kpis.json").await.unwrap();
        assert_eq!(value["total_posts"], 10);

        let names = source.list().await.unwrap();
        assert_eq!(names, vec!["kpis.json"]);
    }

    #[tokio::test]
    async fn test_directory_source_missing_file() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path());

        let err = source.fetch("posts.json").await.unwrap_err();
        assert!(matches!(err, DataError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_directory_source_invalid_json() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let source = DirectorySource::new(dir.path());
        let err = source.fetch("broken.json").await.unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_directory_source_rejects_paths() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path());

        let err = source.fetch("../secret.json").await.unwrap_err();
        assert!(matches!(err, DataError::InvalidName(_)));
    }

    #[tokio::test]
    async fn test_memory_source_counts_fetches() {
        let source = MemorySource::new().with("a.json", json!([1, 2, 3]));

        assert_eq!(source.fetch("a.json").await.unwrap(), json!([1, 2, 3]));
        assert!(source.fetch("b.json").await.is_err());
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_http_source_url() {
        let source = HttpSource::new("http://localhost:8090/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.url("kpis.json"), "http://localhost:8090/data/kpis.json");
    }
}
