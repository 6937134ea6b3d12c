//! Application State
//!
//! Shared state accessible by all handlers, wrapped in `Arc`.

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Directory the datasets are served from
    data_dir: PathBuf,
    /// Server start time for uptime tracking
    start_time: Instant,
}

impl AppState {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            start_time: Instant::now(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
