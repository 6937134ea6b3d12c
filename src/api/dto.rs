//! Data Transfer Objects
//!
//! Response bodies of the dataset server.

use serde::{Deserialize, Serialize};

/// `GET /data` response
#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetList {
    /// Dataset file names, sorted
    pub datasets: Vec<String>,
}

/// `GET /health` response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when the data directory is readable, else "unhealthy"
    pub status: String,
    pub datasets: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
