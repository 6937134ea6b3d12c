//! Dataset Routes
//!
//! - GET /data - List dataset names
//! - GET /data/:name - Serve one dataset

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::api::dto::DatasetList;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::data::{list_json_files, validate_name};

/// GET /data
///
/// Names of the `*.json` files in the data directory, sorted.
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> ApiResult<Json<DatasetList>> {
    let datasets = list_json_files(state.data_dir())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(DatasetList { datasets }))
}

/// GET /data/:name
///
/// Parsed dataset content. Names must be bare `*.json` file names.
pub async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    if validate_name(&name).is_err() || !name.ends_with(".json") {
        return Err(ApiError::InvalidName(name));
    }

    let path = state.data_dir().join(&name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(name));
        }
        Err(e) => return Err(ApiError::Io(e)),
    };

    let value: Value = serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidContent {
        name: name.clone(),
        reason: e.to_string(),
    })?;

    tracing::debug!(dataset = %name, bytes = bytes.len(), "Served dataset");
    Ok(Json(value))
}
