//! Page context
//!
//! Everything a page may use while rendering: datasets, the chart
//! dispatcher, profile text and the navigation token it runs under.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::PageError;
use super::token::NavigationToken;
use crate::chart::{ChartDispatcher, ChartRequest, Figure};
use crate::config::ProfileConfig;
use crate::data::DatasetStore;

/// Shared services handed to every page
#[derive(Clone)]
pub struct Services {
    pub store: Arc<DatasetStore>,
    pub charts: Arc<ChartDispatcher>,
    pub profile: Arc<ProfileConfig>,
}

impl Services {
    pub fn new(store: Arc<DatasetStore>, charts: ChartDispatcher, profile: ProfileConfig) -> Self {
        Self {
            store,
            charts: Arc::new(charts),
            profile: Arc::new(profile),
        }
    }
}

/// Per-navigation context
#[derive(Clone)]
pub struct PageContext {
    services: Services,
    token: NavigationToken,
    route: String,
}

impl PageContext {
    pub fn new(services: Services, token: NavigationToken, route: impl Into<String>) -> Self {
        Self {
            services,
            token,
            route: route.into(),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn profile(&self) -> &ProfileConfig {
        &self.services.profile
    }

    pub fn store(&self) -> &DatasetStore {
        &self.services.store
    }

    pub fn token(&self) -> &NavigationToken {
        &self.token
    }

    pub fn is_current(&self) -> bool {
        self.token.is_current()
    }

    /// Fetch a dataset, giving up as soon as the navigation is superseded
    pub async fn dataset(&self, name: &str) -> Result<Arc<Value>, PageError> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(PageError::Cancelled),
            result = self.services.store.fetch(name) => result.map_err(PageError::from),
        }
    }

    /// Fetch and decode a dataset
    pub async fn dataset_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, PageError> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(PageError::Cancelled),
            result = self.services.store.fetch_as::<T>(name) => result.map_err(PageError::from),
        }
    }

    /// Draw a chart with the shared dispatcher
    pub fn chart(&self, request: &ChartRequest) -> Figure {
        self.services.charts.render(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataError, MemorySource};
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::watch;

    fn services(source: MemorySource) -> Services {
        Services::new(
            Arc::new(DatasetStore::new(Arc::new(source))),
            ChartDispatcher::new(),
            ProfileConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_dataset_fetch() {
        let ctx = PageContext::new(
            services(MemorySource::new().with("kpis.json", json!({"total_posts": 3}))),
            NavigationToken::detached(),
            "home",
        );

        let value = ctx.dataset("kpis.json").await.unwrap();
        assert_eq!(value["total_posts"], 3);

        let err = ctx.dataset("missing.json").await.unwrap_err();
        assert!(matches!(err, PageError::Data(DataError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_dataset_abandoned_when_superseded() {
        let source = MemorySource::new()
            .with("slow.json", json!([]))
            .with_latency("slow.json", Duration::from_secs(5));
        let (tx, rx) = watch::channel(1u64);
        let ctx = PageContext::new(services(source), NavigationToken::new(1, rx), "slow");

        let fetch = tokio::spawn(async move { ctx.dataset("slow.json").await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send_replace(2);

        let result = tokio::time::timeout(Duration::from_secs(1), fetch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.unwrap_err(), PageError::Cancelled);
    }
}
