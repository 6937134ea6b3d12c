//! Dashboard
//!
//! Wires configuration, the dataset source, the chart dispatcher, the page
//! registry and the session gate into one value the binaries drive.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::auth::{AuthError, Session};
use crate::chart::ChartDispatcher;
use crate::config::{Config, SourceKind};
use crate::data::{DataError, DatasetSource, DatasetStore, DirectorySource, HttpSource};
use crate::pages::{self, page_info};
use crate::router::{MountTarget, Outcome, Router, RouterConfig, Services};
use crate::view::render_document;

/// Dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Login required")]
    NotAuthenticated,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Data(#[from] DataError),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// A route handled to completion
#[derive(Debug, Clone)]
pub struct Opened {
    pub outcome: Outcome,
    pub target: MountTarget,
}

/// The assembled dashboard
pub struct Dashboard {
    config: Config,
    router: Arc<Router>,
    session: Session,
}

/// Build the dataset source named by the `[data]` section
pub fn build_source(config: &Config) -> DashboardResult<Arc<dyn DatasetSource>> {
    let source: Arc<dyn DatasetSource> = match config.data.source {
        SourceKind::Directory => Arc::new(DirectorySource::new(&config.data.dir)),
        SourceKind::Http => Arc::new(HttpSource::new(
            config.data.base_url.clone(),
            config.data.request_timeout(),
        )?),
    };
    Ok(source)
}

impl Dashboard {
    /// Assemble a dashboard reading datasets from the configured source
    pub fn from_config(config: Config) -> DashboardResult<Self> {
        let source = build_source(&config)?;
        Ok(Self::with_source(config, source))
    }

    /// Assemble a dashboard over an explicit source
    pub fn with_source(config: Config, source: Arc<dyn DatasetSource>) -> Self {
        let store = Arc::new(DatasetStore::new(source));
        let services = Services::new(
            store,
            ChartDispatcher::with_theme(config.theme.to_theme()),
            config.profile.clone(),
        );
        let router = Arc::new(Router::new(
            RouterConfig {
                home_route: config.router.home_route.clone(),
            },
            services,
        ));
        pages::register_all(&router);

        tracing::info!(
            source = %router.services().store.describe(),
            routes = router.routes().len(),
            "Dashboard assembled"
        );

        let session = Session::new(&config.auth);
        Self {
            config,
            router,
            session,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &DatasetStore {
        &self.router.services().store
    }

    /// Log in and re-run route handling for the current location
    pub fn login(&self, username: &str, password: &str) -> DashboardResult<()> {
        self.session.login(username, password)?;
        self.router.refresh();
        Ok(())
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Start following location changes in the background
    pub fn spawn_router(&self) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(&self.router).run())
    }

    /// Navigate to `route` and handle it in place, outside the run loop
    pub async fn open(&self, route: &str) -> DashboardResult<Opened> {
        if !self.session.is_authenticated() {
            return Err(DashboardError::NotAuthenticated);
        }

        self.router.navigate(route);
        let outcome = self.router.handle_navigation(route).await;
        Ok(Opened {
            outcome,
            target: self.router.snapshot(),
        })
    }

    /// Standalone HTML document for a mount target
    pub fn document(&self, target: &MountTarget) -> String {
        let page = target
            .active_link()
            .and_then(|link| page_info(&link.key))
            .map(|info| info.label);
        let title = match page {
            Some(label) => format!("{} · {}", label, self.config.profile.service),
            None => self.config.profile.service.clone(),
        };
        render_document(&title, &target.nav, &target.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemorySource;
    use serde_json::json;

    fn dashboard() -> Dashboard {
        let source = MemorySource::new().with(
            "kpis.json",
            json!({"impressions_total": 1000, "avg_engagement_rate": 4.5}),
        );
        Dashboard::with_source(Config::default(), Arc::new(source))
    }

    #[tokio::test]
    async fn test_open_requires_login() {
        let dashboard = dashboard();
        let err = dashboard.open("home").await.unwrap_err();
        assert!(matches!(err, DashboardError::NotAuthenticated));

        assert!(matches!(
            dashboard.login("analyst", "wrong"),
            Err(DashboardError::Auth(AuthError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_open_home() {
        let dashboard = dashboard();
        dashboard.login("analyst", "pulseboard").unwrap();

        let opened = dashboard.open("").await.unwrap();
        assert_eq!(
            opened.outcome,
            Outcome::Mounted {
                route: "home".into()
            }
        );
        assert_eq!(opened.target.active_link().map(|l| l.key.as_str()), Some("home"));

        let html = dashboard.document(&opened.target);
        assert!(html.contains("<title>Home · Pulseboard</title>"));
        assert!(html.contains("1,000"));
    }

    #[tokio::test]
    async fn test_login_redispatches_current_route() {
        let dashboard = dashboard();
        let handle = dashboard.spawn_router();
        let epoch = dashboard.router().epoch();

        dashboard.login("analyst", "pulseboard").unwrap();
        let settled = dashboard.router().wait_settled_after(epoch).await;
        assert_eq!(settled.state.route(), Some("home"));

        handle.abort();
    }

    #[test]
    fn test_build_source_http() {
        let mut config = Config::default();
        config.data.source = SourceKind::Http;
        let source = build_source(&config).unwrap();
        assert_eq!(source.describe(), "http http://127.0.0.1:8090");
    }
}
