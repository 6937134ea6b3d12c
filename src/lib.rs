//! # Pulseboard
//!
//! A routed analytics dashboard over pre-computed social engagement
//! datasets. Pages are addressed by hash-style route keys; each navigation
//! runs the previous page's cleanup, shows a loading placeholder, loads the
//! page's datasets through a shared cache and mounts the rendered view.
//!
//! ## Modules
//!
//! - [`router`]: route resolution, page lifecycle and navigation history
//! - [`pages`]: the nine dashboard pages and their registry
//! - [`chart`]: chart kinds, theme and the Plotly figure dispatcher
//! - [`data`]: dataset sources, records and the memoizing store
//! - [`view`]: view tree, components, formatting, HTML and text rendering
//! - [`app`]: the assembled dashboard and its session gate
//! - [`api`]: dataset server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulseboard::{Config, Dashboard};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dashboard = Dashboard::from_config(Config::load_default())?;
//!     dashboard.login("analyst", "pulseboard")?;
//!
//!     let opened = dashboard.open("content-performance").await?;
//!     println!("{}", dashboard.document(&opened.target));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod chart;
pub mod config;
pub mod data;
pub mod logging;
pub mod pages;
pub mod router;
pub mod view;

pub use app::{Dashboard, DashboardError, DashboardResult, Opened};

pub use auth::{AuthError, Session};

pub use chart::{ChartDispatcher, ChartError, ChartKind, ChartRequest, ChartSpec, Figure, Theme};

pub use config::{Config, ConfigError};

pub use data::{DataError, DataResult, DatasetSource, DatasetStore};

pub use router::{
    MountTarget, Outcome, Page, PageContext, PageError, RouteFailure, RouteState, Router,
    RouterConfig,
};

pub use view::{Element, Node, View};
