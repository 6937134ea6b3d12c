//! End-to-end dashboard tests over the fixture datasets

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use pulseboard::api::{build_router, AppState};
use pulseboard::chart::{ChartDispatcher, ChartRequest, ChartSpec};
use pulseboard::data::{names, row, DirectorySource, HttpSource};
use pulseboard::pages::PAGES;
use pulseboard::router::{Outcome, RouteFailure};
use pulseboard::{Config, Dashboard};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn logged_in(dashboard: Dashboard) -> Dashboard {
    dashboard.login("analyst", "pulseboard").unwrap();
    dashboard
}

fn fixture_dashboard() -> Dashboard {
    logged_in(Dashboard::with_source(
        Config::default(),
        Arc::new(DirectorySource::new(fixtures())),
    ))
}

fn kpi_values(dashboard: &Dashboard) -> Vec<String> {
    dashboard
        .router()
        .snapshot()
        .content
        .find_by_class("kpi-value")
        .iter()
        .map(|el| el.text_content())
        .collect()
}

#[tokio::test]
async fn test_every_page_mounts() {
    let dashboard = fixture_dashboard();

    for page in &PAGES {
        let opened = dashboard.open(page.key).await.unwrap();
        assert_eq!(
            opened.outcome,
            Outcome::Mounted {
                route: page.key.to_string()
            },
            "{} failed to mount",
            page.key
        );
        assert_eq!(
            opened.target.active_link().map(|l| l.key.as_str()),
            Some(page.key)
        );
        assert!(opened.target.content.find_by_class("error-message").is_empty());
    }

    let mut cached = dashboard.store().cached_names().await;
    cached.sort();
    let mut all: Vec<String> = names::ALL.iter().map(|n| n.to_string()).collect();
    all.sort();
    assert_eq!(cached, all);
}

#[tokio::test]
async fn test_home_headline_metrics() {
    let dashboard = fixture_dashboard();
    dashboard.open("").await.unwrap();

    assert_eq!(
        kpi_values(&dashboard),
        vec!["1,000", "500", "10", "200", "5", "50", "300", "4.5%"]
    );
}

#[tokio::test]
async fn test_missing_data_then_recovery() {
    let empty = tempfile::tempdir().unwrap();
    let dashboard = logged_in(Dashboard::with_source(
        Config::default(),
        Arc::new(DirectorySource::new(empty.path())),
    ));

    let opened = dashboard.open("home").await.unwrap();
    assert!(matches!(opened.outcome, Outcome::Failed { .. }));
    let text = opened.target.content.text_content();
    assert!(text.starts_with("Error loading page: Failed to load kpis.json"));

    // The failure is not cached; once the file appears the page loads
    std::fs::copy(fixtures().join("kpis.json"), empty.path().join("kpis.json")).unwrap();
    let opened = dashboard.open("content-performance").await.unwrap();
    assert!(matches!(opened.outcome, Outcome::Failed { .. }));
    let opened = dashboard.open("home").await.unwrap();
    assert!(matches!(opened.outcome, Outcome::Mounted { .. }));
}

#[tokio::test]
async fn test_unknown_route() {
    let dashboard = fixture_dashboard();
    let opened = dashboard.open("settings").await.unwrap();

    assert_eq!(
        opened.outcome,
        Outcome::Failed {
            route: "settings".into(),
            failure: RouteFailure::NotFound("settings".into()),
        }
    );
    assert_eq!(opened.target.content.text_content(), "Page not found.");
    assert!(opened.target.active_link().is_none());

    let opened = dashboard.open("network-growth").await.unwrap();
    assert!(matches!(opened.outcome, Outcome::Mounted { .. }));
}

#[tokio::test]
async fn test_pages_over_dataset_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, build_router(AppState::new(fixtures())))
            .await
            .unwrap();
    });

    let source = HttpSource::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    let dashboard = logged_in(Dashboard::with_source(Config::default(), Arc::new(source)));

    let opened = dashboard.open("icp-engagement").await.unwrap();
    assert!(matches!(opened.outcome, Outcome::Mounted { .. }));
    let text = opened.target.content.text_content();
    assert!(text.contains("From 12 contacts to 5 ICP, 3 engaged, 2 with 3+ engagements and 1 commented."));

    assert_eq!(dashboard.store().available().await.unwrap().len(), names::ALL.len());

    server.abort();
}

#[test]
fn test_rows_built_through_public_helpers() {
    let rows = vec![
        row([("category", json!("ICP")), ("count", json!(3))]),
        row([("category", json!("Other")), ("count", json!(1))]),
    ];
    let figure = ChartDispatcher::new().render(&ChartRequest::new(
        ChartSpec::donut("count", "category"),
        rows,
    ));

    assert_eq!(figure.traces()[0]["labels"], json!(["ICP", "Other"]));
    assert_eq!(figure.traces()[0]["values"], json!([3, 1]));
}
