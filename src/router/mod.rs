//! Router
//!
//! Hash-style routing with a per-page lifecycle:
//!
//! 1. resolve the fragment to a route key (empty means the home route)
//! 2. mark the matching navigation link active
//! 3. run the previous page's cleanup
//! 4. show the loading placeholder
//! 5. render the page, or the not-found view for unknown keys
//! 6. commit the result (or the inline error view) and reset scroll
//!
//! Every navigation bumps an epoch. A render that finishes after a newer
//! navigation started is discarded and its cleanup runs immediately, so at
//! most one page is ever mounted.
//!
//! - **location**: fragment and history, the router's input
//! - **page**: the page contract
//! - **context**: what a page sees while rendering
//! - **token**: per-navigation cancellation
//! - **state**: published lifecycle states and the mount target
//! - **error**: error types

pub mod context;
pub mod error;
pub mod location;
pub mod page;
pub mod state;
pub mod token;

pub use context::{PageContext, Services};
pub use error::{PageError, PageResult, RouteFailure};
pub use location::{normalize_fragment, Location};
pub use page::{page_fn, Cleanup, FnPage, Page, Rendered};
pub use state::{MountTarget, NavLink, Outcome, RouteState, Transition};
pub use token::NavigationToken;

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use futures_util::FutureExt;
use tokio::sync::watch;

use crate::view::{components, View};

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Route used when the fragment is empty
    pub home_route: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            home_route: "home".to_string(),
        }
    }
}

struct Mount {
    target: MountTarget,
    /// Cleanup of the mounted page, tagged with its route
    cleanup: Option<(String, Cleanup)>,
}

/// Page registry and lifecycle engine
pub struct Router {
    config: RouterConfig,
    services: Services,
    pages: RwLock<HashMap<String, Arc<dyn Page>>>,
    location: Arc<Location>,
    epoch: watch::Sender<u64>,
    state: watch::Sender<Transition>,
    mount: Mutex<Mount>,
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run_cleanup(route: &str, cleanup: Cleanup) {
    match std::panic::catch_unwind(AssertUnwindSafe(cleanup)) {
        Ok(Ok(())) => tracing::debug!(route = %route, "Page cleaned up"),
        Ok(Err(e)) => tracing::warn!(route = %route, error = %e, "Page cleanup failed"),
        Err(panic) => tracing::warn!(
            route = %route,
            panic = %panic_message(panic.as_ref()),
            "Page cleanup panicked"
        ),
    }
}

impl Router {
    pub fn new(config: RouterConfig, services: Services) -> Self {
        let (epoch, _) = watch::channel(0);
        let (state, _) = watch::channel(Transition {
            epoch: 0,
            state: RouteState::Idle,
        });

        Self {
            config,
            services,
            pages: RwLock::new(HashMap::new()),
            location: Arc::new(Location::default()),
            epoch,
            state,
            mount: Mutex::new(Mount {
                target: MountTarget::default(),
                cleanup: None,
            }),
        }
    }

    fn lock_mount(&self) -> MutexGuard<'_, Mount> {
        self.mount.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn location(&self) -> &Arc<Location> {
        &self.location
    }

    /// Register a page; a later registration for the same key replaces it
    pub fn register<P: Page + 'static>(&self, key: impl Into<String>, page: P) {
        let key = key.into();
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        if pages.insert(key.clone(), Arc::new(page)).is_some() {
            tracing::debug!(route = %key, "Page registration replaced");
        } else {
            tracing::debug!(route = %key, "Page registered");
        }
    }

    /// Add a navigation link for `key`
    pub fn add_nav_link(&self, key: impl Into<String>, label: impl Into<String>) {
        let mut mount = self.lock_mount();
        mount.target.nav.push(NavLink {
            key: key.into(),
            label: label.into(),
            active: false,
        });
    }

    pub fn has_route(&self, key: &str) -> bool {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Registered route keys, sorted
    pub fn routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = self
            .pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        routes.sort();
        routes
    }

    fn page(&self, key: &str) -> Option<Arc<dyn Page>> {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Route key for a fragment; empty fragments resolve to the home route
    pub fn resolve(&self, fragment: &str) -> String {
        let key = normalize_fragment(fragment);
        if key.is_empty() {
            self.config.home_route.clone()
        } else {
            key.to_string()
        }
    }

    /// Point the location at `key`; `false` if it was already there
    pub fn navigate(&self, key: &str) -> bool {
        self.location.set_fragment(key)
    }

    /// Re-run route handling for the current fragment
    pub fn refresh(&self) {
        self.location.refresh();
    }

    pub fn back(&self) -> bool {
        self.location.back()
    }

    pub fn forward(&self) -> bool {
        self.location.forward()
    }

    /// Latest navigation epoch
    pub fn epoch(&self) -> u64 {
        *self.epoch.borrow()
    }

    /// Latest published transition
    pub fn state(&self) -> Transition {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Transition> {
        self.state.subscribe()
    }

    /// Copy of the mount target
    pub fn snapshot(&self) -> MountTarget {
        self.lock_mount().target.clone()
    }

    /// Record a scroll offset on the mount target
    pub fn set_scroll(&self, offset: u32) {
        self.lock_mount().target.scroll_top = offset;
    }

    fn publish(&self, epoch: u64, state: RouteState) {
        self.state.send_replace(Transition { epoch, state });
    }

    /// Handle one navigation to `fragment`
    pub async fn handle_navigation(&self, fragment: &str) -> Outcome {
        let route = self.resolve(fragment);

        let (epoch, previous) = {
            let mut mount = self.lock_mount();
            let mut epoch = 0;
            self.epoch.send_modify(|current| {
                *current += 1;
                epoch = *current;
            });
            mount.target.activate(&route);
            (epoch, mount.cleanup.take())
        };

        tracing::debug!(route = %route, epoch, "Navigation started");

        if let Some((owner, cleanup)) = previous {
            run_cleanup(&owner, cleanup);
        }

        {
            let mut mount = self.lock_mount();
            if *self.epoch.borrow() == epoch {
                mount.target.content = View::from(components::loading());
                self.publish(epoch, RouteState::Loading { route: route.clone() });
            }
        }

        let Some(page) = self.page(&route) else {
            tracing::warn!(route = %route, "No page registered for route");
            return self.commit(epoch, &route, Err(RouteFailure::NotFound(route.clone())));
        };

        let token = NavigationToken::new(epoch, self.epoch.subscribe());
        let ctx = PageContext::new(self.services.clone(), token, route.clone());

        // `render` itself may panic before handing back a future
        let render = async move { page.render(ctx).await };
        let result = match AssertUnwindSafe(render).catch_unwind().await {
            Ok(Ok(rendered)) => Ok(rendered),
            Ok(Err(PageError::Cancelled)) => {
                tracing::debug!(route = %route, epoch, "Page render cancelled");
                Err(RouteFailure::Render(PageError::Cancelled.to_string()))
            }
            Ok(Err(e)) => {
                tracing::error!(route = %route, error = %e, "Page render failed");
                Err(RouteFailure::Render(e.to_string()))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(route = %route, panic = %message, "Page render panicked");
                Err(RouteFailure::Panicked(message))
            }
        };

        self.commit(epoch, &route, result)
    }

    fn commit(&self, epoch: u64, route: &str, result: Result<Rendered, RouteFailure>) -> Outcome {
        let mut mount = self.lock_mount();

        if *self.epoch.borrow() != epoch {
            drop(mount);
            tracing::debug!(route = %route, epoch, "Discarding superseded render");
            if let Ok(Rendered {
                cleanup: Some(cleanup),
                ..
            }) = result
            {
                run_cleanup(route, cleanup);
            }
            return Outcome::Superseded {
                route: route.to_string(),
            };
        }

        let (view, state, outcome) = match result {
            Ok(rendered) => {
                mount.cleanup = rendered.cleanup.map(|cleanup| (route.to_string(), cleanup));
                (
                    rendered.view,
                    RouteState::Mounted {
                        route: route.to_string(),
                    },
                    Outcome::Mounted {
                        route: route.to_string(),
                    },
                )
            }
            Err(failure) => {
                let view = match &failure {
                    RouteFailure::NotFound(_) => View::from(components::not_found()),
                    RouteFailure::Render(message) => View::from(components::error_message(message)),
                    RouteFailure::Panicked(_) => {
                        View::from(components::error_message(&failure.to_string()))
                    }
                };
                (
                    view,
                    RouteState::Error {
                        route: route.to_string(),
                        failure: failure.clone(),
                    },
                    Outcome::Failed {
                        route: route.to_string(),
                        failure,
                    },
                )
            }
        };

        mount.target.content = view;
        mount.target.scroll_top = 0;
        self.publish(epoch, state);
        tracing::info!(route = %route, epoch, "Route settled");
        outcome
    }

    /// Follow location changes until the location is dropped.
    ///
    /// A change that arrives while a page is still rendering abandons that
    /// render (and the dataset fetches it awaits) and starts the new one.
    pub async fn run(self: Arc<Self>) {
        let mut changes = self.location.subscribe();
        tracing::info!(home = %self.config.home_route, "Router started");

        loop {
            let fragment = changes.borrow_and_update().clone();
            tokio::select! {
                _ = self.handle_navigation(&fragment) => {
                    if changes.changed().await.is_err() {
                        break;
                    }
                }
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    tracing::debug!(fragment = %fragment, "Navigation abandoned in flight");
                }
            }
        }

        tracing::info!("Router stopped");
    }

    /// Wait for the first settled state newer than `epoch`
    pub async fn wait_settled_after(&self, epoch: u64) -> Transition {
        let mut rx = self.state.subscribe();
        loop {
            {
                let transition = rx.borrow_and_update();
                if transition.epoch > epoch
                    && transition.epoch == *self.epoch.borrow()
                    && !transition.state.is_loading()
                {
                    return transition.clone();
                }
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartDispatcher;
    use crate::config::ProfileConfig;
    use crate::data::{DatasetStore, MemorySource};
    use crate::view::Element;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn router() -> Router {
        let store = Arc::new(DatasetStore::new(Arc::new(MemorySource::new())));
        Router::new(
            RouterConfig::default(),
            Services::new(store, ChartDispatcher::new(), ProfileConfig::default()),
        )
    }

    fn text_page(text: &'static str) -> impl Page {
        page_fn(move |_ctx| async move {
            Ok::<_, PageError>(Rendered::new(View::from(Element::new("p").text(text))))
        })
    }

    fn content(router: &Router) -> String {
        router.snapshot().content.text_content()
    }

    type Log = Arc<Mutex<Vec<String>>>;

    fn logging_page(name: &'static str, log: Log) -> impl Page {
        page_fn(move |_ctx| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("render {}", name));
                let cleanup_log = Arc::clone(&log);
                Ok::<_, PageError>(Rendered::new(View::from(Element::new("p").text(name))).with_cleanup(
                    move || {
                        cleanup_log.lock().unwrap().push(format!("cleanup {}", name));
                        Ok(())
                    },
                ))
            }
        })
    }

    #[tokio::test]
    async fn test_registration_is_isolated() {
        let router = router();
        router.register("a", text_page("first A"));
        router.register("b", text_page("B"));
        router.register("a", text_page("second A"));

        assert_eq!(router.routes(), vec!["a", "b"]);

        router.handle_navigation("a").await;
        assert_eq!(content(&router), "second A");

        router.handle_navigation("b").await;
        assert_eq!(content(&router), "B");
    }

    #[tokio::test]
    async fn test_empty_fragment_routes_home() {
        let router = router();
        router.register("home", text_page("Home"));

        let outcome = router.handle_navigation("").await;
        assert_eq!(outcome, Outcome::Mounted { route: "home".into() });
        assert_eq!(content(&router), "Home");

        router.handle_navigation("#home").await;
        assert_eq!(content(&router), "Home");
    }

    #[tokio::test]
    async fn test_not_found_then_recovers() {
        let router = router();
        router.register("home", text_page("Home"));

        let outcome = router.handle_navigation("nope").await;
        assert_eq!(
            outcome,
            Outcome::Failed {
                route: "nope".into(),
                failure: RouteFailure::NotFound("nope".into())
            }
        );
        assert_eq!(content(&router), "Page not found.");
        assert!(matches!(router.state().state, RouteState::Error { .. }));

        router.handle_navigation("home").await;
        assert_eq!(content(&router), "Home");
        assert_eq!(router.state().state, RouteState::Mounted { route: "home".into() });
    }

    #[tokio::test]
    async fn test_render_error_then_recovers() {
        let router = router();
        router.register(
            "broken",
            page_fn(|_ctx| async { Err::<Rendered, _>(PageError::render("bad data")) }),
        );
        router.register("home", text_page("Home"));

        router.handle_navigation("broken").await;
        assert_eq!(content(&router), "Error loading page: bad data");

        router.handle_navigation("home").await;
        assert_eq!(content(&router), "Home");
    }

    #[tokio::test]
    async fn test_render_panic_is_contained() {
        let router = router();
        router.register(
            "panics",
            page_fn(|_ctx| async {
                if true {
                    panic!("kaboom");
                }
                Ok::<_, PageError>(Rendered::new(View::new()))
            }),
        );
        router.register("home", text_page("Home"));

        let outcome = router.handle_navigation("panics").await;
        assert!(matches!(
            outcome,
            Outcome::Failed {
                failure: RouteFailure::Panicked(_),
                ..
            }
        ));
        assert_eq!(content(&router), "Error loading page: Page panicked: kaboom");

        router.handle_navigation("home").await;
        assert_eq!(content(&router), "Home");
    }

    struct PanicsBeforeFuture;

    impl Page for PanicsBeforeFuture {
        fn render<'life0, 'async_trait>(
            &'life0 self,
            _ctx: PageContext,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<Rendered, PageError>> + Send + 'async_trait>,
        >
        where
            'life0: 'async_trait,
            Self: 'async_trait,
        {
            panic!("thrown before any future exists")
        }
    }

    #[tokio::test]
    async fn test_synchronous_panic_is_contained() {
        let router = Arc::new(router());
        router.register("sync", PanicsBeforeFuture);
        router.register("home", text_page("Home"));

        let handle = {
            let router = Arc::clone(&router);
            tokio::spawn(async move { router.handle_navigation("sync").await })
        };
        let outcome = handle.await.unwrap();

        assert!(matches!(
            outcome,
            Outcome::Failed {
                failure: RouteFailure::Panicked(_),
                ..
            }
        ));
        assert!(matches!(router.state().state, RouteState::Error { .. }));
        assert_eq!(
            content(&router),
            "Error loading page: Page panicked: thrown before any future exists"
        );

        router.handle_navigation("home").await;
        assert_eq!(content(&router), "Home");
    }

    #[tokio::test]
    async fn test_cleanup_runs_before_loading_indicator() {
        let router = router();
        let seen: Arc<Mutex<Vec<RouteState>>> = Arc::default();
        let states = router.subscribe();
        let recorded = Arc::clone(&seen);
        router.register(
            "a",
            page_fn(move |_ctx| {
                let states = states.clone();
                let recorded = Arc::clone(&recorded);
                async move {
                    Ok::<_, PageError>(Rendered::new(View::from(Element::new("p").text("A"))).with_cleanup(
                        move || {
                            recorded.lock().unwrap().push(states.borrow().state.clone());
                            Ok(())
                        },
                    ))
                }
            }),
        );
        router.register("b", text_page("B"));

        router.handle_navigation("a").await;
        router.handle_navigation("b").await;

        assert_eq!(*seen.lock().unwrap(), vec![RouteState::Mounted { route: "a".into() }]);
        assert_eq!(content(&router), "B");
    }

    #[tokio::test]
    async fn test_cleanup_runs_once_before_next_render() {
        let router = router();
        let log: Log = Arc::default();
        router.register("a", logging_page("a", Arc::clone(&log)));
        router.register("b", text_page("B"));
        router.register("c", text_page("C"));

        router.handle_navigation("a").await;
        router.handle_navigation("b").await;
        router.handle_navigation("c").await;

        assert_eq!(*log.lock().unwrap(), vec!["render a", "cleanup a"]);
    }

    #[tokio::test]
    async fn test_cleanup_order_between_pages() {
        let router = router();
        let log: Log = Arc::default();
        router.register("a", logging_page("a", Arc::clone(&log)));
        router.register("b", logging_page("b", Arc::clone(&log)));

        router.handle_navigation("a").await;
        router.handle_navigation("b").await;
        router.handle_navigation("b").await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["render a", "cleanup a", "render b", "cleanup b", "render b"]
        );
    }

    #[tokio::test]
    async fn test_failing_cleanup_does_not_block_navigation() {
        let router = router();
        router.register(
            "a",
            page_fn(|_ctx| async {
                Ok::<_, PageError>(
                    Rendered::new(View::new()).with_cleanup(|| Err(anyhow::anyhow!("timer already gone"))),
                )
            }),
        );
        router.register(
            "b",
            page_fn(|_ctx| async {
                Ok::<_, PageError>(Rendered::new(View::new()).with_cleanup(|| panic!("cleanup panic")))
            }),
        );
        router.register("home", text_page("Home"));

        router.handle_navigation("a").await;
        router.handle_navigation("b").await;
        let outcome = router.handle_navigation("home").await;

        assert_eq!(outcome, Outcome::Mounted { route: "home".into() });
        assert_eq!(content(&router), "Home");
    }

    #[tokio::test]
    async fn test_superseded_render_is_discarded() {
        let router = Arc::new(router());
        let cleanups = Arc::new(AtomicUsize::new(0));

        let slow_cleanups = Arc::clone(&cleanups);
        router.register(
            "slow",
            page_fn(move |_ctx| {
                let cleanups = Arc::clone(&slow_cleanups);
                async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok::<_, PageError>(Rendered::new(View::from(Element::new("p").text("slow"))).with_cleanup(
                        move || {
                            cleanups.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        },
                    ))
                }
            }),
        );
        router.register("fast", text_page("fast"));

        let slow = {
            let router = Arc::clone(&router);
            tokio::spawn(async move { router.handle_navigation("slow").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let fast = router.handle_navigation("fast").await;
        let slow = slow.await.unwrap();

        assert_eq!(fast, Outcome::Mounted { route: "fast".into() });
        assert_eq!(slow, Outcome::Superseded { route: "slow".into() });
        assert_eq!(content(&router), "fast");
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scroll_reset_and_active_link() {
        let router = router();
        router.register("home", text_page("Home"));
        router.register("network-growth", text_page("Network"));
        router.add_nav_link("home", "Home");
        router.add_nav_link("network-growth", "Network Growth");

        router.handle_navigation("home").await;
        router.set_scroll(480);
        router.handle_navigation("network-growth").await;

        let target = router.snapshot();
        assert_eq!(target.scroll_top, 0);
        assert_eq!(target.active_link().map(|l| l.key.as_str()), Some("network-growth"));
        assert_eq!(target.nav.iter().filter(|l| l.active).count(), 1);

        router.handle_navigation("unknown").await;
        assert!(router.snapshot().active_link().is_none());
    }

    #[tokio::test]
    async fn test_run_loop_follows_location() {
        let router = Arc::new(router());
        router.register("home", text_page("Home"));
        router.register("a", text_page("A"));

        let before = router.epoch();
        let handle = tokio::spawn(Arc::clone(&router).run());

        let settled = router.wait_settled_after(before).await;
        assert_eq!(settled.state, RouteState::Mounted { route: "home".into() });

        let before = router.epoch();
        assert!(router.navigate("a"));
        router.wait_settled_after(before).await;
        assert_eq!(content(&router), "A");

        let before = router.epoch();
        assert!(router.back());
        router.wait_settled_after(before).await;
        assert_eq!(content(&router), "Home");

        handle.abort();
    }

    #[tokio::test]
    async fn test_run_loop_abandons_slow_page() {
        let router = Arc::new(router());
        let started = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));

        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));
        router.register(
            "slow",
            page_fn(move |_ctx| {
                let (s, f) = (Arc::clone(&s), Arc::clone(&f));
                async move {
                    s.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    f.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, PageError>(Rendered::new(View::new()))
                }
            }),
        );
        router.register("home", text_page("Home"));
        router.register("fast", text_page("Fast"));

        let before = router.epoch();
        let handle = tokio::spawn(Arc::clone(&router).run());
        router.wait_settled_after(before).await;

        router.navigate("slow");
        while started.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let before = router.epoch();
        router.navigate("fast");
        let settled = router.wait_settled_after(before).await;

        assert_eq!(settled.state, RouteState::Mounted { route: "fast".into() });
        assert_eq!(content(&router), "Fast");
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        handle.abort();
    }
}
