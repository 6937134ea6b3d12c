//! Page contract
//!
//! A page is an async render function from a [`PageContext`] to a view plus
//! an optional cleanup that runs before the next page mounts.

use std::future::Future;

use async_trait::async_trait;

use super::context::PageContext;
use super::error::PageError;
use crate::view::View;

/// Teardown returned by a page, run exactly once
pub type Cleanup = Box<dyn FnOnce() -> anyhow::Result<()> + Send>;

/// Output of a successful render
pub struct Rendered {
    pub view: View,
    pub cleanup: Option<Cleanup>,
}

impl Rendered {
    pub fn new(view: View) -> Self {
        Self {
            view,
            cleanup: None,
        }
    }

    pub fn with_cleanup<F>(mut self, cleanup: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.cleanup = Some(Box::new(cleanup));
        self
    }
}

impl std::fmt::Debug for Rendered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rendered")
            .field("view", &self.view)
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}

impl From<View> for Rendered {
    fn from(view: View) -> Self {
        Rendered::new(view)
    }
}

/// A routable page
#[async_trait]
pub trait Page: Send + Sync {
    async fn render(&self, ctx: PageContext) -> Result<Rendered, PageError>;
}

/// Page backed by an async closure
pub struct FnPage<F>(F);

/// Wrap an async closure as a [`Page`]
pub fn page_fn<F, Fut>(render: F) -> FnPage<F>
where
    F: Fn(PageContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Rendered, PageError>> + Send + 'static,
{
    FnPage(render)
}

#[async_trait]
impl<F, Fut> Page for FnPage<F>
where
    F: Fn(PageContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Rendered, PageError>> + Send + 'static,
{
    async fn render(&self, ctx: PageContext) -> Result<Rendered, PageError> {
        (self.0)(ctx).await
    }
}
