//! Route state
//!
//! The router publishes one [`Transition`] per lifecycle step, and keeps the
//! mount target that pages render into.

use serde::Serialize;

use super::error::RouteFailure;
use crate::view::View;

/// Lifecycle state of the mount target
#[derive(Debug, Clone, PartialEq)]
pub enum RouteState {
    /// Nothing has been routed yet
    Idle,
    /// A page is rendering; the loading placeholder is shown
    Loading { route: String },
    /// A page's view is mounted
    Mounted { route: String },
    /// The error or not-found view is mounted
    Error { route: String, failure: RouteFailure },
}

impl RouteState {
    pub fn route(&self) -> Option<&str> {
        match self {
            RouteState::Idle => None,
            RouteState::Loading { route }
            | RouteState::Mounted { route }
            | RouteState::Error { route, .. } => Some(route),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RouteState::Loading { .. })
    }
}

/// A state tagged with the navigation epoch that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub epoch: u64,
    pub state: RouteState,
}

/// What one call to the navigation handler achieved
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Mounted { route: String },
    Failed { route: String, failure: RouteFailure },
    /// A newer navigation started first; the result was discarded
    Superseded { route: String },
}

impl Outcome {
    pub fn route(&self) -> &str {
        match self {
            Outcome::Mounted { route }
            | Outcome::Failed { route, .. }
            | Outcome::Superseded { route } => route,
        }
    }
}

/// Navigation link and whether it matches the current route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub key: String,
    pub label: String,
    pub active: bool,
}

/// The content area pages render into
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountTarget {
    pub content: View,
    pub scroll_top: u32,
    pub nav: Vec<NavLink>,
}

impl MountTarget {
    /// Mark the link for `route` active and every other link inactive
    pub(crate) fn activate(&mut self, route: &str) {
        for link in &mut self.nav {
            link.active = link.key == route;
        }
    }

    pub fn active_link(&self) -> Option<&NavLink> {
        self.nav.iter().find(|link| link.active)
    }
}
