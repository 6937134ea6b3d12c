//! Dashboard pages
//!
//! One module per page. Each page loads the datasets it needs through its
//! [`PageContext`](crate::router::PageContext), builds charts with the shared
//! dispatcher and returns a [`View`](crate::view::View).

pub mod acquisition_velocity;
pub mod audience_growth;
pub mod audience_quality;
pub mod content_performance;
pub mod engagement_targets;
pub mod home;
pub mod icp_composition;
pub mod icp_engagement;
pub mod network_growth;
pub mod shared;

use crate::router::Router;

/// Registry entry for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Every page in navigation order
pub const PAGES: [PageInfo; 9] = [
    PageInfo { key: "home", label: "Home", icon: "⌂" },
    PageInfo { key: "content-performance", label: "Content Performance", icon: "▤" },
    PageInfo { key: "audience-growth", label: "Audience Growth", icon: "↗" },
    PageInfo { key: "audience-quality", label: "Audience Quality", icon: "◎" },
    PageInfo { key: "engagement-targets", label: "Engagement Targets", icon: "◉" },
    PageInfo { key: "network-growth", label: "Network Growth", icon: "⬡" },
    PageInfo { key: "acquisition-velocity", label: "Acquisition Velocity", icon: "⚡" },
    PageInfo { key: "icp-composition", label: "ICP Composition", icon: "◫" },
    PageInfo { key: "icp-engagement", label: "ICP Engagement", icon: "⇄" },
];

/// Look up a page by route key
pub fn page_info(key: &str) -> Option<&'static PageInfo> {
    PAGES.iter().find(|page| page.key == key)
}

/// Register every page and its navigation link
pub fn register_all(router: &Router) {
    for info in &PAGES {
        match info.key {
            "home" => router.register(info.key, home::HomePage),
            "content-performance" => {
                router.register(info.key, content_performance::ContentPerformancePage)
            }
            "audience-growth" => router.register(info.key, audience_growth::AudienceGrowthPage),
            "audience-quality" => router.register(info.key, audience_quality::AudienceQualityPage),
            "engagement-targets" => {
                router.register(info.key, engagement_targets::EngagementTargetsPage)
            }
            "network-growth" => router.register(info.key, network_growth::NetworkGrowthPage),
            "acquisition-velocity" => {
                router.register(info.key, acquisition_velocity::AcquisitionVelocityPage)
            }
            "icp-composition" => router.register(info.key, icp_composition::IcpCompositionPage),
            "icp-engagement" => router.register(info.key, icp_engagement::IcpEngagementPage),
            other => {
                tracing::warn!(route = other, "No page implementation for registry entry");
                continue;
            }
        }
        router.add_nav_link(info.key, format!("{} {}", info.icon, info.label));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::chart::ChartDispatcher;
    use crate::config::ProfileConfig;
    use crate::data::{DatasetStore, MemorySource};
    use crate::router::{NavigationToken, PageContext, Services};

    pub fn services(source: MemorySource) -> Services {
        Services::new(
            Arc::new(DatasetStore::new(Arc::new(source))),
            ChartDispatcher::new(),
            ProfileConfig::default(),
        )
    }

    /// Context for rendering a page outside a router
    pub fn context(source: MemorySource) -> PageContext {
        PageContext::new(services(source), NavigationToken::detached(), "test")
    }
}
