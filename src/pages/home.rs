//! Home page: headline metrics and links to every other page

use async_trait::async_trait;

use super::shared::footer;
use super::PAGES;
use crate::config::ProfileConfig;
use crate::data::{names, Kpis};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Kpi};
use crate::view::{format_number, plain_number, View};

pub struct HomePage;

#[async_trait]
impl Page for HomePage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let kpis: Kpis = ctx.dataset_as(names::KPIS).await?;
        Ok(home_view(ctx.profile(), &kpis).into())
    }
}

/// Two rows of four headline metrics, page links and provenance
pub fn home_view(profile: &ProfileConfig, kpis: &Kpis) -> View {
    let mut view = View::new();
    view.extend(components::page_header(
        &profile.brand,
        &format!(
            "LinkedIn performance dashboard: content impact, audience growth and ICP engagement for {}.",
            profile.subject
        ),
    ));

    view.push(components::kpi_row(&[
        Kpi::new("Impressions", format_number(kpis.impressions_total)),
        Kpi::new("Members Reached", format_number(kpis.members_reached)),
        Kpi::new("Total Posts", plain_number(kpis.total_posts)),
        Kpi::new("Total Engagements", format_number(kpis.total_engagements)),
    ]));
    view.push(components::kpi_row(&[
        Kpi::new("ICP Contacts", plain_number(kpis.icp_contacts)),
        Kpi::new("Unique Engagers", format_number(kpis.unique_engagers)),
        Kpi::new("Followers", format_number(kpis.latest_followers))
            .delta(format!("+{}", plain_number(kpis.new_followers))),
        Kpi::new(
            "Avg Engagement Rate",
            format!("{}%", plain_number(kpis.avg_engagement_rate)),
        ),
    ]));

    view.push(components::divider());
    view.push(components::section_title("Dashboard Pages"));
    view.push(components::grid(
        2,
        PAGES
            .iter()
            .filter(|page| page.key != "home")
            .map(|page| components::nav_card(page.key, &format!("{} {}", page.icon, page.label))),
    ));

    let mut notes = format!(
        "Data covers {} posts and {} engagements.",
        plain_number(kpis.total_posts),
        format_number(kpis.total_engagements)
    );
    if let Some(start) = kpis.service_start_date.as_deref() {
        notes = format!("Service period starts {}. {}", start, notes);
    }
    view.push(footer(profile, "LinkedIn exports processed into JSON datasets", &notes));

    view
}
