//! Engagement targets: hot leads ranked for outreach

use async_trait::async_trait;

use super::shared::{company_totals, footer, mean, HOT_LEAD_THRESHOLD};
use crate::chart::{ChartRequest, ChartSpec};
use crate::data::{names, to_rows, Engager, WeeklyIcp};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Column, Kpi, TableOptions};
use crate::view::{format_fixed, plain_number, View};

const PEOPLE_SHOWN: usize = 30;
const COMPANIES_SHOWN: usize = 15;

pub struct EngagementTargetsPage;

/// Engagers at or above the hot lead threshold, most engaged first
pub fn hot_leads(engagers: &[Engager]) -> Vec<Engager> {
    let mut leads: Vec<Engager> = engagers
        .iter()
        .filter(|e| e.total_engagements >= HOT_LEAD_THRESHOLD)
        .cloned()
        .collect();
    leads.sort_by(|a, b| b.total_engagements.total_cmp(&a.total_engagements));
    leads
}

#[async_trait]
impl Page for EngagementTargetsPage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let (engagers, weekly_icp) = tokio::try_join!(
            ctx.dataset_as::<Vec<Engager>>(names::ENGAGER_SUMMARY),
            ctx.dataset_as::<Vec<WeeklyIcp>>(names::WEEKLY_ICP),
        )?;

        let leads = hot_leads(&engagers);
        let hot_icp = leads.iter().filter(|e| e.is_icp).count();
        let icp_totals: Vec<f64> = engagers
            .iter()
            .filter(|e| e.is_icp)
            .map(|e| e.total_engagements)
            .collect();
        let avg_icp = mean(&icp_totals)
            .map(|avg| format_fixed(avg, 1))
            .unwrap_or_else(|| "0".to_string());

        let mut view = View::new();
        view.extend(components::page_header(
            "Engagement Targets",
            "Actionable list of high-engagement contacts: hot leads for outreach.",
        ));
        view.push(components::kpi_row(&[
            Kpi::new("ICP Hot Leads (5+)", hot_icp.to_string()),
            Kpi::new("All Hot Leads (5+)", leads.len().to_string()),
            Kpi::new("Total ICP Engagers", icp_totals.len().to_string()),
            Kpi::new("Avg Engagements (ICP)", avg_icp),
        ]));

        view.push(components::section_title("Recommended People"));
        let people: Vec<Engager> = leads.iter().take(PEOPLE_SHOWN).cloned().collect();
        view.push(components::table(
            &to_rows(&people),
            &[
                Column::new("full_name", "Name"),
                Column::new("title", "Title"),
                Column::new("company", "Company"),
                Column::new("country", "Country"),
                Column::new("total_engagements", "Engagements"),
                Column::new("likes", "Likes"),
                Column::new("comments", "Comments"),
                Column::new("unique_posts", "Posts"),
                Column::new("last_engagement", "Last Active"),
                Column::new("icp_tier", "ICP Tier"),
            ],
            &TableOptions::default(),
        ));

        view.push(components::section_title("Top Companies by Engagement"));
        let mut companies = company_totals(&leads);
        companies.truncate(COMPANIES_SHOWN);
        view.push(components::table(
            &to_rows(&companies),
            &[
                Column::new("company", "Company"),
                Column::new("total", "Total Engagements"),
                Column::new("people", "People").format(plain_number),
            ],
            &TableOptions::default(),
        ));

        view.push(components::section_title("ICP Engagement Trend"));
        if !weekly_icp.is_empty() {
            let request = ChartRequest::new(
                ChartSpec::line("week", ["unique_icp_engagers"]),
                to_rows(&weekly_icp),
            )
            .title("Weekly Unique ICP Engagers");
            view.push(components::chart_card(
                "chart-icp-trend",
                ctx.chart(&request),
                "Number of unique ICP contacts engaging each week.",
            ));
        }

        view.push(footer(
            ctx.profile(),
            "Engagement data enriched with contacts",
            "Hot leads are contacts with 5 or more engagements.",
        ));

        Ok(view.into())
    }
}
