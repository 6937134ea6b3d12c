//! Audience growth: follower trend, engager composition and daily activity

use async_trait::async_trait;
use serde_json::json;

use super::shared::{footer, percent_of};
use crate::chart::{ChartRequest, ChartSpec};
use crate::data::{names, row, rows_of, Engager, Kpis};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Kpi};
use crate::view::{format_number, plain_number, Element, View};

pub struct AudienceGrowthPage;

#[async_trait]
impl Page for AudienceGrowthPage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let (kpis, followers, daily, engagers) = tokio::try_join!(
            ctx.dataset_as::<Kpis>(names::KPIS),
            ctx.dataset(names::FOLLOWERS),
            ctx.dataset(names::ENGAGEMENT_DAILY),
            ctx.dataset_as::<Vec<Engager>>(names::ENGAGER_SUMMARY),
        )?;

        let total_engagers = engagers.len() as f64;
        let icp_engagers = engagers.iter().filter(|e| e.is_icp).count() as f64;
        let new_followers = format!("+{}", plain_number(kpis.new_followers));

        let mut view = View::new();
        view.extend(components::page_header(
            "Audience Growth",
            &format!(
                "Tracking follower growth, reach and the composition of {} engaged audience.",
                ctx.profile().possessive()
            ),
        ));

        view.push(components::kpi_row(&[
            Kpi::new("Impressions", format_number(kpis.impressions_total)),
            Kpi::new("Members Reached", format_number(kpis.members_reached)),
            Kpi::new("Followers", format_number(kpis.latest_followers)).delta(new_followers.as_str()),
            Kpi::new("Total Posts", plain_number(kpis.total_posts)),
        ]));
        view.push(components::kpi_row(&[
            Kpi::new("New Followers", new_followers.as_str()),
            Kpi::new("Unique Engagers", format_number(total_engagers)),
            Kpi::new("ICP Engagers", plain_number(icp_engagers)),
            Kpi::new("ICP % of Engagers", percent_of(icp_engagers, total_engagers)),
        ]));

        view.push(components::section_title("Follower Growth"));
        let request = ChartRequest::new(
            ChartSpec::line("Date", ["Total Followers"]),
            rows_of(&followers),
        )
        .title("Total Followers Over Time");
        view.push(components::chart_card(
            "chart-followers",
            ctx.chart(&request),
            &format!(
                "Followers grew from {} to {} ({}).",
                format_number(kpis.start_followers),
                format_number(kpis.latest_followers),
                new_followers
            ),
        ));

        let composition = vec![
            row([("Category", json!("ICP")), ("Count", json!(icp_engagers))]),
            row([("Category", json!("Non-ICP")), ("Count", json!(total_engagers - icp_engagers))]),
        ];
        let donut = ChartRequest::new(ChartSpec::donut("Count", "Category"), composition)
            .title("ICP vs Non-ICP Engagers");
        let left = Element::new("div")
            .child(components::section_title("Engager Composition"))
            .child(components::chart_card(
                "chart-donut",
                ctx.chart(&donut),
                &format!(
                    "{} of {} unique engagers are ICP contacts.",
                    plain_number(icp_engagers),
                    plain_number(total_engagers)
                ),
            ));

        let daily_chart = ChartRequest::new(
            ChartSpec::line("Date", ["Impressions", "Engagements"]),
            rows_of(&daily),
        )
        .title("Daily Impressions & Engagements");
        let right = Element::new("div")
            .child(components::section_title("Daily Impressions & Engagements"))
            .child(components::chart_card(
                "chart-daily",
                ctx.chart(&daily_chart),
                "Daily performance from the engagement worksheet.",
            ));

        view.push(components::grid(2, [left, right]));
        view.push(footer(
            ctx.profile(),
            "Discovery, follower and engagement worksheets",
            "Follower data covers the export window only. ICP classification comes from contact enrichment.",
        ));

        Ok(view.into())
    }
}
