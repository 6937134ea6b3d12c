//! Acquisition velocity: ICP engagers per post and rolling trends

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use super::shared::footer;
use crate::chart::{ChartRequest, ChartSpec};
use crate::data::{names, to_rows, WeeklyIcp, WeeklyPosts};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Kpi};
use crate::view::{format_fixed, plain_number, View};

/// Weeks in the rolling average window
pub const ROLLING_WEEKS: usize = 4;

pub struct AcquisitionVelocityPage;

/// Posting and ICP activity for one week
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VelocityWeek {
    pub week: String,
    pub num_posts: f64,
    pub total_impressions: f64,
    pub icp_engagements: f64,
    pub unique_icp_engagers: f64,
    pub icp_per_post: f64,
    pub rolling_icp: f64,
    pub rolling_icp_per_post: f64,
}

/// Join weekly posts with weekly ICP activity and compute rolling averages.
///
/// Weeks without ICP activity count as zero. Posts-per-week below one count
/// as one.
pub fn velocity(posts: &[WeeklyPosts], icp: &[WeeklyIcp]) -> Vec<VelocityWeek> {
    let by_week: HashMap<&str, &WeeklyIcp> = icp.iter().map(|w| (w.week.as_str(), w)).collect();

    let mut weeks: Vec<VelocityWeek> = posts
        .iter()
        .map(|w| {
            let (icp_engagements, unique_icp_engagers) = by_week
                .get(w.week.as_str())
                .map(|i| (i.icp_engagements, i.unique_icp_engagers))
                .unwrap_or((0.0, 0.0));
            VelocityWeek {
                week: w.week.clone(),
                num_posts: w.num_posts,
                total_impressions: w.total_impressions,
                icp_engagements,
                unique_icp_engagers,
                icp_per_post: unique_icp_engagers / w.num_posts.max(1.0),
                ..VelocityWeek::default()
            }
        })
        .collect();

    for i in 0..weeks.len() {
        let window = &weeks[i.saturating_sub(ROLLING_WEEKS - 1)..=i];
        let len = window.len() as f64;
        let rolling_icp = window.iter().map(|w| w.unique_icp_engagers).sum::<f64>() / len;
        let rolling_per_post = window.iter().map(|w| w.icp_per_post).sum::<f64>() / len;
        weeks[i].rolling_icp = rolling_icp;
        weeks[i].rolling_icp_per_post = rolling_per_post;
    }
    weeks
}

fn scorecards(weeks: &[VelocityWeek]) -> Option<[Kpi; 3]> {
    // Ties resolve to the later week
    let best = weeks
        .iter()
        .max_by(|a, b| a.icp_per_post.total_cmp(&b.icp_per_post))?;
    let most = weeks
        .iter()
        .max_by(|a, b| a.unique_icp_engagers.total_cmp(&b.unique_icp_engagers))?;
    let avg_posts = weeks.iter().map(|w| w.num_posts).sum::<f64>() / weeks.len() as f64;

    Some([
        Kpi::new("Best ICP/Post Week", format_fixed(best.icp_per_post, 2)),
        Kpi::new("Most ICP Engagers Week", plain_number(most.unique_icp_engagers)),
        Kpi::new("Avg Posts/Week", format_fixed(avg_posts, 1)),
    ])
}

#[async_trait]
impl Page for AcquisitionVelocityPage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let (weekly_posts, weekly_icp) = tokio::try_join!(
            ctx.dataset_as::<Vec<WeeklyPosts>>(names::WEEKLY_POSTS),
            ctx.dataset_as::<Vec<WeeklyIcp>>(names::WEEKLY_ICP),
        )?;

        let weeks = velocity(&weekly_posts, &weekly_icp);
        let total_icp: f64 = weeks.iter().map(|w| w.unique_icp_engagers).sum();
        let total_posts: f64 = weeks.iter().map(|w| w.num_posts).sum();

        let mut view = View::new();
        view.extend(components::page_header(
            "Acquisition Velocity",
            "How efficiently content acquires ICP engagement: ICP contacts per post and rolling trends.",
        ));
        view.push(components::kpi_row(&[
            Kpi::new("Total ICP Engagers", plain_number(total_icp)),
            Kpi::new("Total Posts", plain_number(total_posts)),
            Kpi::new(
                "ICP per Post (overall)",
                format_fixed(total_icp / total_posts.max(1.0), 2),
            ),
            Kpi::new("Weeks of Data", weeks.len().to_string()),
        ]));

        let rows = to_rows(&weeks);

        view.push(components::section_title("Weekly ICP Engagers & Rolling Average"));
        if !rows.is_empty() {
            let request = ChartRequest::new(
                ChartSpec::line("week", ["unique_icp_engagers", "rolling_icp"]),
                rows.clone(),
            )
            .title("ICP Engagers per Week (with 4-week rolling avg)");
            view.push(components::chart_card(
                "chart-velocity",
                ctx.chart(&request),
                "Second line shows the 4-week rolling average of unique ICP engagers.",
            ));
        }

        view.push(components::section_title("ICP per Post Efficiency"));
        if !rows.is_empty() {
            let request = ChartRequest::new(
                ChartSpec::line("week", ["icp_per_post", "rolling_icp_per_post"]),
                rows.clone(),
            )
            .title("ICP Engagers per Post (with rolling avg)");
            view.push(components::chart_card(
                "chart-efficiency",
                ctx.chart(&request),
                "How many ICP contacts each post reaches.",
            ));
        }

        view.push(components::section_title("Posts vs ICP Engagement"));
        if rows.len() > 2 {
            let request = ChartRequest::new(
                ChartSpec::scatter("num_posts", "unique_icp_engagers").size("total_impressions"),
                rows,
            )
            .title("Weekly Posts vs ICP Engagers");
            view.push(components::chart_card(
                "chart-scatter",
                ctx.chart(&request),
                "Does posting more lead to more ICP engagement? Bubble size is total impressions.",
            ));
        }

        view.push(components::section_title("Efficiency Scorecards"));
        if let Some(cards) = scorecards(&weeks) {
            view.push(components::kpi_row(&cards));
        }

        view.push(footer(
            ctx.profile(),
            "Daily update and enriched engagement data",
            "ICP per post is unique ICP engagers divided by posts published that week.",
        ));

        Ok(view.into())
    }
}
