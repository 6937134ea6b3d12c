//! ICP engagement: funnel from contacts to commenters, weekly ICP share and
//! engagers missing from the contacts database

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::json;

use super::shared::footer;
use crate::chart::{ChartRequest, ChartSpec};
use crate::data::{names, row, to_rows, Engager, Kpis, Row, WeeklyShare};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Column, Kpi, TableOptions};
use crate::view::{plain_number, View};

const REPEAT_ENGAGEMENTS: f64 = 3.0;
const UNKNOWN_SHOWN: usize = 20;

pub struct IcpEngagementPage;

/// Funnel stage counts, widest first
#[derive(Debug, Clone, PartialEq)]
pub struct Funnel {
    pub contacts: f64,
    pub icp_contacts: f64,
    pub engaged: f64,
    pub repeat: f64,
    pub commented: f64,
}

impl Funnel {
    pub fn compute(kpis: &Kpis, engagers: &[Engager]) -> Self {
        let icp: Vec<&Engager> = engagers.iter().filter(|e| e.is_icp).collect();
        Self {
            contacts: kpis.total_contacts.unwrap_or(kpis.icp_contacts),
            icp_contacts: kpis.icp_contacts,
            engaged: icp.len() as f64,
            repeat: icp
                .iter()
                .filter(|e| e.total_engagements >= REPEAT_ENGAGEMENTS)
                .count() as f64,
            commented: icp.iter().filter(|e| e.comments > 0.0).count() as f64,
        }
    }

    fn rows(&self) -> Vec<Row> {
        [
            ("All Contacts", self.contacts),
            ("ICP Contacts", self.icp_contacts),
            ("ICP Engaged", self.engaged),
            ("3+ Engagements", self.repeat),
            ("Commented", self.commented),
        ]
        .into_iter()
        .map(|(stage, value)| row([("stage", json!(stage)), ("value", json!(value))]))
        .collect()
    }
}

/// ICP share of each week's engagements as a one-decimal percentage, by week
pub fn weekly_icp_percent(shares: &[WeeklyShare]) -> Vec<Row> {
    let mut weeks: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for share in shares {
        let (total, icp) = weeks.entry(share.week.as_str()).or_default();
        *total += share.engagements;
        if share.category == "ICP" {
            *icp += share.engagements;
        }
    }
    weeks
        .into_iter()
        .map(|(week, (total, icp))| {
            let pct = (icp / total.max(1.0) * 1000.0).round() / 10.0;
            row([("week", json!(week)), ("icp_pct", json!(pct))])
        })
        .collect()
}

#[async_trait]
impl Page for IcpEngagementPage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let (kpis, engagers, weekly_share) = tokio::try_join!(
            ctx.dataset_as::<Kpis>(names::KPIS),
            ctx.dataset_as::<Vec<Engager>>(names::ENGAGER_SUMMARY),
            ctx.dataset_as::<Vec<WeeklyShare>>(names::WEEKLY_SHARE),
        )?;

        let funnel = Funnel::compute(&kpis, &engagers);

        let mut view = View::new();
        view.extend(components::page_header(
            "ICP Engagement",
            "How ICP contacts engage, from awareness to active participation.",
        ));
        view.push(components::kpi_row(&[
            Kpi::new("Total Contacts", plain_number(funnel.contacts)),
            Kpi::new("ICP Contacts", plain_number(funnel.icp_contacts)),
            Kpi::new("ICP Engaged", plain_number(funnel.engaged)),
            Kpi::new("ICP 3+ Engagements", plain_number(funnel.repeat)),
        ]));

        view.push(components::section_title("ICP Engagement Funnel"));
        let request = ChartRequest::new(ChartSpec::funnel("stage", "value"), funnel.rows())
            .title("ICP Engagement Funnel");
        view.push(components::chart_card(
            "chart-funnel",
            ctx.chart(&request),
            &format!(
                "From {} contacts to {} ICP, {} engaged, {} with 3+ engagements and {} commented.",
                plain_number(funnel.contacts),
                plain_number(funnel.icp_contacts),
                plain_number(funnel.engaged),
                plain_number(funnel.repeat),
                plain_number(funnel.commented)
            ),
        ));

        view.push(components::section_title("ICP Engagement Share Over Time"));
        let weekly_pct = weekly_icp_percent(&weekly_share);
        if !weekly_pct.is_empty() {
            let request = ChartRequest::new(ChartSpec::line("week", ["icp_pct"]), weekly_pct)
                .title("ICP % of Weekly Engagements");
            view.push(components::chart_card(
                "chart-icp-pct",
                ctx.chart(&request),
                "Percentage of each week's engagements from ICP contacts.",
            ));
        }

        view.push(components::section_title("ICP Engager Details"));
        let icp: Vec<Engager> = engagers.iter().filter(|e| e.is_icp).cloned().collect();
        view.push(components::table(
            &to_rows(&icp),
            &[
                Column::new("full_name", "Name"),
                Column::new("title", "Title"),
                Column::new("company", "Company"),
                Column::new("country", "Country"),
                Column::new("total_engagements", "Engagements"),
                Column::new("likes", "Likes"),
                Column::new("comments", "Comments"),
                Column::new("unique_posts", "Posts"),
                Column::new("first_engagement", "First Seen"),
                Column::new("last_engagement", "Last Active"),
                Column::new("icp_tier", "ICP Tier"),
            ],
            &TableOptions::default(),
        ));

        view.push(components::section_title("Engaged but Not in Contacts"));
        view.push(components::caption_text(
            "People who engaged with posts but are not in the contacts database: potential new connections.",
        ));
        let unknown: Vec<Engager> = engagers
            .iter()
            .filter(|e| e.is_unknown_contact())
            .take(UNKNOWN_SHOWN)
            .cloned()
            .collect();
        if unknown.is_empty() {
            view.push(components::note("All engagers are in the contacts database."));
        } else {
            view.push(components::table(
                &to_rows(&unknown),
                &[
                    Column::new("profile_url", "Profile URL"),
                    Column::new("total_engagements", "Engagements"),
                    Column::new("likes", "Likes"),
                    Column::new("comments", "Comments"),
                    Column::new("unique_posts", "Posts"),
                    Column::new("last_engagement", "Last Active"),
                ],
                &TableOptions::links(["profile_url"]),
            ));
        }

        view.push(footer(
            ctx.profile(),
            "Engagement and contact enrichment data",
            "Funnel stages: all contacts, ICP match, engaged (any reaction), 3+ engagements, commented.",
        ));

        Ok(view.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::data::MemorySource;
    use crate::pages::testing::context;

    fn share(week: &str, category: &str, engagements: f64) -> WeeklyShare {
        WeeklyShare {
            week: week.to_string(),
            category: category.to_string(),
            engagements,
        }
    }

    #[test]
    fn test_weekly_icp_percent() {
        let rows = weekly_icp_percent(&[
            share("2026-01-12", "ICP", 1.0),
            share("2026-01-05", "ICP", 1.0),
            share("2026-01-05", "Non-ICP", 2.0),
            share("2026-01-12", "Non-ICP", 0.0),
        ]);

        assert_eq!(rows[0]["week"], "2026-01-05");
        assert_eq!(rows[0]["icp_pct"], json!(33.3));
        assert_eq!(rows[1]["icp_pct"], json!(100.0));
    }

    #[test]
    fn test_funnel_falls_back_to_icp_contacts() {
        let kpis = Kpis {
            icp_contacts: 40.0,
            ..Kpis::default()
        };
        let engagers = vec![
            Engager { is_icp: true, total_engagements: 3.0, comments: 1.0, ..Engager::default() },
            Engager { is_icp: true, total_engagements: 1.0, ..Engager::default() },
            Engager { is_icp: false, total_engagements: 9.0, comments: 4.0, ..Engager::default() },
        ];
        let funnel = Funnel::compute(&kpis, &engagers);

        assert_eq!(funnel.contacts, 40.0);
        assert_eq!(funnel.engaged, 2.0);
        assert_eq!(funnel.repeat, 1.0);
        assert_eq!(funnel.commented, 1.0);

        let with_total = Kpis {
            total_contacts: Some(189.0),
            ..kpis
        };
        assert_eq!(Funnel::compute(&with_total, &engagers).contacts, 189.0);
    }

    #[tokio::test]
    async fn test_render_all_known() {
        let source = MemorySource::new()
            .with("kpis.json", json!({"icp_contacts": 2, "total_contacts": 10}))
            .with(
                "engager_summary.json",
                json!([{"full_name": "Ada", "is_icp": true, "icp_tier": "Specific", "total_engagements": 4}]),
            )
            .with("weekly_share.json", json!([]));

        let rendered = IcpEngagementPage.render(context(source)).await.unwrap();
        let charts = rendered.view.charts();
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].1.kind, ChartKind::Funnel);

        let text = rendered.view.text_content();
        assert!(text.contains("All engagers are in the contacts database."));
        assert!(text.contains("From 10 contacts to 2 ICP, 1 engaged, 1 with 3+ engagements and 0 commented."));
    }

    #[tokio::test]
    async fn test_render_unknown_engagers() {
        let source = MemorySource::new()
            .with("kpis.json", json!({"icp_contacts": 2}))
            .with(
                "engager_summary.json",
                json!([{"profile_url": "https://example.com/in/x", "is_icp": false, "icp_tier": "Unknown"}]),
            )
            .with("weekly_share.json", json!([{"week": "2026-01-05", "category": "ICP", "engagements": 3}]));

        let rendered = IcpEngagementPage.render(context(source)).await.unwrap();
        assert_eq!(rendered.view.charts().len(), 2);
        let tables = rendered.view.find_by_class("data-table");
        assert_eq!(tables.len(), 1);
        assert!(tables[0].text_content().contains("View"));
        assert!(!rendered
            .view
            .text_content()
            .contains("All engagers are in the contacts database."));
    }
}
