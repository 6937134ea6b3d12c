//! Network growth: ICP contacts counted at their first engagement

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;

use super::shared::{date_part, footer};
use crate::chart::{ChartRequest, ChartSpec};
use crate::data::{names, row, to_rows, IcpFirstSeen, Row, WeeklyIcp, WeeklyShare};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Kpi};
use crate::view::{format_fixed, View};

pub struct NetworkGrowthPage;

/// Running total of ICP contacts by first engagement date, oldest first
pub fn cumulative_first_seen(first_seen: &[IcpFirstSeen]) -> Vec<Row> {
    let mut per_day: BTreeMap<&str, u64> = BTreeMap::new();
    for entry in first_seen {
        if let Some(date) = entry.first_engagement.as_deref().map(date_part) {
            if !date.is_empty() {
                *per_day.entry(date).or_default() += 1;
            }
        }
    }

    let mut total = 0;
    per_day
        .into_iter()
        .map(|(date, count)| {
            total += count;
            row([("date", json!(date)), ("cumulative_icp", json!(total))])
        })
        .collect()
}

/// Short day-month label for a week start (`19 Jan`), raw text when unparsable
pub fn week_label(week: &str) -> String {
    NaiveDate::parse_from_str(date_part(week), "%Y-%m-%d")
        .map(|date| date.format("%-d %b").to_string())
        .unwrap_or_else(|_| week.to_string())
}

#[async_trait]
impl Page for NetworkGrowthPage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let (first_seen, weekly_icp, weekly_share) = tokio::try_join!(
            ctx.dataset_as::<Vec<IcpFirstSeen>>(names::ICP_FIRST_SEEN),
            ctx.dataset_as::<Vec<WeeklyIcp>>(names::WEEKLY_ICP),
            ctx.dataset_as::<Vec<WeeklyShare>>(names::WEEKLY_SHARE),
        )?;

        let total_icp = first_seen.len();
        let weeks = weekly_icp.len();
        let rate = if weeks > 0 {
            format_fixed(total_icp as f64 / weeks as f64, 1)
        } else {
            "0".to_string()
        };
        let latest = first_seen
            .last()
            .and_then(|entry| entry.first_engagement.as_deref())
            .map(date_part)
            .unwrap_or("N/A");

        let mut view = View::new();
        view.extend(components::page_header(
            "Network Growth",
            &format!(
                "How {} ICP network is expanding over time, using first engagement date as a proxy for when contacts entered the network.",
                ctx.profile().possessive()
            ),
        ));
        view.push(components::kpi_row(&[
            Kpi::new("Total ICP Engagers", total_icp.to_string()),
            Kpi::new("ICP per Week (avg)", rate),
            Kpi::new("Weeks of Data", weeks.to_string()),
            Kpi::new("Latest ICP Engagement", latest),
        ]));

        view.push(components::section_title("Cumulative ICP Engagers Over Time"));
        if !first_seen.is_empty() {
            let request = ChartRequest::new(
                ChartSpec::line("date", ["cumulative_icp"]),
                cumulative_first_seen(&first_seen),
            )
            .title("Cumulative ICP Engagers (First Engagement Date)");
            view.push(components::chart_card(
                "chart-cumulative",
                ctx.chart(&request),
                "Each ICP contact counted at their first engagement date. This is a proxy: actual connection dates are unavailable.",
            ));
        }

        view.push(components::section_title("ICP vs Non-ICP Engagement Share"));
        if !weekly_share.is_empty() {
            let request = ChartRequest::new(
                ChartSpec::area("week", "engagements", "category", true),
                to_rows(&weekly_share),
            )
            .title("ICP vs Non-ICP Engagement Share");
            view.push(components::chart_card(
                "chart-share",
                ctx.chart(&request),
                "ICP share of total weekly engagement activity.",
            ));
        }

        view.push(components::section_title("Weekly ICP Growth Waterfall"));
        if weekly_icp.len() > 1 {
            let rows = weekly_icp
                .iter()
                .map(|week| {
                    row([
                        ("week", json!(week_label(&week.week))),
                        ("unique_icp_engagers", json!(week.unique_icp_engagers)),
                    ])
                })
                .collect();
            let request = ChartRequest::new(ChartSpec::waterfall("week", "unique_icp_engagers"), rows)
                .title("Weekly New ICP Engagers");
            view.push(components::chart_card(
                "chart-waterfall",
                ctx.chart(&request),
                "Net new unique ICP engagers each week.",
            ));
        }

        view.push(footer(
            ctx.profile(),
            "Engagement data enriched with contacts",
            "First engagement date is used as a proxy for ICP network entry. Connection dates are not in the source data.",
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

    fn seen(at: Option<&str>) -> IcpFirstSeen {
        IcpFirstSeen {
            first_engagement: at.map(str::to_string),
            ..IcpFirstSeen::default()
        }
    }

    #[test]
    fn test_cumulative_first_seen() {
        let rows = cumulative_first_seen(&[
            seen(Some("2026-01-03T10:00:00")),
            seen(Some("2026-01-01T09:00:00")),
            seen(None),
            seen(Some("2026-01-03T12:00:00")),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2026-01-01");
        assert_eq!(rows[0]["cumulative_icp"], json!(1));
        assert_eq!(rows[1]["cumulative_icp"], json!(3));
    }

    #[test]
    fn test_week_label() {
        assert_eq!(week_label("2026-01-19"), "19 Jan");
        assert_eq!(week_label("2026-02-02T00:00:00"), "2 Feb");
        assert_eq!(week_label("week 3"), "week 3");
    }

    #[tokio::test]
    async fn test_render() {
        let source = MemorySource::new()
            .with(
                "icp_first_seen.json",
                json!([
                    {"first_engagement": "2026-01-05T08:00:00"},
                    {"first_engagement": "2026-01-12T08:00:00"},
                    {"first_engagement": "2026-01-14T08:00:00"}
                ]),
            )
            .with(
                "weekly_icp.json",
                json!([
                    {"week": "2026-01-05", "unique_icp_engagers": 1},
                    {"week": "2026-01-12", "unique_icp_engagers": 2}
                ]),
            )
            .with("weekly_share.json", json!([]));

        let rendered = NetworkGrowthPage.render(context(source)).await.unwrap();
        let values: Vec<String> = rendered
            .view
            .find_by_class("kpi-value")
            .iter()
            .map(|el| el.text_content())
            .collect();
        assert_eq!(values, vec!["3", "1.5", "2", "2026-01-14"]);

        let charts = rendered.view.charts();
        let kinds: Vec<ChartKind> = charts.iter().map(|(_, f)| f.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Line, ChartKind::Waterfall]);
        assert_eq!(charts[1].1.traces()[0]["x"], json!(["5 Jan", "12 Jan"]));
    }

    #[tokio::test]
    async fn test_render_empty() {
        let source = MemorySource::new()
            .with("icp_first_seen.json", json!([]))
            .with("weekly_icp.json", json!([]))
            .with("weekly_share.json", json!([]));

        let rendered = NetworkGrowthPage.render(context(source)).await.unwrap();
        assert!(rendered.view.charts().is_empty());
        assert!(rendered.view.text_content().contains("N/A"));
    }
}
