//! Audience quality: who among the engagers matches the ICP

use std::collections::HashSet;

use async_trait::async_trait;

use super::shared::{company_totals, footer, percent_of};
use crate::chart::{ChartRequest, ChartSpec};
use crate::data::{names, rows_of, to_rows, Engager, WeeklyIcp};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Column, Kpi, TableOptions};
use crate::view::{format_number, plain_number, Element, View};

const TOP_ENGAGERS_SHOWN: usize = 20;

pub struct AudienceQualityPage;

#[async_trait]
impl Page for AudienceQualityPage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let (engagers, weekly_icp, reactions) = tokio::try_join!(
            ctx.dataset_as::<Vec<Engager>>(names::ENGAGER_SUMMARY),
            ctx.dataset_as::<Vec<WeeklyIcp>>(names::WEEKLY_ICP),
            ctx.dataset(names::ENRICHED_REACTIONS),
        )?;

        let icp: Vec<&Engager> = engagers.iter().filter(|e| e.is_icp).collect();
        let icp_engagements: f64 = icp.iter().map(|e| e.total_engagements).sum();
        let icp_companies = icp
            .iter()
            .filter_map(|e| e.company.as_deref())
            .filter(|c| !c.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let mut view = View::new();
        view.extend(components::page_header(
            "Audience Quality",
            "Measuring the quality of engagement through ICP (Ideal Customer Profile) contacts.",
        ));
        view.push(components::kpi_row(&[
            Kpi::new("Unique ICP Engagers", icp.len().to_string()),
            Kpi::new("Total ICP Engagements", format_number(icp_engagements)),
            Kpi::new(
                "ICP % of Engagers",
                percent_of(icp.len() as f64, engagers.len() as f64),
            ),
            Kpi::new("ICP Companies", icp_companies.to_string()),
        ]));

        view.push(components::section_title("ICP Engagement Over Time"));
        if !weekly_icp.is_empty() {
            let request = ChartRequest::new(
                ChartSpec::line("week", ["icp_engagements", "unique_icp_engagers"]),
                to_rows(&weekly_icp),
            )
            .title("Weekly ICP Engagements & Unique Engagers");
            view.push(components::chart_card(
                "chart-icp-trend",
                ctx.chart(&request),
                "Weekly count of ICP engagements and unique ICP people engaging.",
            ));
        }

        view.push(components::section_title("ICP Engagement by Reaction Type"));
        let reactions = rows_of(&reactions);
        if !reactions.is_empty() {
            let request = ChartRequest::new(ChartSpec::horizontal_bar("count", "reactionType"), reactions)
                .title("ICP Engagements by Reaction Type");
            view.push(components::chart_card(
                "chart-reactions",
                ctx.chart(&request),
                "What types of reactions ICP contacts are leaving.",
            ));
        }

        let top: Vec<Engager> = icp.iter().take(TOP_ENGAGERS_SHOWN).map(|e| (*e).clone()).collect();
        let left = Element::new("div")
            .child(components::section_title("Top ICP Engagers"))
            .child(components::table(
                &to_rows(&top),
                &[
                    Column::new("full_name", "Name"),
                    Column::new("title", "Title"),
                    Column::new("company", "Company"),
                    Column::new("total_engagements", "Engagements"),
                    Column::new("icp_tier", "ICP Tier"),
                ],
                &TableOptions::default(),
            ));

        let companies = company_totals(icp.iter().copied());
        let right = Element::new("div")
            .child(components::section_title("Top ICP Companies"))
            .child(components::table(
                &to_rows(&companies),
                &[
                    Column::new("company", "Company"),
                    Column::new("total", "Total Engagements"),
                    Column::new("people", "People").format(plain_number),
                ],
                &TableOptions::default(),
            ));
        view.push(components::grid(2, [left, right]));

        view.push(footer(
            ctx.profile(),
            "Engagement data joined with contact enrichment",
            "ICP means contacts matching the broad, global or specific ICP criteria.",
        ));

        Ok(view.into())
    }
}
