//! ICP composition: region, industry and size breakdowns plus audience
//! demographics

use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::json;

use super::shared::{count_by, footer, LabelCount};
use crate::chart::{ChartRequest, ChartSpec};
use crate::data::{names, row, to_rows, Demographic, IcpContact, Row};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Column, Kpi, TableOptions};
use crate::view::{Element, View};

pub struct IcpCompositionPage;

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> usize {
    values
        .flatten()
        .filter(|v| !v.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Demographic categories in first-appearance order
pub fn demographic_categories(demographics: &[Demographic]) -> Vec<&str> {
    let mut categories: Vec<&str> = Vec::new();
    for demo in demographics {
        if !categories.contains(&demo.category.as_str()) {
            categories.push(&demo.category);
        }
    }
    categories
}

/// Shares for one category as one-decimal percentages, largest first
pub fn demographic_shares(demographics: &[Demographic], category: &str) -> Vec<Row> {
    let mut shares: Vec<(&str, f64)> = demographics
        .iter()
        .filter(|d| d.category == category)
        .map(|d| (d.value.as_str(), (d.percentage * 1000.0).round() / 10.0))
        .collect();
    shares.sort_by(|a, b| b.1.total_cmp(&a.1));
    shares
        .into_iter()
        .map(|(label, count)| row([("label", json!(label)), ("count", json!(count))]))
        .collect()
}

/// Chart mount id for a demographic category
pub fn demographic_chart_id(category: &str) -> String {
    let slug: String = category
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    format!("chart-demo-{}", slug)
}

fn count_chart(ctx: &PageContext, id: &str, counts: &[LabelCount], title: &str) -> Option<Element> {
    if counts.is_empty() {
        return None;
    }
    let request = ChartRequest::new(ChartSpec::horizontal_bar("count", "label"), to_rows(counts))
        .title(title);
    Some(components::chart_card(id, ctx.chart(&request), ""))
}

#[async_trait]
impl Page for IcpCompositionPage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let (contacts, demographics) = tokio::try_join!(
            ctx.dataset_as::<Vec<IcpContact>>(names::CONTACTS_ICP),
            ctx.dataset_as::<Vec<Demographic>>(names::DEMOGRAPHICS),
        )?;

        let mut view = View::new();
        view.extend(components::page_header(
            "ICP Composition",
            "Who are the Ideal Customer Profile contacts? Breakdown by region, industry and company size, compared with LinkedIn audience demographics.",
        ));
        view.push(components::kpi_row(&[
            Kpi::new("ICP Contacts", contacts.len().to_string()),
            Kpi::new(
                "Countries",
                distinct(contacts.iter().map(|c| c.country.as_deref())).to_string(),
            ),
            Kpi::new(
                "Industries",
                distinct(contacts.iter().map(|c| c.industry.as_deref())).to_string(),
            ),
            Kpi::new(
                "Companies",
                distinct(contacts.iter().map(|c| c.company.as_deref())).to_string(),
            ),
        ]));

        let regions = count_by(contacts.iter().map(|c| c.country.as_deref()));
        let industries = count_by(contacts.iter().map(|c| c.industry.as_deref()));
        let sizes = count_by(contacts.iter().map(|c| c.size.as_deref()));

        let mut left = Element::new("div").child(components::section_title("ICP by Region"));
        if let Some(chart) = count_chart(&ctx, "chart-region", &regions, "ICP Contacts by Country") {
            left = left.child(chart);
        }
        let mut right = Element::new("div").child(components::section_title("ICP by Industry"));
        if let Some(chart) = count_chart(&ctx, "chart-industry", &industries, "ICP Contacts by Industry") {
            right = right.child(chart);
        }
        view.push(components::grid(2, [left, right]));

        view.push(components::section_title("ICP by Company Size"));
        if let Some(chart) = count_chart(&ctx, "chart-size", &sizes, "ICP Contacts by Company Size") {
            view.push(chart);
        }

        view.push(components::section_title("ICP Contacts Detail"));
        view.push(components::table(
            &to_rows(&contacts),
            &[
                Column::new("name", "Name"),
                Column::new("title", "Title"),
                Column::new("company", "Company"),
                Column::new("country", "Country"),
                Column::new("industry", "Industry"),
                Column::new("size", "Size"),
                Column::new("icp_tier", "ICP Tier"),
                Column::new("profile_url", "Profile"),
            ],
            &TableOptions::links(["profile_url"]),
        ));

        view.push(components::section_title("LinkedIn Audience Demographics"));
        view.push(components::caption_text(&format!(
            "From {} LinkedIn analytics: broader audience composition.",
            ctx.profile().possessive()
        )));
        for category in demographic_categories(&demographics) {
            let request = ChartRequest::new(
                ChartSpec::horizontal_bar("count", "label").text_format(".1f"),
                demographic_shares(&demographics, category),
            )
            .title(format!("Audience by {}", category));
            view.push(components::chart_card(
                &demographic_chart_id(category),
                ctx.chart(&request),
                "",
            ));
        }

        view.push(footer(
            ctx.profile(),
            "Contact enrichment and the demographics worksheet",
            "ICP means a broad, global or specific match. Demographics come from LinkedIn audience analytics.",
        ));

        Ok(view.into())
    }
}
