//! Content performance: weekly volume, before/after comparison, format
//! breakdown and top posts

use async_trait::async_trait;
use serde::Serialize;

use super::shared::{footer, mean};
use crate::chart::{ChartRequest, ChartSpec};
use crate::data::{names, to_rows, Kpis, Post, TopPost, WeeklyPosts};
use crate::router::{Page, PageContext, PageResult, Rendered};
use crate::view::components::{self, Column, Comparison, Kpi, TableOptions};
use crate::view::{format_integer, plain_number, View};

const TOP_POSTS_SHOWN: usize = 10;

pub struct ContentPerformancePage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatAverage {
    pub post_format: String,
    pub avg_impressions: f64,
}

/// Average impressions per post format, best first
pub fn format_breakdown(posts: &[Post]) -> Vec<FormatAverage> {
    let mut groups: Vec<(String, f64, f64)> = Vec::new();
    for post in posts {
        let format = post.post_format.as_deref().unwrap_or("Unknown");
        match groups.iter_mut().find(|(name, _, _)| name == format) {
            Some((_, count, impressions)) => {
                *count += 1.0;
                *impressions += post.impressions;
            }
            None => groups.push((format.to_string(), 1.0, post.impressions)),
        }
    }

    let mut averages: Vec<FormatAverage> = groups
        .into_iter()
        .map(|(post_format, count, impressions)| FormatAverage {
            post_format,
            avg_impressions: (impressions / count).round(),
        })
        .collect();
    averages.sort_by(|a, b| b.avg_impressions.total_cmp(&a.avg_impressions));
    averages
}

/// Before/after cards, `None` unless both periods have posts
pub fn before_after(top_posts: &[TopPost]) -> Option<Vec<Comparison>> {
    let period = |name: &str| -> Vec<f64> {
        top_posts
            .iter()
            .filter(|p| p.period == name)
            .map(|p| p.impressions)
            .collect()
    };
    let before = period("Before");
    let after = period("After");

    let (avg_before, avg_after) = (mean(&before)?, mean(&after)?);
    let max = |values: &[f64]| values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(vec![
        Comparison::new("Avg Impressions / Post", avg_before, avg_after),
        Comparison::new("Top Post Impressions", max(&before), max(&after)),
        Comparison::new("Posts Tracked", before.len() as f64, after.len() as f64),
        Comparison::new(
            "Total Impressions",
            before.iter().sum(),
            after.iter().sum(),
        ),
    ])
}

#[async_trait]
impl Page for ContentPerformancePage {
    async fn render(&self, ctx: PageContext) -> PageResult<Rendered> {
        let (kpis, posts, weekly, top_posts) = tokio::try_join!(
            ctx.dataset_as::<Kpis>(names::KPIS),
            ctx.dataset_as::<Vec<Post>>(names::POSTS),
            ctx.dataset_as::<Vec<WeeklyPosts>>(names::WEEKLY_POSTS),
            ctx.dataset_as::<Vec<TopPost>>(names::TOP_POSTS),
        )?;

        let profile = ctx.profile();
        let mut view = View::new();
        view.extend(components::page_header(
            "Content Performance",
            &format!(
                "How {} LinkedIn content performs week-over-week, and the impact since {} began.",
                profile.possessive(),
                profile.service
            ),
        ));

        view.push(components::kpi_row(&[
            Kpi::new("Total Posts", plain_number(kpis.total_posts)),
            Kpi::new("Avg Impressions / Post", format_integer(kpis.avg_impressions)),
            Kpi::new("Avg Engagements / Post", format_integer(kpis.avg_engagements_per_post)),
            Kpi::new(
                "Avg Engagement Rate",
                format!("{}%", plain_number(kpis.avg_engagement_rate)),
            ),
        ]));

        view.push(components::section_title("Weekly Performance"));
        if !weekly.is_empty() {
            let request = ChartRequest::new(
                ChartSpec::combo("week", ["total_impressions", "total_engagements"], ["avg_rate"])
                    .series_names(["Impressions", "Engagements"], ["Avg Rate (%)"]),
                to_rows(&weekly),
            )
            .title("Weekly Impressions, Engagements & Rate");
            view.push(components::chart_card(
                "chart-weekly-combo",
                ctx.chart(&request),
                "Bars show total weekly volume; line shows average engagement rate per post.",
            ));
        }

        view.push(components::section_title(&format!(
            "Before vs After {}",
            profile.service
        )));
        if let Some(cards) = before_after(&top_posts) {
            view.push(components::comparison_cards(&cards));
        }

        view.push(components::section_title("Performance by Post Format"));
        let formats = format_breakdown(&posts);
        if !formats.is_empty() {
            let request = ChartRequest::new(
                ChartSpec::horizontal_bar("avg_impressions", "post_format"),
                to_rows(&formats),
            )
            .title("Average Impressions by Post Format");
            view.push(components::chart_card(
                "chart-format",
                ctx.chart(&request),
                "Which content formats drive the most visibility.",
            ));
        }

        view.push(components::section_title("Top Posts"));
        let mut top: Vec<Post> = posts;
        top.sort_by(|a, b| b.impressions.total_cmp(&a.impressions));
        top.truncate(TOP_POSTS_SHOWN);
        view.push(components::table(
            &to_rows(&top),
            &[
                Column::new("posted_at", "Date"),
                Column::new("post_format", "Format"),
                Column::new("impressions", "Impressions"),
                Column::new("engagements", "Engagements"),
                Column::new("engagement_rate", "Rate (%)"),
                Column::new("post_url", "Link"),
            ],
            &TableOptions::links(["post_url"]),
        ));

        view.push(footer(
            profile,
            "Daily post export and top posts worksheet",
            "Before and after periods cover the top posts tracked on either side of the service start.",
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
    use serde_json::json;

    fn post(format: &str, impressions: f64) -> Post {
        Post {
            post_format: Some(format.to_string()),
            impressions,
            ..Post::default()
        }
    }

    #[test]
    fn test_format_breakdown() {
        let posts = vec![
            post("Text", 100.0),
            post("Video", 900.0),
            post("Text", 201.0),
            post("Image", 300.0),
        ];
        let breakdown = format_breakdown(&posts);

        assert_eq!(breakdown[0].post_format, "Video");
        assert_eq!(breakdown[1].post_format, "Image");
        assert_eq!(breakdown[2].avg_impressions, 151.0);
    }

    #[test]
    fn test_before_after_requires_both_periods() {
        let only_after = vec![TopPost {
            period: "After".into(),
            impressions: 10.0,
        }];
        assert!(before_after(&only_after).is_none());

        let both = vec![
            TopPost { period: "Before".into(), impressions: 100.0 },
            TopPost { period: "Before".into(), impressions: 300.0 },
            TopPost { period: "After".into(), impressions: 900.0 },
        ];
        let cards = before_after(&both).unwrap();
        assert_eq!(cards[0], Comparison::new("Avg Impressions / Post", 200.0, 900.0));
        assert_eq!(cards[1], Comparison::new("Top Post Impressions", 300.0, 900.0));
        assert_eq!(cards[2], Comparison::new("Posts Tracked", 2.0, 1.0));
        assert_eq!(cards[3], Comparison::new("Total Impressions", 400.0, 900.0));
    }

    #[tokio::test]
    async fn test_render() {
        let source = MemorySource::new()
            .with("kpis.json", json!({"total_posts": 2, "avg_impressions": 450.4, "avg_engagement_rate": 3.2}))
            .with(
                "posts.json",
                json!([
                    {"post_format": "Text", "impressions": 100, "engagements": 4, "post_url": "https://example.com/1"},
                    {"post_format": "Video", "impressions": 800, "engagements": 40, "post_url": null}
                ]),
            )
            .with(
                "weekly_posts.json",
                json!([{"week": "2026-01-19", "num_posts": 2, "total_impressions": 900, "total_engagements": 44, "avg_rate": 4.9}]),
            )
            .with("top_posts.json", json!([]));

        let rendered = ContentPerformancePage.render(context(source)).await.unwrap();
        let charts = rendered.view.charts();

        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].1.kind, ChartKind::Combo);
        assert_eq!(charts[1].1.kind, ChartKind::HorizontalBar);
        assert!(rendered.view.find_by_class("kpi-help").is_empty());

        let text = rendered.view.text_content();
        assert!(text.contains("450"));
        assert!(text.contains("View"));
    }
}
