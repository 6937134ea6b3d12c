//! Dashboard components
//!
//! Reusable building blocks shared by every page. Each function returns
//! nodes; nothing here touches a surface.

use serde_json::Value;

use super::format::{format_fixed, format_integer, format_number};
use super::node::{Element, Node};
use crate::chart::Figure;
use crate::data::records::Row;

/// Placeholder for missing table cells
pub const MISSING: &str = "—";

/// Strings longer than this are truncated in tables
pub const MAX_CELL_CHARS: usize = 60;

const TRUNCATED_CHARS: usize = 57;

/// One headline metric
#[derive(Debug, Clone, PartialEq)]
pub struct Kpi {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

impl Kpi {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: None,
        }
    }

    pub fn delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }
}

/// Before/after metric pair
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub label: String,
    pub before: f64,
    pub after: f64,
}

impl Comparison {
    pub fn new(label: impl Into<String>, before: f64, after: f64) -> Self {
        Self {
            label: label.into(),
            before,
            after,
        }
    }
}

/// Table column
#[derive(Debug, Clone)]
pub struct Column {
    pub key: String,
    pub label: Option<String>,
    /// Number formatter, defaults to [`format_number`]
    pub format: Option<fn(f64) -> String>,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: Some(label.into()),
            format: None,
        }
    }

    pub fn format(mut self, format: fn(f64) -> String) -> Self {
        self.format = Some(format);
        self
    }

    fn heading(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

/// Table rendering options
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Columns whose values are URLs, shown as "View" links
    pub link_columns: Vec<String>,
    pub max_rows: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            link_columns: Vec::new(),
            max_rows: 50,
        }
    }
}

impl TableOptions {
    pub fn links<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            link_columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Title, optional caption and divider
pub fn page_header(title: &str, caption: &str) -> Vec<Node> {
    let mut nodes: Vec<Node> = vec![Element::new("h1").class("page-title").text(title).into()];
    if !caption.is_empty() {
        nodes.push(Element::new("p").class("page-caption").text(caption).into());
    }
    nodes.push(divider().into());
    nodes
}

pub fn divider() -> Element {
    Element::new("hr").class("divider")
}

pub fn section_title(title: &str) -> Element {
    Element::new("h2").class("section-title").text(title)
}

fn kpi_card(label: &str) -> Element {
    Element::new("div")
        .class("kpi-card")
        .child(Element::new("div").class("kpi-label").text(label))
}

fn delta_element(delta: &str, positive: bool) -> Element {
    Element::new("div")
        .class("kpi-delta")
        .class(if positive { "positive" } else { "negative" })
        .text(delta)
}

/// Row of metric cards; a delta starting with `-` is shown as negative
pub fn kpi_row(metrics: &[Kpi]) -> Element {
    let cards = metrics.iter().map(|metric| {
        let mut card = kpi_card(&metric.label)
            .child(Element::new("div").class("kpi-value").text(metric.value.as_str()));
        if let Some(delta) = metric.delta.as_deref().filter(|d| !d.is_empty()) {
            card = card.child(delta_element(delta, !delta.starts_with('-')));
        }
        card
    });
    Element::new("div").class("kpi-row").children(cards)
}

/// Before/after cards with absolute and percentage change
pub fn comparison_cards(cards: &[Comparison]) -> Element {
    let cards = cards.iter().map(|card| {
        let delta = card.after - card.before;
        let pct = if card.before != 0.0 {
            format_fixed(delta / card.before * 100.0, 0)
        } else {
            "0".to_string()
        };
        let positive = delta >= 0.0;
        let sign = if positive { "+" } else { "" };

        kpi_card(&card.label)
            .child(Element::new("div").class("kpi-value").text(format_integer(card.after)))
            .child(delta_element(
                &format!("{}{} ({}{}%)", sign, format_integer(delta), sign, pct),
                positive,
            ))
            .child(
                Element::new("div")
                    .class("kpi-help")
                    .text(format!("Before: {}", format_integer(card.before))),
            )
    });
    Element::new("div").class("kpi-row").children(cards)
}

/// Card holding a chart mount point and an optional caption
pub fn chart_card(id: &str, figure: Figure, caption: &str) -> Element {
    let mut card = Element::new("div")
        .class("chart-card")
        .child(Node::chart(id, figure));
    if !caption.is_empty() {
        card = card.child(caption_text(caption));
    }
    card
}

pub fn caption_text(text: &str) -> Element {
    Element::new("p").class("chart-caption").text(text)
}

/// Secondary note text
pub fn note(text: &str) -> Element {
    Element::new("p").class("text-secondary").text(text)
}

/// `cols`-column grid
pub fn grid<I, N>(cols: usize, children: I) -> Element
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    Element::new("div")
        .class("grid")
        .class(format!("grid-{}", cols))
        .children(children)
}

/// Untitled block used as a grid cell
pub fn panel<I, N>(children: I) -> Element
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    Element::new("div").children(children)
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s == "NaT" || s == "nan",
        _ => false,
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_CELL_CHARS {
        let head: String = text.chars().take(TRUNCATED_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn cell(row: &Row, column: &Column, options: &TableOptions) -> Element {
    let td = Element::new("td");
    let value = row.get(&column.key);

    if is_missing(value) {
        return td.text(MISSING);
    }

    match value {
        Some(Value::String(url)) if options.link_columns.contains(&column.key) => td.child(
            Element::new("a")
                .attr("href", url.as_str())
                .attr("target", "_blank")
                .attr("rel", "noopener")
                .text("View"),
        ),
        Some(Value::Number(n)) => {
            let n = n.as_f64().unwrap_or_default();
            td.text(column.format.map(|f| f(n)).unwrap_or_else(|| format_number(n)))
        }
        Some(Value::String(s)) => td.text(truncate(s)),
        Some(other) => td.text(other.to_string()),
        None => td.text(MISSING),
    }
}

/// Data table, or a "No data available." note when `rows` is empty
pub fn table(rows: &[Row], columns: &[Column], options: &TableOptions) -> Element {
    if rows.is_empty() {
        return note("No data available.");
    }

    let headers = columns
        .iter()
        .map(|column| Element::new("th").text(column.heading()));
    let body = rows.iter().take(options.max_rows).map(|row| {
        Element::new("tr").children(columns.iter().map(|column| cell(row, column, options)))
    });

    Element::new("div").class("table-wrapper").child(
        Element::new("table")
            .class("data-table")
            .child(Element::new("thead").child(Element::new("tr").children(headers)))
            .child(Element::new("tbody").children(body)),
    )
}

/// Provenance details
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceInfo {
    pub source: String,
    pub updated: String,
    pub notes: String,
}

/// Collapsible "About this data" footer
pub fn source_footer(info: &SourceInfo) -> Element {
    let parts: Vec<(&str, &str)> = [
        ("Source:", info.source.as_str()),
        ("Last updated:", info.updated.as_str()),
        ("Notes:", info.notes.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .collect();

    let mut paragraph = Element::new("p");
    if parts.is_empty() {
        paragraph = paragraph.text("No metadata provided.");
    }
    for (i, (label, value)) in parts.iter().enumerate() {
        if i > 0 {
            paragraph = paragraph.text(" · ");
        }
        paragraph = paragraph
            .child(Element::new("strong").text(*label))
            .text(format!(" {}", value));
    }

    Element::new("details")
        .class("source-footer")
        .child(Element::new("summary").text("About this data"))
        .child(paragraph)
}

/// Link card to another page
pub fn nav_card(route: &str, label: &str) -> Element {
    Element::new("a")
        .class("nav-card")
        .attr("href", format!("#{}", route))
        .text(label)
}

pub fn loading() -> Element {
    Element::new("div").class("loading").text("Loading...")
}

pub fn error_message(message: &str) -> Element {
    Element::new("div")
        .class("error-message")
        .text(format!("Error loading page: {}", message))
}

pub fn not_found() -> Element {
    Element::new("div").class("error-message").text("Page not found.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::row;
    use crate::view::node::View;
    use serde_json::json;

    #[test]
    fn test_kpi_delta_sign() {
        let el = kpi_row(&[
            Kpi::new("Followers", "300").delta("+20"),
            Kpi::new("Reach", "10").delta("-3"),
            Kpi::new("Posts", "4"),
        ]);

        let cards = el.child_nodes();
        assert_eq!(cards.len(), 3);

        let delta = |i: usize| {
            cards[i]
                .as_element()
                .unwrap()
                .child_nodes()
                .get(2)
                .and_then(Node::as_element)
                .cloned()
        };
        assert!(delta(0).unwrap().has_class("positive"));
        assert!(delta(1).unwrap().has_class("negative"));
        assert!(delta(2).is_none());
    }

    #[test]
    fn test_comparison_card_text() {
        let el = comparison_cards(&[Comparison::new("Avg Impressions / Post", 1000.0, 1500.0)]);
        let text = el.text_content();

        assert!(text.contains("1,500"));
        assert!(text.contains("+500 (+50%)"));
        assert!(text.contains("Before: 1,000"));
    }

    #[test]
    fn test_comparison_zero_before() {
        let el = comparison_cards(&[Comparison::new("Posts", 0.0, 4.0)]);
        assert!(el.text_content().contains("+4 (+0%)"));
    }

    #[test]
    fn test_table_cells() {
        let long = "x".repeat(70);
        let rows = vec![row([
            ("name", json!(null)),
            ("date", json!("NaT")),
            ("url", json!("https://example.com/p/1")),
            ("impressions", json!(12345)),
            ("text", json!(long)),
        ])];
        let columns = [
            Column::new("name", "Name"),
            Column::new("date", "Date"),
            Column::new("url", "Link"),
            Column::new("impressions", "Impressions"),
            Column::new("text", "Text"),
        ];

        let el = table(&rows, &columns, &TableOptions::links(["url"]));
        let text = el.text_content();

        assert!(text.contains("——"));
        assert!(text.contains("View"));
        assert!(text.contains("12,345"));
        assert!(text.contains(&format!("{}...", "x".repeat(57))));
        assert!(!text.contains(&"x".repeat(58)));
    }

    #[test]
    fn test_table_max_rows_and_empty() {
        let rows: Vec<Row> = (0..80).map(|i| row([("n", json!(i))])).collect();
        let el = table(&rows, &[Column::new("n", "N")], &TableOptions::default());

        let wrapper = View::from(el);
        let body_rows = wrapper.find_by_class("data-table")[0].child_nodes()[1]
            .as_element()
            .unwrap()
            .child_nodes()
            .len();
        assert_eq!(body_rows, 50);

        let empty = table(&[], &[Column::new("n", "N")], &TableOptions::default());
        assert_eq!(empty.text_content(), "No data available.");
    }

    #[test]
    fn test_source_footer() {
        let el = source_footer(&SourceInfo {
            source: "Exports".into(),
            updated: "2026-02-09".into(),
            notes: String::new(),
        });
        assert_eq!(
            el.text_content(),
            "About this dataSource: Exports · Last updated: 2026-02-09"
        );

        let empty = source_footer(&SourceInfo::default());
        assert!(empty.text_content().ends_with("No metadata provided."));
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(error_message("boom").text_content(), "Error loading page: boom");
        assert_eq!(not_found().text_content(), "Page not found.");
        assert_eq!(loading().text_content(), "Loading...");
    }
}
