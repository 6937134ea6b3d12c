//! Plain-text adapter
//!
//! Renders a [`View`] as a terminal-friendly outline.

use super::node::{Element, Node, View};

fn is_leaf(element: &Element) -> bool {
    element
        .child_nodes()
        .iter()
        .all(|child| matches!(child, Node::Text(_)))
}

fn collect_rows<'a>(element: &'a Element, rows: &mut Vec<&'a Element>) {
    for child in element.child_nodes() {
        if let Node::Element(child) = child {
            if child.tag() == "tr" {
                rows.push(child);
            } else {
                collect_rows(child, rows);
            }
        }
    }
}

fn table_lines(table: &Element, lines: &mut Vec<String>) {
    let mut rows = Vec::new();
    collect_rows(table, &mut rows);
    for row in rows {
        let cells: Vec<String> = row
            .child_nodes()
            .iter()
            .map(Node::text_content)
            .collect();
        lines.push(cells.join(" | "));
    }
}

fn kpi_line(card: &Element) -> String {
    let parts: Vec<String> = card
        .child_nodes()
        .iter()
        .map(Node::text_content)
        .collect();
    match parts.split_first() {
        Some((label, rest)) => format!("{}: {}", label, rest.join("  ")),
        None => String::new(),
    }
}

fn walk(node: &Node, lines: &mut Vec<String>) {
    match node {
        Node::Text(text) => {
            let text = text.trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        }
        Node::Chart { id, figure } => {
            let title = figure
                .layout
                .get("title")
                .and_then(|title| title.get("text"))
                .and_then(|text| text.as_str())
                .filter(|text| !text.is_empty())
                .unwrap_or(id.as_str());
            lines.push(format!("[{} chart] {}", figure.kind, title));
        }
        Node::Element(element) => match element.tag() {
            "h1" => lines.push(format!("# {}", element.text_content())),
            "h2" => lines.push(format!("## {}", element.text_content())),
            "hr" => lines.push("---".to_string()),
            "p" | "summary" => lines.push(element.text_content()),
            "table" => table_lines(element, lines),
            "a" => lines.push(format!(
                "- {} ({})",
                element.text_content(),
                element.attribute("href").unwrap_or_default()
            )),
            _ if element.has_class("kpi-card") => lines.push(kpi_line(element)),
            _ if is_leaf(element) => {
                let text = element.text_content();
                if !text.is_empty() {
                    lines.push(text);
                }
            }
            _ => {
                for child in element.child_nodes() {
                    walk(child, lines);
                }
            }
        },
    }
}

/// Render a view as one line per block
pub fn render_text(view: &View) -> String {
    let mut lines = Vec::new();
    for node in view.nodes() {
        walk(node, &mut lines);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::row;
    use crate::view::components::{kpi_row, page_header, table, Column, Kpi, TableOptions};
    use serde_json::json;

    #[test]
    fn test_outline() {
        let mut view = View::new();
        view.extend(page_header("Audience Growth", "Followers over time."));
        view.push(kpi_row(&[
            Kpi::new("Followers", "300").delta("+20"),
            Kpi::new("Posts", "10"),
        ]));
        view.push(table(
            &[row([("name", json!("Ada")), ("n", json!(1200))])],
            &[Column::new("name", "Name"), Column::new("n", "Count")],
            &TableOptions::default(),
        ));

        let text = render_text(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "# Audience Growth",
                "Followers over time.",
                "---",
                "Followers: 300  +20",
                "Posts: 10",
                "Name | Count",
                "Ada | 1,200",
            ]
        );
    }
}
