//! HTML adapter
//!
//! Applies a [`View`] to markup. Chart mount points carry their figure as a
//! `data-figure` attribute; the standalone document draws them with Plotly.

use super::node::{Element, Node, View};
use crate::router::NavLink;

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const VOID_TAGS: [&str; 5] = ["br", "hr", "img", "input", "meta"];

/// Escape text for element content and quoted attribute values
pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(element.tag());
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
    out.push('>');

    if VOID_TAGS.contains(&element.tag()) {
        return;
    }

    for child in element.child_nodes() {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(element.tag());
    out.push('>');
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape(text)),
        Node::Element(element) => write_element(element, out),
        Node::Chart { id, figure } => {
            out.push_str("<div id=\"");
            out.push_str(&escape(id));
            out.push_str("\" class=\"chart-container\" data-figure=\"");
            out.push_str(&escape(&figure.to_json().to_string()));
            out.push_str("\"></div>");
        }
    }
}

/// Render a view fragment
pub fn render_html(view: &View) -> String {
    let mut out = String::new();
    for node in view.nodes() {
        write_node(node, &mut out);
    }
    out
}

fn render_nav(nav: &[NavLink]) -> String {
    let links: String = nav
        .iter()
        .map(|link| {
            let class = if link.active { "nav-link active" } else { "nav-link" };
            format!(
                "<a class=\"{}\" href=\"#{}\" data-page=\"{}\">{}</a>",
                class,
                escape(&link.key),
                escape(&link.key),
                escape(&link.label)
            )
        })
        .collect();
    format!("<nav class=\"sidebar\">{}</nav>", links)
}

/// Standalone page: navigation, content and the chart bootstrap script
pub fn render_document(title: &str, nav: &[NavLink], content: &View) -> String {
    fill_template(
        DOCUMENT_HTML,
        &[
            ("TITLE", escape(title)),
            ("PLOTLY", PLOTLY_SRC.to_string()),
            ("NAV", render_nav(nav)),
            ("CONTENT", render_html(content)),
        ],
    )
}

/// Replace `{{NAME}}` slots in one pass; inserted values are never rescanned
fn fill_template(template: &str, slots: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            slots
                .iter()
                .find(|(name, _)| *name == &after[..end])
                .map(|(_, value)| (value, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

const DOCUMENT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <script src="{{PLOTLY}}"></script>
  <style>
    :root {
      --color-main: #0e0e0f;
      --color-accent: #93f3db;
      --color-light: #F5F5F5;
      --color-white: #FFFFFF;
      --color-negative: #e07a5f;
    }
    body { margin: 0; display: flex; font-family: Inter, -apple-system, BlinkMacSystemFont, sans-serif; color: var(--color-main); background: var(--color-light); }
    .sidebar { width: 240px; padding: 1.5rem 1rem; display: flex; flex-direction: column; gap: 0.25rem; background: var(--color-main); }
    .nav-link { color: #c8c8c8; text-decoration: none; padding: 0.5rem 0.75rem; border-radius: 6px; }
    .nav-link.active { color: var(--color-main); background: var(--color-accent); }
    main { flex: 1; padding: 2rem 2.5rem; overflow-y: auto; }
    .kpi-row { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 1rem; margin: 1rem 0; }
    .kpi-card, .chart-card { background: var(--color-white); border-radius: 10px; padding: 1rem 1.25rem; box-shadow: 0 1px 4px rgba(0,0,0,0.04); }
    .kpi-label { font-size: 13px; color: #5b5b5b; }
    .kpi-value { font-size: 26px; font-weight: 600; }
    .kpi-delta.positive { color: #2a9d8f; }
    .kpi-delta.negative { color: var(--color-negative); }
    .grid { display: grid; gap: 1rem; }
    .grid-2 { grid-template-columns: 1fr 1fr; }
    .grid-3 { grid-template-columns: repeat(3, 1fr); }
    .chart-container { min-height: 360px; }
    .data-table { width: 100%; border-collapse: collapse; font-size: 13px; }
    .data-table th, .data-table td { padding: 0.4rem 0.6rem; border-bottom: 1px solid #E8E8E8; text-align: left; }
    .error-message { color: var(--color-negative); padding: 1rem; }
    .nav-card { display: block; padding: 1rem 1.25rem; background: var(--color-white); border-radius: 10px; text-decoration: none; color: var(--color-main); }
  </style>
</head>
<body>
  {{NAV}}
  <main id="main-content">{{CONTENT}}</main>
  <script>
    document.querySelectorAll('.chart-container[data-figure]').forEach(function (el) {
      var fig = JSON.parse(el.dataset.figure);
      Plotly.newPlot(el, fig.data, fig.layout, fig.config);
    });
  </script>
</body>
</html>
"#;
