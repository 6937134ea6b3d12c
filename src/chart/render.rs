//! Per-kind trace builders
//!
//! Each builder turns rows plus a field mapping into traces and the layout
//! keys that kind adds on top of the base template. Missing fields become
//! `null` points; empty input yields empty traces.

use std::cmp::Ordering;

use serde_json::{json, Map, Value};

use super::spec::{
    AreaSpec, BarSpec, ComboSpec, DonutSpec, FunnelSpec, LineSpec, Measure, ScatterSpec,
    WaterfallSpec,
};
use super::theme::{extend_object, palette_color, Theme};
use crate::data::records::Row;

/// Smallest scatter marker size
pub const MIN_MARKER_SIZE: f64 = 6.0;

/// Marker size used when no size field is mapped
pub const DEFAULT_MARKER_SIZE: f64 = 8.0;

/// Traces plus kind-specific layout keys
pub(crate) type Drawn = (Vec<Value>, Map<String, Value>);

fn field(row: &Row, name: &str) -> Value {
    row.get(name).cloned().unwrap_or(Value::Null)
}

fn column(rows: &[&Row], name: &str) -> Vec<Value> {
    rows.iter().map(|row| field(row, name)).collect()
}

fn all(rows: &[Row]) -> Vec<&Row> {
    rows.iter().collect()
}

fn numeric(row: &Row, name: &str) -> Option<f64> {
    row.get(name).and_then(Value::as_f64)
}

fn plain_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn titled(base: &Map<String, Value>, title: &str) -> Map<String, Value> {
    let mut layout = Map::new();
    layout.insert(
        "title".to_string(),
        extend_object(base, "title", json!({ "text": title })),
    );
    layout
}

/// Marker size for a scatter point: square-root scale clamped to the minimum
pub fn marker_size(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v > 0.0 => (v.sqrt() / 2.0).max(MIN_MARKER_SIZE),
        _ => MIN_MARKER_SIZE,
    }
}

/// Measures for `count` waterfall points.
///
/// Explicit measures are padded with `relative` or truncated to fit.
pub fn waterfall_measures(explicit: Option<&[Measure]>, count: usize) -> Vec<Measure> {
    match explicit {
        Some(measures) => {
            let mut measures = measures.to_vec();
            measures.resize(count, Measure::Relative);
            measures
        }
        None => (0..count)
            .map(|i| if i == 0 { Measure::Absolute } else { Measure::Relative })
            .collect(),
    }
}

fn ascending_missing_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.total_cmp(&b),
    }
}

pub(crate) fn horizontal_bar(
    theme: &Theme,
    base: &Map<String, Value>,
    spec: &BarSpec,
    rows: &[Row],
    title: &str,
) -> Drawn {
    let mut sorted = all(rows);
    sorted.sort_by(|a, b| ascending_missing_first(numeric(a, &spec.value), numeric(b, &spec.value)));

    let trace = json!({
        "type": "bar",
        "orientation": "h",
        "x": column(&sorted, &spec.value),
        "y": column(&sorted, &spec.label),
        "marker": { "color": theme.accent },
        "texttemplate": format!("%{{x:{}}}", spec.text_format),
        "textposition": "outside",
    });

    let mut layout = titled(base, title);
    layout.insert(
        "yaxis".to_string(),
        extend_object(base, "yaxis", json!({ "automargin": true })),
    );
    (vec![trace], layout)
}

pub(crate) fn line(
    theme: &Theme,
    base: &Map<String, Value>,
    spec: &LineSpec,
    rows: &[Row],
    title: &str,
) -> Drawn {
    let rows = all(rows);
    let palette = spec.colors.as_deref().unwrap_or(&theme.categorical);
    let x = column(&rows, &spec.x);

    let traces = spec
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let color = palette_color(palette, i).unwrap_or(theme.accent.as_str());
            json!({
                "type": "scatter",
                "mode": "lines",
                "x": x,
                "y": column(&rows, series),
                "name": series,
                "line": { "color": color, "width": 2 },
            })
        })
        .collect();

    (traces, titled(base, title))
}

pub(crate) fn area(
    theme: &Theme,
    base: &Map<String, Value>,
    spec: &AreaSpec,
    rows: &[Row],
    title: &str,
) -> Drawn {
    let mut groups: Vec<Value> = Vec::new();
    for row in rows {
        let group = field(row, &spec.group);
        if !groups.contains(&group) {
            groups.push(group);
        }
    }

    let groupnorm = if spec.normalize { "percent" } else { "" };
    let traces = groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let members: Vec<&Row> = rows
                .iter()
                .filter(|row| &field(row, &spec.group) == group)
                .collect();
            json!({
                "type": "scatter",
                "mode": "lines",
                "fill": "tonexty",
                "stackgroup": "one",
                "groupnorm": groupnorm,
                "x": column(&members, &spec.x),
                "y": column(&members, &spec.y),
                "name": group,
                "line": { "color": theme.categorical_color(i) },
            })
        })
        .collect();

    (traces, titled(base, title))
}

pub(crate) fn donut(
    theme: &Theme,
    base: &Map<String, Value>,
    spec: &DonutSpec,
    rows: &[Row],
    title: &str,
) -> Drawn {
    let rows = all(rows);
    let trace = json!({
        "type": "pie",
        "hole": 0.55,
        "values": column(&rows, &spec.values),
        "labels": column(&rows, &spec.names),
        "marker": { "colors": theme.categorical },
        "textposition": "inside",
        "textinfo": "percent+label",
    });

    let mut layout = titled(base, title);
    layout.insert("showlegend".to_string(), json!(false));
    (vec![trace], layout)
}

pub(crate) fn combo(
    theme: &Theme,
    base: &Map<String, Value>,
    spec: &ComboSpec,
    rows: &[Row],
    title: &str,
) -> Drawn {
    let rows = all(rows);
    let x = column(&rows, &spec.x);
    let bar_names = spec.bar_names.as_deref().unwrap_or(&spec.bars);
    let line_names = spec.line_names.as_deref().unwrap_or(&spec.lines);

    let mut traces = Vec::with_capacity(spec.bars.len() + spec.lines.len());
    for (i, series) in spec.bars.iter().enumerate() {
        traces.push(json!({
            "type": "bar",
            "x": x,
            "y": column(&rows, series),
            "name": bar_names.get(i).unwrap_or(series),
            "marker": { "color": theme.categorical_color(i) },
            "yaxis": "y",
        }));
    }
    for (i, series) in spec.lines.iter().enumerate() {
        traces.push(json!({
            "type": "scatter",
            "mode": "lines",
            "x": x,
            "y": column(&rows, series),
            "name": line_names.get(i).unwrap_or(series),
            "line": { "color": theme.categorical_color(i + spec.bars.len()), "width": 2 },
            "yaxis": "y2",
        }));
    }

    let mut layout = titled(base, title);
    layout.insert("barmode".to_string(), json!("group"));
    layout.insert(
        "yaxis2".to_string(),
        json!({
            "overlaying": "y",
            "side": "right",
            "gridcolor": "rgba(0,0,0,0)",
            "tickfont": { "size": 12 },
        }),
    );
    (traces, layout)
}

pub(crate) fn waterfall(
    theme: &Theme,
    base: &Map<String, Value>,
    spec: &WaterfallSpec,
    rows: &[Row],
    title: &str,
) -> Drawn {
    let rows = all(rows);
    let measures = waterfall_measures(spec.measures.as_deref(), rows.len());

    let trace = json!({
        "type": "waterfall",
        "x": column(&rows, &spec.category),
        "y": column(&rows, &spec.value),
        "measure": measures,
        "increasing": { "marker": { "color": theme.positive } },
        "decreasing": { "marker": { "color": theme.negative } },
        "totals": { "marker": { "color": theme.total_color() } },
        "textposition": "outside",
        "texttemplate": "%{y:+.0f}",
    });

    let mut layout = titled(base, title);
    layout.insert("showlegend".to_string(), json!(false));
    (vec![trace], layout)
}

pub(crate) fn funnel(
    theme: &Theme,
    base: &Map<String, Value>,
    spec: &FunnelSpec,
    rows: &[Row],
    title: &str,
) -> Drawn {
    let rows = all(rows);
    let shades = rows.len().min(theme.sequential.len());

    let trace = json!({
        "type": "funnel",
        "y": column(&rows, &spec.stage),
        "x": column(&rows, &spec.value),
        "textinfo": "value+percent initial",
        "marker": { "color": &theme.sequential[..shades] },
    });

    (vec![trace], titled(base, title))
}

pub(crate) fn scatter(
    theme: &Theme,
    base: &Map<String, Value>,
    spec: &ScatterSpec,
    rows: &[Row],
    title: &str,
) -> Drawn {
    let rows = all(rows);
    let size = match &spec.size {
        Some(size_field) => Value::from(
            rows.iter()
                .map(|row| marker_size(numeric(row, size_field)))
                .collect::<Vec<f64>>(),
        ),
        None => json!(DEFAULT_MARKER_SIZE),
    };
    let text: Vec<String> = rows
        .iter()
        .map(|row| {
            format!(
                "{}, {}",
                plain_text(row.get(&spec.x)),
                plain_text(row.get(&spec.y))
            )
        })
        .collect();

    let trace = json!({
        "type": "scatter",
        "mode": "markers",
        "x": column(&rows, &spec.x),
        "y": column(&rows, &spec.y),
        "marker": { "color": theme.accent, "opacity": 0.7, "size": size },
        "text": text,
    });

    let mut layout = titled(base, title);
    layout.insert("hovermode".to_string(), json!("closest"));
    (vec![trace], layout)
}
