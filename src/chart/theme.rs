//! Chart Theme
//!
//! Brand colours and the base layout every figure is drawn on.

use serde_json::{json, Map, Value};

pub const COLOR_MAIN: &str = "#0e0e0f";
pub const COLOR_ACCENT: &str = "#93f3db";
pub const COLOR_POSITIVE: &str = "#93f3db";
pub const COLOR_NEGATIVE: &str = "#e07a5f";
pub const COLOR_GRIDLINE: &str = "#E8E8E8";

pub const CATEGORICAL: [&str; 5] = ["#93f3db", "#5b5b5b", "#66d9c2", "#0e0e0f", "#a0a0a0"];
pub const SEQUENTIAL: [&str; 5] = ["#c8f9eb", "#93f3db", "#4ecab0", "#2a9d8f", "#1a6b5a"];

pub const FONT_FAMILY: &str = "Inter, -apple-system, BlinkMacSystemFont, sans-serif";

/// Visual tokens shared by all charts
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub main: String,
    pub accent: String,
    pub positive: String,
    pub negative: String,
    pub gridline: String,
    pub font_family: String,
    pub categorical: Vec<String>,
    pub sequential: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            main: COLOR_MAIN.to_string(),
            accent: COLOR_ACCENT.to_string(),
            positive: COLOR_POSITIVE.to_string(),
            negative: COLOR_NEGATIVE.to_string(),
            gridline: COLOR_GRIDLINE.to_string(),
            font_family: FONT_FAMILY.to_string(),
            categorical: CATEGORICAL.iter().map(|c| c.to_string()).collect(),
            sequential: SEQUENTIAL.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Theme {
    /// Colour for the series at `index`, wrapping around the categorical palette
    pub fn categorical_color(&self, index: usize) -> &str {
        palette_color(&self.categorical, index).unwrap_or(self.accent.as_str())
    }

    /// Colour used for waterfall totals
    pub fn total_color(&self) -> &str {
        self.categorical
            .get(3)
            .map(String::as_str)
            .unwrap_or(self.main.as_str())
    }

    /// Base layout template
    pub fn base_layout(&self) -> Map<String, Value> {
        let axis = json!({
            "gridcolor": self.gridline,
            "linecolor": self.gridline,
            "zeroline": false,
            "tickfont": { "size": 12 }
        });

        let layout = json!({
            "font": { "family": self.font_family, "color": self.main, "size": 13 },
            "paper_bgcolor": "rgba(0,0,0,0)",
            "plot_bgcolor": "rgba(0,0,0,0)",
            "colorway": self.categorical,
            "title": { "font": { "size": 16, "color": self.main }, "x": 0, "xanchor": "left" },
            "legend": {
                "orientation": "h",
                "yanchor": "bottom",
                "y": -0.2,
                "xanchor": "center",
                "x": 0.5,
                "font": { "size": 12 }
            },
            "xaxis": axis,
            "yaxis": axis,
            "hoverlabel": { "font": { "family": self.font_family, "size": 12 } },
            "hovermode": "x unified",
            "margin": { "l": 60, "r": 20, "t": 50, "b": 50 }
        });

        match layout {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Plotting engine configuration (toolbar hidden, responsive)
    pub fn plot_config(&self) -> Value {
        json!({ "displayModeBar": false, "responsive": true })
    }
}

/// Palette entry at `index % len`, `None` for an empty palette
pub fn palette_color(palette: &[String], index: usize) -> Option<&str> {
    if palette.is_empty() {
        None
    } else {
        Some(palette[index % palette.len()].as_str())
    }
}

/// Shallow merge: every override key replaces the base key wholesale.
///
/// Nested objects are not merged field-by-field.
pub fn merge_layout(mut base: Map<String, Value>, overrides: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overrides {
        base.insert(key, value);
    }
    base
}

/// Base sub-object extended with extra keys (`{ ...base[key], ...extra }`)
pub fn extend_object(base: &Map<String, Value>, key: &str, extra: Value) -> Value {
    let mut merged = base
        .get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if let Value::Object(extra) = extra {
        for (k, v) in extra {
            merged.insert(k, v);
        }
    }

    Value::Object(merged)
}
