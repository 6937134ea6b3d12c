//! Figure
//!
//! Engine-ready output of a dispatch: Plotly-shaped traces, layout and
//! config.

use serde::Serialize;
use serde_json::{Map, Value};

use super::kind::ChartKind;

/// A fully resolved chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub data: Vec<Value>,
    pub layout: Map<String, Value>,
    pub config: Value,
}

impl Figure {
    pub fn traces(&self) -> &[Value] {
        &self.data
    }

    /// Layout value for a top-level key
    pub fn layout_value(&self, key: &str) -> Option<&Value> {
        self.layout.get(key)
    }

    /// Serialize as the `{data, layout, config}` object the plotting engine takes
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "data": self.data,
            "layout": self.layout,
            "config": self.config,
        })
    }
}
