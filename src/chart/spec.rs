//! Chart Requests
//!
//! A request names a chart kind together with the field mapping that kind
//! needs, the data rows, and optional display overrides.

use serde::Serialize;
use serde_json::{Map, Value};

use super::kind::{ChartError, ChartKind};
use crate::data::records::{to_rows, Row};

/// Default bar label number format (thousands separator, no decimals)
pub const DEFAULT_BAR_FORMAT: &str = ",.0f";

/// Horizontal bar mapping
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    /// Numeric field driving bar length
    pub value: String,
    /// Categorical field driving bar labels
    pub label: String,
    /// d3 number format for the bar text
    pub text_format: String,
}

/// Line mapping
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub x: String,
    pub series: Vec<String>,
    /// Overrides the categorical palette
    pub colors: Option<Vec<String>>,
}

/// Stacked area mapping
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSpec {
    pub x: String,
    pub y: String,
    /// Field whose distinct values become stacked series
    pub group: String,
    /// Stack to 100% at every x position
    pub normalize: bool,
}

/// Donut mapping
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSpec {
    pub values: String,
    pub names: String,
}

/// Bar + line on dual axes
#[derive(Debug, Clone, PartialEq)]
pub struct ComboSpec {
    pub x: String,
    pub bars: Vec<String>,
    pub lines: Vec<String>,
    pub bar_names: Option<Vec<String>>,
    pub line_names: Option<Vec<String>>,
}

/// How a waterfall point contributes to the running total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Absolute,
    Relative,
    Total,
}

/// Waterfall mapping
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallSpec {
    pub category: String,
    pub value: String,
    /// Explicit per-point measures; defaults to absolute-then-relative
    pub measures: Option<Vec<Measure>>,
}

/// Funnel mapping
#[derive(Debug, Clone, PartialEq)]
pub struct FunnelSpec {
    pub stage: String,
    pub value: String,
}

/// Scatter mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSpec {
    pub x: String,
    pub y: String,
    /// Optional field encoded as marker size
    pub size: Option<String>,
}

/// Field mapping for one chart, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    HorizontalBar(BarSpec),
    Line(LineSpec),
    Area(AreaSpec),
    Donut(DonutSpec),
    Combo(ComboSpec),
    Waterfall(WaterfallSpec),
    Funnel(FunnelSpec),
    Scatter(ScatterSpec),
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSpec::HorizontalBar(_) => ChartKind::HorizontalBar,
            ChartSpec::Line(_) => ChartKind::Line,
            ChartSpec::Area(_) => ChartKind::Area,
            ChartSpec::Donut(_) => ChartKind::Donut,
            ChartSpec::Combo(_) => ChartKind::Combo,
            ChartSpec::Waterfall(_) => ChartKind::Waterfall,
            ChartSpec::Funnel(_) => ChartKind::Funnel,
            ChartSpec::Scatter(_) => ChartKind::Scatter,
        }
    }

    pub fn horizontal_bar(value: impl Into<String>, label: impl Into<String>) -> Self {
        ChartSpec::HorizontalBar(BarSpec {
            value: value.into(),
            label: label.into(),
            text_format: DEFAULT_BAR_FORMAT.to_string(),
        })
    }

    pub fn line<S: Into<String>>(x: impl Into<String>, series: impl IntoIterator<Item = S>) -> Self {
        ChartSpec::Line(LineSpec {
            x: x.into(),
            series: series.into_iter().map(Into::into).collect(),
            colors: None,
        })
    }

    pub fn area(
        x: impl Into<String>,
        y: impl Into<String>,
        group: impl Into<String>,
        normalize: bool,
    ) -> Self {
        ChartSpec::Area(AreaSpec {
            x: x.into(),
            y: y.into(),
            group: group.into(),
            normalize,
        })
    }

    pub fn donut(values: impl Into<String>, names: impl Into<String>) -> Self {
        ChartSpec::Donut(DonutSpec {
            values: values.into(),
            names: names.into(),
        })
    }

    pub fn combo<B, L>(
        x: impl Into<String>,
        bars: impl IntoIterator<Item = B>,
        lines: impl IntoIterator<Item = L>,
    ) -> Self
    where
        B: Into<String>,
        L: Into<String>,
    {
        ChartSpec::Combo(ComboSpec {
            x: x.into(),
            bars: bars.into_iter().map(Into::into).collect(),
            lines: lines.into_iter().map(Into::into).collect(),
            bar_names: None,
            line_names: None,
        })
    }

    pub fn waterfall(category: impl Into<String>, value: impl Into<String>) -> Self {
        ChartSpec::Waterfall(WaterfallSpec {
            category: category.into(),
            value: value.into(),
            measures: None,
        })
    }

    pub fn funnel(stage: impl Into<String>, value: impl Into<String>) -> Self {
        ChartSpec::Funnel(FunnelSpec {
            stage: stage.into(),
            value: value.into(),
        })
    }

    pub fn scatter(x: impl Into<String>, y: impl Into<String>) -> Self {
        ChartSpec::Scatter(ScatterSpec {
            x: x.into(),
            y: y.into(),
            size: None,
        })
    }

    /// Builder method: bar text format (horizontal bars only)
    pub fn text_format(mut self, format: impl Into<String>) -> Self {
        if let ChartSpec::HorizontalBar(spec) = &mut self {
            spec.text_format = format.into();
        }
        self
    }

    /// Builder method: series palette (lines only)
    pub fn colors<S: Into<String>>(mut self, colors: impl IntoIterator<Item = S>) -> Self {
        if let ChartSpec::Line(spec) = &mut self {
            spec.colors = Some(colors.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Builder method: legend names for combo bars and lines
    pub fn series_names<B, L>(
        mut self,
        bar_names: impl IntoIterator<Item = B>,
        line_names: impl IntoIterator<Item = L>,
    ) -> Self
    where
        B: Into<String>,
        L: Into<String>,
    {
        if let ChartSpec::Combo(spec) = &mut self {
            spec.bar_names = Some(bar_names.into_iter().map(Into::into).collect());
            spec.line_names = Some(line_names.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Builder method: explicit waterfall measures
    pub fn measures(mut self, measures: Vec<Measure>) -> Self {
        if let ChartSpec::Waterfall(spec) = &mut self {
            spec.measures = Some(measures);
        }
        self
    }

    /// Builder method: marker size field (scatter only)
    pub fn size(mut self, field: impl Into<String>) -> Self {
        if let ChartSpec::Scatter(spec) = &mut self {
            spec.size = Some(field.into());
        }
        self
    }
}

/// One chart to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub spec: ChartSpec,
    pub rows: Vec<Row>,
    pub title: Option<String>,
    /// Caller layout keys, shallow-merged over the kind's layout
    pub layout: Map<String, Value>,
}

impl ChartRequest {
    pub fn new(spec: ChartSpec, rows: Vec<Row>) -> Self {
        Self {
            spec,
            rows,
            title: None,
            layout: Map::new(),
        }
    }

    /// Build a request from typed records
    pub fn from_records<T: Serialize>(spec: ChartSpec, records: &[T]) -> Result<Self, ChartError> {
        let rows = to_rows(records);
        if rows.len() != records.len() {
            return Err(ChartError::InvalidRows(format!(
                "{} of {} records are not objects",
                records.len() - rows.len(),
                records.len()
            )));
        }
        Ok(Self::new(spec, rows))
    }

    pub fn kind(&self) -> ChartKind {
        self.spec.kind()
    }

    /// Builder method: chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method: layout override
    pub fn layout(mut self, key: impl Into<String>, value: Value) -> Self {
        self.layout.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spec_kind() {
        assert_eq!(ChartSpec::horizontal_bar("v", "l").kind(), ChartKind::HorizontalBar);
        assert_eq!(ChartSpec::line("x", ["a", "b"]).kind(), ChartKind::Line);
        assert_eq!(ChartSpec::scatter("x", "y").size("s").kind(), ChartKind::Scatter);
    }

    #[test]
    fn test_builders_only_touch_matching_kind() {
        let spec = ChartSpec::line("x", ["y"]).text_format(".1f");
        assert_eq!(spec, ChartSpec::line("x", ["y"]));

        let spec = ChartSpec::horizontal_bar("count", "label").text_format(".1f");
        match spec {
            ChartSpec::HorizontalBar(bar) => assert_eq!(bar.text_format, ".1f"),
            other => panic!("unexpected spec {:?}", other),
        }
    }

    #[test]
    fn test_from_records() {
        #[derive(Serialize)]
        struct Point {
            x: u32,
        }

        let request =
            ChartRequest::from_records(ChartSpec::funnel("x", "x"), &[Point { x: 1 }, Point { x: 2 }])
                .unwrap()
                .title("Points")
                .layout("showlegend", json!(false));

        assert_eq!(request.rows.len(), 2);
        assert_eq!(request.kind(), ChartKind::Funnel);
        assert_eq!(request.title.as_deref(), Some("Points"));

        let err = ChartRequest::from_records(ChartSpec::funnel("x", "x"), &[1, 2]).unwrap_err();
        assert!(matches!(err, ChartError::InvalidRows(_)));
    }
}
