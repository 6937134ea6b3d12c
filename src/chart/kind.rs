//! Chart kinds
//!
//! The closed vocabulary of visualizations the dispatcher can draw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported chart kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    HorizontalBar,
    Line,
    Area,
    Donut,
    Combo,
    Waterfall,
    Funnel,
    Scatter,
}

impl ChartKind {
    /// Every kind, in declaration order
    pub const ALL: [ChartKind; 8] = [
        ChartKind::HorizontalBar,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Donut,
        ChartKind::Combo,
        ChartKind::Waterfall,
        ChartKind::Funnel,
        ChartKind::Scatter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::HorizontalBar => "horizontal-bar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Donut => "donut",
            ChartKind::Combo => "combo",
            ChartKind::Waterfall => "waterfall",
            ChartKind::Funnel => "funnel",
            ChartKind::Scatter => "scatter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ChartError::UnknownKind(s.to_string()))
    }
}

/// Chart errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Unknown chart kind: {0}")]
    UnknownKind(String),

    #[error("Chart rows must serialize to JSON objects: {0}")]
    InvalidRows(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_names() {
        for kind in ChartKind::ALL {
            assert_eq!(kind.as_str().parse::<ChartKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "pie".parse::<ChartKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown chart kind: pie");
    }

    #[test]
    fn test_serde_name_matches_display() {
        let json = serde_json::to_string(&ChartKind::HorizontalBar).unwrap();
        assert_eq!(json, "\"horizontal-bar\"");
    }
}
