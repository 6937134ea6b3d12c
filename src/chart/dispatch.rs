//! Chart Dispatcher
//!
//! Routes a [`ChartRequest`] to the builder for its kind and applies the
//! shared styling contract: base template, then kind keys, then caller
//! overrides (shallow).

use super::figure::Figure;
use super::render;
use super::spec::{ChartRequest, ChartSpec};
use super::theme::{merge_layout, Theme};

/// Draws chart requests with one theme
#[derive(Debug, Clone, Default)]
pub struct ChartDispatcher {
    theme: Theme,
}

impl ChartDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Resolve a request into a figure.
    ///
    /// Never fails: empty rows give empty traces, missing fields give nulls.
    pub fn render(&self, request: &ChartRequest) -> Figure {
        let theme = &self.theme;
        let base = theme.base_layout();
        let title = request.title.as_deref().unwrap_or_default();
        let rows = &request.rows;

        let (data, kind_layout) = match &request.spec {
            ChartSpec::HorizontalBar(spec) => render::horizontal_bar(theme, &base, spec, rows, title),
            ChartSpec::Line(spec) => render::line(theme, &base, spec, rows, title),
            ChartSpec::Area(spec) => render::area(theme, &base, spec, rows, title),
            ChartSpec::Donut(spec) => render::donut(theme, &base, spec, rows, title),
            ChartSpec::Combo(spec) => render::combo(theme, &base, spec, rows, title),
            ChartSpec::Waterfall(spec) => render::waterfall(theme, &base, spec, rows, title),
            ChartSpec::Funnel(spec) => render::funnel(theme, &base, spec, rows, title),
            ChartSpec::Scatter(spec) => render::scatter(theme, &base, spec, rows, title),
        };

        let layout = merge_layout(merge_layout(base, kind_layout), request.layout.clone());

        tracing::debug!(
            kind = %request.kind(),
            rows = rows.len(),
            traces = data.len(),
            "Chart dispatched"
        );

        Figure {
            kind: request.kind(),
            data,
            layout,
            config: theme.plot_config(),
        }
    }
}
