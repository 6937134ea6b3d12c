//! Chart Dispatch
//!
//! A single entry point that turns a chart request into a Plotly-ready
//! [`Figure`]:
//!
//! - **kind**: the closed set of chart kinds
//! - **spec**: per-kind field mappings and the request type
//! - **theme**: colours and the base layout template
//! - **render**: per-kind trace builders
//! - **dispatch**: kind routing and layout merging
//!
//! # Example
//!
//! ```rust
//! use pulseboard::chart::{ChartDispatcher, ChartRequest, ChartSpec};
//! use pulseboard::data::records::row;
//! use serde_json::json;
//!
//! let rows = vec![
//!     row([("format", json!("Video")), ("posts", json!(3))]),
//!     row([("format", json!("Text")), ("posts", json!(7))]),
//! ];
//! let request = ChartRequest::new(ChartSpec::horizontal_bar("posts", "format"), rows)
//!     .title("Posts by format");
//! let figure = ChartDispatcher::new().render(&request);
//! assert_eq!(figure.traces()[0]["y"], json!(["Video", "Text"]));
//! ```

pub mod dispatch;
pub mod figure;
pub mod kind;
pub mod render;
pub mod spec;
pub mod theme;

pub use dispatch::ChartDispatcher;
pub use figure::Figure;
pub use kind::{ChartError, ChartKind};
pub use render::{marker_size, waterfall_measures, MIN_MARKER_SIZE};
pub use spec::{
    AreaSpec, BarSpec, ChartRequest, ChartSpec, ComboSpec, DonutSpec, FunnelSpec, LineSpec,
    Measure, ScatterSpec, WaterfallSpec,
};
pub use theme::Theme;
