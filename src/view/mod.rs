//! Views
//!
//! Rendered page content as a tree, plus the components pages build it from
//! and adapters that apply it to a surface:
//!
//! - **node**: `View`, `Node`, `Element`
//! - **components**: KPI rows, tables, chart cards, status messages
//! - **format**: number display rules
//! - **html** / **text**: output adapters

pub mod components;
pub mod format;
pub mod html;
pub mod node;
pub mod text;

pub use components::{Column, Comparison, Kpi, SourceInfo, TableOptions};
pub use format::{format_fixed, format_integer, format_number, format_value, plain_number};
pub use html::{render_document, render_html};
pub use node::{Element, Node, View};
pub use text::render_text;
