//! Data Access Layer
//!
//! Named JSON datasets, fetched once and shared by every page:
//!
//! - **source**: where dataset bytes come from (directory, HTTP, memory)
//! - **store**: memoizing cache with one in-flight fetch per name
//! - **records**: typed shapes of the exported datasets
//! - **error**: error types
//!
//! # Example
//!
//! ```rust,no_run
//! use pulseboard::data::{DatasetStore, DirectorySource, Kpis, names};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DatasetStore::new(Arc::new(DirectorySource::new("./data")));
//! let kpis: Kpis = store.fetch_as(names::KPIS).await?;
//! println!("{} posts", kpis.total_posts);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod records;
pub mod source;
pub mod store;

pub use error::{validate_name, DataError, DataResult};
pub use records::{
    names, row, rows_of, to_rows, Demographic, Engager, IcpContact, IcpFirstSeen, Kpis, Post,
    Row, TopPost, WeeklyIcp, WeeklyPosts, WeeklyShare,
};
pub use source::{list_json_files, DatasetSource, DirectorySource, HttpSource, MemorySource};
pub use store::DatasetStore;
