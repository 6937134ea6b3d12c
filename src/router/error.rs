//! Router error types

use thiserror::Error;

use crate::data::DataError;

/// Errors a page can return from its render
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    /// A dataset could not be loaded or decoded
    #[error("{0}")]
    Data(#[from] DataError),

    /// The page could not build its view
    #[error("{0}")]
    Render(String),

    /// The navigation this render belonged to was superseded
    #[error("Navigation cancelled")]
    Cancelled,
}

impl PageError {
    pub fn render(message: impl Into<String>) -> Self {
        PageError::Render(message.into())
    }
}

/// Why a navigation ended in the error state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteFailure {
    /// No page is registered for the route key
    #[error("Page not found: {0}")]
    NotFound(String),

    /// The page returned an error
    #[error("{0}")]
    Render(String),

    /// The page panicked while rendering
    #[error("Page panicked: {0}")]
    Panicked(String),
}

pub type PageResult<T> = std::result::Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_message_passes_through() {
        let err: PageError = DataError::unavailable("kpis.json", "HTTP 404").into();
        assert_eq!(err.to_string(), "Failed to load kpis.json: HTTP 404");
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            RouteFailure::NotFound("nope".into()).to_string(),
            "Page not found: nope"
        );
        assert_eq!(RouteFailure::Panicked("boom".into()).to_string(), "Page panicked: boom");
    }
}
