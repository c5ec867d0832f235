//! Error types for the bulletin engine

use thiserror::Error;

/// Result type alias for bulletin operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while normalizing, laying out, or rendering a result
#[derive(Error, Debug)]
pub enum Error {
    /// The input result payload is missing a required field or has the wrong shape.
    /// Nothing is rendered when this is returned.
    #[error("Malformed lottery result: {0}")]
    MalformedResult(String),

    /// No rendering backend could be acquired after exhausting every source
    #[error("No render backend available (tried: {})", tried.join(", "))]
    BackendUnavailable { tried: Vec<String> },

    /// A backend failed while producing the document
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid layout or client configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Transport-level failure talking to the results API
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Filesystem failure while persisting a document
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A queued render request was replaced by a newer one before it started
    #[error("Render request superseded by a newer request")]
    Superseded,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResult(err.to_string())
    }
}

#[cfg(feature = "api")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::NetworkError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_unavailable_lists_sources() {
        let err = Error::BackendUnavailable {
            tried: vec!["pdf".into(), "html".into()],
        };
        assert_eq!(
            err.to_string(),
            "No render backend available (tried: pdf, html)"
        );
    }
}
