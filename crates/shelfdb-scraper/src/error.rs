use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("parse error for {context}: {reason}")]
    Parse { context: String, reason: String },

    /// Browser session could not be established, or the initial review
    /// content never rendered. Fatal for the book being processed; the
    /// batch orchestrator catches it and moves on.
    #[error("browser session failure: {reason}")]
    Session { reason: String },
}

impl ScraperError {
    pub(crate) fn session(reason: impl Into<String>) -> Self {
        ScraperError::Session {
            reason: reason.into(),
        }
    }
}
