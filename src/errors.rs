use thiserror::Error;

/// Errors surfaced by schedule and update-check fetches.
///
/// Only the orchestrator's refresh turns one of these into a user-visible
/// error state; the background poller logs and retries.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Feed answered with a non-success status.
    #[error("feed returned HTTP {0}")]
    Status(u16),

    /// Body was not a valid schedule document.
    #[error("invalid schedule payload: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FeedError {
    /// Short retry hint matching the error class, shown under the message.
    pub fn suggestion(&self) -> &'static str {
        match self {
            FeedError::Network(_) => "Check your internet connection and press 'r' to retry.",
            FeedError::Status(_) => "The schedule server is having issues. Press 'r' to retry.",
            FeedError::Parse(_) => "The feed looks malformed. It usually recovers on its own.",
        }
    }
}
