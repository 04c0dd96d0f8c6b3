use thiserror::Error;

/// Errors from the site's external collaborators.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Transport-level failure talking to a remote endpoint.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("endpoint returned {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The reviews provider answered but reported a failure.
    #[error("reviews provider status {0}")]
    Provider(String),

    /// A response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
