use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Transport failure. Built through [`GraphError::transport`] so the request
    /// URL, and the access token in its query, never reaches the message.
    #[error("Network error: {0}")]
    Http(reqwest::Error),
    #[error("API error (status={status}, code={code:?}): {message}")]
    Api {
        status: StatusCode,
        code: Option<i64>,
        message: String,
    },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid url: {0}")]
    InvalidUrl(String),
}

impl GraphError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }

    /// Whether retrying the same call later may succeed.
    ///
    /// Transport failures (including timeouts), 5xx and 429 responses are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Parse(_) | Self::InvalidUrl(_) => false,
        }
    }

    /// Whether the Graph API explicitly refused the request (bad or expired token,
    /// missing permission).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Api { status, .. }
                if status.is_client_error() && *status != StatusCode::TOO_MANY_REQUESTS
        )
    }
}
