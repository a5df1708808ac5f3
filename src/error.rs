use std::fmt;
use thiserror::Error;

/// Upstream call failure.
///
/// `status` is `None` when the request never produced a response
/// (DNS, refused connection, timeout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
    pub endpoint: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "ThingsBoard API error: {} (Status: {status}) [{}]",
                self.message, self.endpoint
            ),
            None => write!(f, "{} [{}]", self.message, self.endpoint),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to authenticate with ThingsBoard: {0}")]
    Auth(String),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation \"{operation}\" for resource \"{resource}\" is available only in PE edition.")]
    Edition {
        resource: &'static str,
        operation: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Status code carried by an upstream failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
