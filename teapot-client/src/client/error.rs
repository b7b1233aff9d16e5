//! Errors of a single request against the node

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection refused, reset, TLS, ...
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 401, the session expired or was never established
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Everything except 401 is retried by pollers
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    pub fn from_status(status: u16) -> Self {
        if status == 401 {
            ClientError::Unauthorized
        } else {
            ClientError::Status(status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(ClientError::from_status(401).is_unauthorized());
        assert!(matches!(ClientError::from_status(503), ClientError::Status(503)));
        assert!(!ClientError::Timeout.is_unauthorized());
    }

    #[test]
    fn test_display() {
        assert_eq!(ClientError::Status(404).to_string(), "Unexpected HTTP status: 404");
        assert_eq!(ClientError::Unauthorized.to_string(), "Unauthorized");
    }
}
