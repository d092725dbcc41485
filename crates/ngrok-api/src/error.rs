//! Error types for the ngrok agent API client

use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error type for all session and collection operations
#[derive(Error, Debug)]
pub enum NgrokError {
    /// The root info or tunnel listing endpoint answered with a non-success status
    #[error("{message} (status {status})")]
    Root { status: StatusCode, message: String },

    /// A request addressed at a named tunnel answered with a non-success status
    #[error("{message}")]
    Tunnel { status: StatusCode, message: String },

    /// No tunnel in a collection matches the requested protocol
    #[error("any {proto} tunnel not found")]
    TunnelNotFound { proto: String },

    /// Response body is missing, not JSON, or lacks required fields
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Operation is declared but not available
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// The daemon could not be reached or the exchange failed midway
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The session was cancelled while the call was pending
    #[error("Request cancelled")]
    Cancelled,

    /// Base URL could not be parsed
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Tunnel name that cannot address a single per-tunnel resource
    #[error("Invalid tunnel name: {0:?}")]
    InvalidName(String),

    /// Header name or value rejected by the HTTP layer
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl NgrokError {
    /// Message carried by a status-based error
    pub fn message(&self) -> Option<&str> {
        match self {
            NgrokError::Root { message, .. } | NgrokError::Tunnel { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }

    /// HTTP status carried by a status-based error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            NgrokError::Root { status, .. } | NgrokError::Tunnel { status, .. } => Some(*status),
            NgrokError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Validation errors raised when constructing a [`Tunnel`](crate::Tunnel)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TunnelFieldError {
    /// A required field was an empty string
    #[error("tunnel field `{0}` must not be empty")]
    Empty(&'static str),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, NgrokError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tunnel_error_displays_server_message() {
        let err = NgrokError::Tunnel {
            status: StatusCode::NOT_FOUND,
            message: "no such tunnel".to_string(),
        };
        assert_eq!(err.to_string(), "no such tunnel");
        assert_eq!(err.message(), Some("no such tunnel"));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_not_found_display() {
        let err = NgrokError::TunnelNotFound {
            proto: "https".to_string(),
        };
        assert_eq!(err.to_string(), "any https tunnel not found");
        assert!(err.message().is_none());
    }

    #[test]
    fn test_invalid_name_display() {
        let err = NgrokError::InvalidName("..".to_string());
        assert_eq!(err.to_string(), "Invalid tunnel name: \"..\"");
        assert!(err.status().is_none());
    }
}
