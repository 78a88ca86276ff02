//! Gateway error types.
//!
//! Every failure crossing the remote gateway boundary is normalized into
//! one of three classes: the request never got a response (`Network`),
//! the server rejected it (`Server`), or the client itself was
//! misconfigured (`Config`). Callers never see transport-specific errors.

use std::fmt;

/// Normalized error for all remote gateway operations.
#[derive(Debug, Clone)]
pub enum GatewayError {
    /// Network-level error (DNS, connection refused, timeout, TLS).
    /// The request never produced a server response.
    Network(String),

    /// The server answered with an error status. `message` is extracted
    /// from the JSON error body (`{message}` or `{error}`), verbatim;
    /// `body` preserves the raw response for diagnostics.
    Server {
        status: u16,
        message: String,
        body: String,
    },

    /// The request could not be constructed (bad base URL, header value).
    Config(String),
}

impl GatewayError {
    /// Create a network error from a reqwest error. Timeouts count as
    /// network errors: no response was received.
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            Self::Network(msg) => msg,
            Self::Server { message, .. } => message,
            Self::Config(msg) => msg,
        }
    }

    /// Get the HTTP status code, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a network-level error.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` if the server rejected the credentials (401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if the server reported a disabled/inactive account
    /// (403), which the UI surfaces with a support-contact notice.
    pub fn is_account_disabled(&self) -> bool {
        self.status() == Some(403)
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Server { status, message, .. } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            Self::Config(msg) => write!(f, "Client configuration error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Extract the human-readable message from a server error body.
///
/// Error bodies arrive as `{"message": "..."}` or `{"error": "..."}`;
/// the message is surfaced verbatim. Anything else falls back to the
/// raw body.
pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}
