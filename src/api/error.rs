//! Uniform client-side error shape for API calls.
//!
//! Every failure an API method can produce is one of these variants with a
//! displayable message; callers never see a raw transport error. The
//! message for a failed response prefers the server-supplied `error`
//! field, then falls back to a generic status line.

use serde::Deserialize;
use thiserror::Error;

/// Error body the backend sends on failures (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 from any call; the session has already been torn down.
    #[error("{0}")]
    Unauthorized(String),

    /// Any other non-2xx response.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request was sent but no response ever arrived (timeout,
    /// refused connection).
    #[error("No response from server")]
    NoResponse,

    /// Transport-level failure before the request could be sent.
    #[error("{0}")]
    Transport(String),

    /// A well-formed response missing fields the contract requires.
    #[error("{0}")]
    Contract(String),

    /// A duplicate action fired while the first is still in flight.
    #[error("{0}")]
    InFlight(String),
}

impl ApiError {
    /// Build the error for a non-401 failure response.
    pub fn server(status: u16, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| format!("Server error: {}", status));
        Self::Server { status, message }
    }

    /// Build the error for a 401 response.
    pub fn unauthorized(body: &str) -> Self {
        let message = server_message(body)
            .unwrap_or_else(|| "Session expired. Please log in again.".to_string());
        Self::Unauthorized(message)
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    /// Map a transport error: a request that produced no response at all
    /// gets the fixed no-response message, anything that failed before
    /// leaving the client surfaces its own message.
    pub fn transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Transport(err.to_string())
        } else {
            tracing::debug!(error = %err, "Request produced no response");
            Self::NoResponse
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_prefers_body_message() {
        let err = ApiError::server(409, r#"{"error": "Trip is already full"}"#);
        assert_eq!(err.to_string(), "Trip is already full");
    }

    #[test]
    fn test_server_error_falls_back_to_status_line() {
        assert_eq!(ApiError::server(500, "").to_string(), "Server error: 500");
        assert_eq!(
            ApiError::server(502, "<html>bad gateway</html>").to_string(),
            "Server error: 502"
        );
        assert_eq!(ApiError::server(400, r#"{"error": ""}"#).to_string(), "Server error: 400");
    }

    #[test]
    fn test_unauthorized_messages() {
        let err = ApiError::unauthorized(r#"{"error": "token expired"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "token expired");

        let err = ApiError::unauthorized("");
        assert_eq!(err.to_string(), "Session expired. Please log in again.");
    }

    #[test]
    fn test_no_response_message() {
        assert_eq!(ApiError::NoResponse.to_string(), "No response from server");
    }
}
