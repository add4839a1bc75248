//! Error taxonomy for outbound API calls and user-facing message derivation.
//!
//! Slices never surface raw errors to the view layer: every rejected
//! operation is converted to a single human-readable string via
//! [`ApiError::user_message`] and stored in the slice's `error` field.

use serde_json::Value;
use thiserror::Error;

/// Message shown when no response was received at all.
pub const BACKEND_UNREACHABLE: &str =
    "Unable to connect to the backend server. Please ensure the server is running.";

/// Message for a 2xx login/refresh response that carried no access token.
pub const ACCESS_TOKEN_MISSING: &str = "Access token not received";

/// Message for a refresh attempt with nothing persisted to refresh from.
pub const NO_REFRESH_TOKEN: &str = "No refresh token available";

/// Errors that can occur during API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Local precondition failure; never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// No response received from the backend.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Response received with a non-2xx status. The body is kept as parsed
    /// JSON, or as a string when the backend returned a non-JSON payload.
    #[error("HTTP {status}")]
    Http { status: u16, body: Value },

    /// Missing or invalid token after an otherwise successful call,
    /// or no token available to begin with.
    #[error("{0}")]
    Auth(String),

    /// A 2xx response whose payload did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// The logical operation a request belongs to, used to pick operation-
/// specific status messages and fallback wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    Logout,
    RefreshToken,
    FetchProfile,
    FetchSummary,
    FetchWorkingCapital,
    FetchWallet,
    FetchRecentTransactions,
    FetchScheduledTransfers,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Register => "Registration",
            Operation::Login => "Login",
            Operation::Logout => "Logout",
            Operation::RefreshToken => "Token refresh",
            Operation::FetchProfile => "Profile fetch",
            Operation::FetchSummary => "Financial summary fetch",
            Operation::FetchWorkingCapital => "Working capital fetch",
            Operation::FetchWallet => "Wallet fetch",
            Operation::FetchRecentTransactions => "Recent transactions fetch",
            Operation::FetchScheduledTransfers => "Scheduled transfers fetch",
        }
    }
}

impl ApiError {
    /// Derive the single user-facing message for a failed operation.
    ///
    /// Precedence for HTTP failures: a non-empty string body verbatim, then
    /// an object body's `message`/`error`/`details` fields, then status-
    /// specific wording, then a generic `"<operation> failed (<status>)"`.
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            ApiError::Validation(message) | ApiError::Auth(message) => message.clone(),
            ApiError::Network(_) => BACKEND_UNREACHABLE.to_string(),
            ApiError::Decode(_) => format!("{} failed", op.label()),
            ApiError::Http { status, body } => {
                let from_body = message_from_body(body);
                match (*status, op) {
                    (401, Operation::Login) => {
                        "Invalid email or password. Please check your credentials.".to_string()
                    }
                    (409, Operation::Register) => {
                        "An account with this email already exists.".to_string()
                    }
                    (500, _) => from_body.unwrap_or_else(|| {
                        "Backend server error. Please try again later.".to_string()
                    }),
                    _ => from_body
                        .unwrap_or_else(|| format!("{} failed ({})", op.label(), status)),
                }
            }
        }
    }
}

/// Extract a message from an HTTP error body, if it carries one.
fn message_from_body(body: &Value) -> Option<String> {
    match body {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Object(map) => ["message", "error", "details"]
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string),
        _ => None,
    }
}
