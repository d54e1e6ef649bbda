//! Error taxonomy shared by the API client, the fetch state machines and
//! the comment section.

use std::collections::BTreeMap;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ClientError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    #[display("NETWORK_ERROR")]
    NetworkError,
    #[display("AUTH_ERROR")]
    AuthError,
    #[display("PERMISSION_ERROR")]
    PermissionError,
    #[display("NOT_FOUND_ERROR")]
    NotFoundError,
    #[display("VALIDATION_ERROR")]
    ValidationError,
    #[display("RATE_LIMIT_ERROR")]
    RateLimitError,
    #[display("SERVER_ERROR")]
    ServerError,
    #[display("UNKNOWN_ERROR")]
    UnknownError,
}

impl ErrorKind {
    /// Classify an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::AuthError,
            403 => Self::PermissionError,
            404 => Self::NotFoundError,
            400 | 422 => Self::ValidationError,
            429 => Self::RateLimitError,
            500..=599 => Self::ServerError,
            _ => Self::UnknownError,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::NetworkError => {
                "Network error. Please check your connection."
            }
            Self::AuthError => "Please log in to continue.",
            Self::PermissionError => {
                "You do not have permission to perform this action."
            }
            Self::NotFoundError => "The requested resource was not found.",
            Self::ValidationError => "Please check your input and try again.",
            Self::RateLimitError => {
                "Too many requests. Please wait a moment and try again."
            }
            Self::ServerError => "Server error. Please try again later.",
            Self::UnknownError => "An unexpected error occurred.",
        }
    }

    /// Errors a user can reasonably recover from by retrying the same
    /// request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimitError | Self::ServerError
        )
    }
}

/// A classified error, as held in hook state and passed to `on_error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ErrorInfo {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            data: None,
        }
    }

    /// An error carrying the kind's default user-facing message.
    pub fn of_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    pub fn from_status(
        status: u16,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let kind = ErrorKind::from_status(status);
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.default_message().to_string()
        } else {
            message
        };
        Self {
            kind,
            message,
            status: Some(status),
            data,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthError, message)
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionError, message)
    }

    /// The server answered 401: the session it was sent with is no longer
    /// valid. Auth errors raised locally carry no status and never match.
    pub fn is_session_expired(&self) -> bool {
        self.status == Some(401)
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    /// Field-level messages carried by a validation error.
    ///
    /// Accepts either `{"field": "message"}` or `{"field": ["message", ..]}`
    /// (first message wins), optionally nested under an `errors` key.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        let Some(Value::Object(map)) = self.data.as_ref() else {
            return BTreeMap::new();
        };
        let map = match map.get("errors") {
            Some(Value::Object(inner)) => inner,
            _ => map,
        };

        map.iter()
            .filter_map(|(field, value)| {
                let message = match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Array(items) => items
                        .iter()
                        .find_map(|v| v.as_str().map(str::to_string)),
                    _ => None,
                }?;
                Some((field.clone(), message))
            })
            .collect()
    }
}

impl From<ClientError> for ErrorInfo {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::APIError {
                status,
                message,
                data,
            } => Self::from_status(status.as_u16(), message, data),
            ClientError::Network(e) => {
                tracing::debug!("network failure: {e}");
                Self::of_kind(ErrorKind::NetworkError)
            }
            ClientError::Decode(e) => Self::new(
                ErrorKind::UnknownError,
                format!("Unexpected response from server: {e}"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_statuses() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::AuthError);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::PermissionError);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFoundError);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::ValidationError);
        assert_eq!(ErrorKind::from_status(429), ErrorKind::RateLimitError);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::ServerError);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::UnknownError);
    }

    #[test]
    fn blank_message_falls_back_to_kind_default() {
        let error = ErrorInfo::from_status(429, "  ", None);
        assert_eq!(error.kind, ErrorKind::RateLimitError);
        assert_eq!(error.message, ErrorKind::RateLimitError.default_message());
        assert_eq!(error.status, Some(429));
    }

    #[test]
    fn api_error_converts_with_status() {
        let error: ErrorInfo = ClientError::APIError {
            status: reqwest::StatusCode::FORBIDDEN,
            message: "not yours".into(),
            data: None,
        }
        .into();
        assert_eq!(error.kind, ErrorKind::PermissionError);
        assert_eq!(error.message, "not yours");
    }

    #[test]
    fn only_a_server_401_expires_the_session() {
        assert!(ErrorInfo::from_status(401, "expired", None).is_session_expired());
        assert!(!ErrorInfo::auth("Please log in.").is_session_expired());
        assert!(!ErrorInfo::from_status(403, "", None).is_session_expired());
    }

    #[test]
    fn field_errors_accept_both_shapes() {
        let flat = ErrorInfo::validation("bad")
            .with_data(json!({"content": "Content is required"}));
        assert_eq!(
            flat.field_errors().get("content").map(String::as_str),
            Some("Content is required")
        );

        let nested = ErrorInfo::validation("bad").with_data(json!({
            "errors": {"content": ["Too long", "Also bad"], "ignored": 3}
        }));
        let fields = nested.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["content"], "Too long");
    }

    #[test]
    fn serializes_kind_as_type() {
        let value = serde_json::to_value(ErrorInfo::of_kind(
            ErrorKind::NotFoundError,
        ))
        .unwrap();
        assert_eq!(value["type"], "NOT_FOUND_ERROR");
        assert!(value.get("status").is_none());
    }
}
