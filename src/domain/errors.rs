//! Domain errors.

use serde::Serialize;
use thiserror::Error;

use super::models::project_settings::SettingsError;

/// A required field missing from a credential form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Settings key of the input
    pub field: String,
    /// Inline message shown under the input
    pub message: String,
}

impl FieldError {
    /// "Please enter {label}" for an empty input.
    pub fn required(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("Please enter {label}"),
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Domain-level errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No catalog entry with this id
    #[error("Integration not found: {0}")]
    IntegrationNotFound(String),

    /// Feature name outside the known set
    #[error("Unknown plan feature: {0}")]
    UnknownFeature(String),

    /// Category id outside the known set
    #[error("Unknown integration category: {0}")]
    UnknownCategory(String),

    /// Operation that does not apply to the provider's form
    #[error("{integration} does not support {operation}")]
    UnsupportedOperation {
        /// Display name
        integration: String,
        /// What was attempted
        operation: &'static str,
    },

    /// One or more required inputs were empty
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// A settings key held the wrong JSON type
    #[error("Malformed settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors returned by the backend API port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection, timeout or TLS failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// 401 or 403
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other 4xx
    #[error("Request rejected ({status}): {message}")]
    Client {
        /// HTTP status
        status: u16,
        /// Backend error text
        message: String,
    },

    /// 5xx
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status
        status: u16,
        /// Backend error text
        message: String,
    },

    /// Body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Classify a non-success response, preferring the backend's `error` field.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("HTTP {status}")
                } else {
                    trimmed.to_string()
                }
            });

        match status {
            401 | 403 => Self::Unauthorized(message),
            404 => Self::NotFound(message),
            400..=499 => Self::Client { status, message },
            _ => Self::Server { status, message },
        }
    }

    /// Text suitable for an error toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) | Self::InvalidResponse(_) => {
                "Something went wrong. Please try again".to_string()
            }
            Self::Unauthorized(message) | Self::NotFound(message) => message.clone(),
            Self::Client { message, .. } | Self::Server { message, .. } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_error_field() {
        let err = ApiError::from_status(400, r#"{"error":"Invalid G2 API key"}"#);
        assert_eq!(
            err,
            ApiError::Client {
                status: 400,
                message: "Invalid G2 API key".to_string()
            }
        );
        assert_eq!(err.user_message(), "Invalid G2 API key");
    }

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(ApiError::from_status(401, ""), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(403, ""), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(404, "gone"), ApiError::NotFound(m) if m == "gone"));
        assert!(matches!(ApiError::from_status(502, ""), ApiError::Server { status: 502, .. }));
    }

    #[test]
    fn test_validation_display_joins_messages() {
        let err = DomainError::Validation(vec![
            FieldError::required("a", "Access Key"),
            FieldError::required("b", "Host"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Please enter Access Key, Please enter Host"
        );
    }
}
