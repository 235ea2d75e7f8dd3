use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

/// Message shown when neither the backend nor the call site supplies one.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Network error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // === APPLICATION ERRORS ===
    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Form limit reached: {0}")]
    LimitReached(String),

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("Payment failed: {0}")]
    Payment(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid server response: {0}")]
    InvalidServerResponse(String),

    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Classifies a non-success backend response.
    ///
    /// The message comes from the body's `message` field (or `error`), falling
    /// back to `fallback`. A body carrying an `errors` object becomes a
    /// [`AppError::Validation`] regardless of status, so field errors can be
    /// attached to their inputs.
    pub fn from_response(status: StatusCode, body: &Value, fallback: &str) -> Self {
        let message = response_message(body).unwrap_or_else(|| fallback.to_string());

        if let Some(fields) = field_errors(body) {
            return AppError::Validation { message, fields };
        }

        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::FORBIDDEN => AppError::Forbidden(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation {
                message,
                fields: BTreeMap::new(),
            },
            StatusCode::PAYMENT_REQUIRED => AppError::Payment(message),
            s if s.is_client_error() => AppError::BadRequest(message),
            _ => AppError::Internal(message),
        }
    }

    /// Builds a client-side validation error for a single input.
    pub fn field(field: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), message.to_string());
        AppError::Validation {
            message: message.to_string(),
            fields,
        }
    }

    /// The string presented to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Reqwest(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            AppError::Json(_) | AppError::InvalidServerResponse(_) => {
                "The server sent an unexpected response.".to_string()
            }
            AppError::Io(err) => err.to_string(),
            AppError::Url(err) => format!("Invalid URL: {}", err),
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Payment(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::LimitReached(_) => {
                "You have reached your form limit. Please upgrade your plan.".to_string()
            }
            AppError::Validation { message, .. } => message.clone(),
            AppError::CheckoutInProgress => self.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }
}

fn response_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|msg| !msg.trim().is_empty())
        .map(str::to_string)
}

/// Accepts both `{"errors": {"name": "..."}}` and
/// `{"errors": [{"field": "name", "message": "..."}]}`.
fn field_errors(body: &Value) -> Option<BTreeMap<String, String>> {
    let errors = body.get("errors")?;
    let fields: BTreeMap<String, String> = match errors {
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, val)| {
                let msg = match val {
                    Value::String(s) => s.clone(),
                    Value::Array(items) => items.first()?.as_str()?.to_string(),
                    _ => return None,
                };
                Some((key.clone(), msg))
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let field = item.get("field").or_else(|| item.get("param"))?.as_str()?;
                let msg = item.get("message").or_else(|| item.get("msg"))?.as_str()?;
                Some((field.to_string(), msg.to_string()))
            })
            .collect(),
        _ => return None,
    };
    (!fields.is_empty()).then_some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_codes_map_to_taxonomy() {
        let body = json!({ "message": "nope" });
        assert!(matches!(
            AppError::from_response(StatusCode::UNAUTHORIZED, &body, "x"),
            AppError::Unauthorized(m) if m == "nope"
        ));
        assert!(matches!(
            AppError::from_response(StatusCode::FORBIDDEN, &body, "x"),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from_response(StatusCode::NOT_FOUND, &body, "x"),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from_response(StatusCode::CONFLICT, &body, "x"),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from_response(StatusCode::BAD_GATEWAY, &body, "x"),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn falls_back_when_body_has_no_message() {
        let err = AppError::from_response(StatusCode::UNAUTHORIZED, &Value::Null, "Login failed");
        assert_eq!(err.user_message(), "Login failed");

        let blank = json!({ "message": "  " , "error": "Token expired" });
        let err = AppError::from_response(StatusCode::UNAUTHORIZED, &blank, "Login failed");
        assert_eq!(err.user_message(), "Token expired");
    }

    #[test]
    fn errors_object_becomes_field_errors() {
        let body = json!({ "errors": { "name": "Form name is required", "redirectUrl": ["Must be a valid URL"] } });
        match AppError::from_response(StatusCode::BAD_REQUEST, &body, "Failed") {
            AppError::Validation { fields, .. } => {
                assert_eq!(fields["name"], "Form name is required");
                assert_eq!(fields["redirectUrl"], "Must be a valid URL");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn errors_array_becomes_field_errors() {
        let body = json!({ "errors": [{ "param": "email", "msg": "Invalid email" }] });
        match AppError::from_response(StatusCode::UNPROCESSABLE_ENTITY, &body, "Failed") {
            AppError::Validation { fields, .. } => assert_eq!(fields["email"], "Invalid email"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn limit_reached_has_upgrade_message() {
        let err = AppError::LimitReached("Form limit reached".to_string());
        assert!(err.user_message().contains("upgrade"));
    }
}
