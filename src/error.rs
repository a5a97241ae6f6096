use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{error, warn};

/// Main error type for the gateway
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Invalid event data: {0}")]
    #[diagnostic(code(tanacal::validation))]
    Validation(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(tanacal::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(tanacal::config))]
    Config(String),

    #[error("Authentication error: {0}")]
    #[diagnostic(code(tanacal::auth))]
    Auth(String),

    #[error("Google Calendar API request failed: {status} {body}")]
    #[diagnostic(code(tanacal::google_calendar))]
    GoogleCalendar { status: u16, body: String },

    #[error("Invalid date/time format: {0}")]
    #[diagnostic(code(tanacal::date_format))]
    InvalidDateFormat(String),

    #[error("HTTP client error: {0}")]
    #[diagnostic(code(tanacal::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(tanacal::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(tanacal::other))]
    Other(String),
}

impl Error {
    /// HTTP status this error maps to when it escapes a handler
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            warn!("Rejected request: {}", self);
        } else {
            error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create authentication errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create Google Calendar errors from an upstream response
pub fn google_calendar_error(status: u16, body: &str) -> Error {
    Error::GoogleCalendar {
        status,
        body: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = Error::Validation("validation error: [\n- name Event name is required\n]".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Invalid event data: validation error: ["));
    }

    #[test]
    fn upstream_errors_carry_status_and_body() {
        let err = google_calendar_error(404, "Not Found");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Google Calendar API request failed: 404 Not Found"
        );
    }
}
