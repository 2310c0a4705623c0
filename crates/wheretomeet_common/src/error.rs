// --- File: crates/wheretomeet_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all WhereToMeet crates.
///
/// Crate-specific errors convert into this type with `From` impls so handlers
/// can map every failure onto one status code table.
#[derive(Error, Debug)]
pub enum WhereToMeetError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Missing or invalid configuration, including missing credentials
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The caller is not signed in
    #[error("Unauthorized: {0}")]
    AuthError(String),

    /// The caller is signed in but may not perform this action
    #[error("Forbidden: {0}")]
    ForbiddenError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The requested change does not fit the current state of the resource
    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for WhereToMeetError {
    fn status_code(&self) -> u16 {
        match self {
            WhereToMeetError::HttpError(_) => 500,
            WhereToMeetError::ParseError(_) => 400,
            WhereToMeetError::ConfigError(_) => 500,
            WhereToMeetError::AuthError(_) => 401,
            WhereToMeetError::ForbiddenError(_) => 403,
            WhereToMeetError::ValidationError(_) => 400,
            WhereToMeetError::ExternalServiceError { .. } => 502,
            WhereToMeetError::ConflictError(_) => 409,
            WhereToMeetError::NotFoundError(_) => 404,
            WhereToMeetError::TimeoutError(_) => 504,
            WhereToMeetError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for WhereToMeetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WhereToMeetError::TimeoutError(err.to_string())
        } else {
            WhereToMeetError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WhereToMeetError {
    fn from(err: serde_json::Error) -> Self {
        WhereToMeetError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for WhereToMeetError {
    fn from(err: std::io::Error) -> Self {
        WhereToMeetError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> WhereToMeetError {
    WhereToMeetError::ConfigError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> WhereToMeetError {
    WhereToMeetError::AuthError(message.to_string())
}

pub fn forbidden<T: fmt::Display>(message: T) -> WhereToMeetError {
    WhereToMeetError::ForbiddenError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> WhereToMeetError {
    WhereToMeetError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> WhereToMeetError {
    WhereToMeetError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> WhereToMeetError {
    WhereToMeetError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> WhereToMeetError {
    WhereToMeetError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> WhereToMeetError {
    WhereToMeetError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(auth_error("no session").status_code(), 401);
        assert_eq!(not_found("meeting").status_code(), 404);
        assert_eq!(conflict("already joined").status_code(), 409);
        assert_eq!(config_error("missing key").status_code(), 500);
        assert_eq!(external_service_error("places", "down").status_code(), 502);
    }
}
