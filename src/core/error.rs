use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

use super::validation::ValidationErrors;

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Field-scoped validation failures, client-correctable
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness or other constraint violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        let body = match self {
            AppError::Validation(details) => serde_json::json!({
                "error": "Validation failed",
                "details": details,
            }),
            AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::RateLimitExceeded(msg) => serde_json::json!({ "error": msg }),
            _ => {
                tracing::error!(error = %self, "Request failed with internal error");
                serde_json::json!({ "error": "Internal server error" })
            }
        };

        HttpResponse::build(status_code).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Configuration(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

// Helper functions for common error scenarios
impl AppError {
    /// Single field validation failure
    pub fn invalid_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.add(field, msg);
        AppError::Validation(errors)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Classify a failed INSERT/UPDATE.
    ///
    /// Unique violations become `Conflict`, foreign-key violations become a
    /// validation error on `reference_field` when the caller has one.
    pub fn from_write(err: sqlx::Error, entity: &str, reference_field: Option<&str>) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::conflict(format!("{} already exists", entity));
            }
            if db_err.is_foreign_key_violation() {
                if let Some(field) = reference_field {
                    return AppError::invalid_field(field, "references a record that does not exist");
                }
            }
        }
        AppError::Database(err)
    }
}
