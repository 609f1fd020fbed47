//! Typed error handling for the foods service
//!
//! Every failure a request can hit is one of the category enums below, wrapped
//! in [`FoodsError`]. Each category knows its HTTP status and a stable error
//! code, so handlers can simply return `Result<_, FoodsError>`.
//!
//! # Error Categories
//!
//! - [`FoodError`]: resource lookups and uniqueness
//! - [`QueryError`]: list query construction (filter syntax)
//! - [`ValidationError`]: request payload validation
//! - [`UploadError`]: photo uploads
//! - [`StorageError`]: collection backend failures
//! - [`ConfigError`]: configuration loading
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get(&id).await {
//!     Ok(food) => println!("Found: {}", food.name),
//!     Err(FoodsError::Food(FoodError::NotFound { id })) => println!("No food {}", id),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the foods service
#[derive(Debug, Error)]
pub enum FoodsError {
    /// Resource-level errors (lookup, uniqueness)
    #[error(transparent)]
    Food(#[from] FoodError),

    /// List query construction errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Payload validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Photo upload errors
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Collection backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`, mirrors the `success` flag of successful envelopes
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl FoodsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            FoodsError::Food(e) => e.status_code(),
            FoodsError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FoodsError::Validation(_) => StatusCode::BAD_REQUEST,
            FoodsError::Upload(e) => e.status_code(),
            FoodsError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FoodsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FoodsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FoodsError::Food(e) => e.error_code(),
            FoodsError::Query(_) => "INVALID_FILTER_SYNTAX",
            FoodsError::Validation(_) => "VALIDATION_ERROR",
            FoodsError::Upload(e) => e.error_code(),
            FoodsError::Storage(_) => "STORAGE_ERROR",
            FoodsError::Config(_) => "CONFIG_ERROR",
            FoodsError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            code: self.error_code().to_string(),
            error: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            FoodsError::Food(FoodError::NotFound { id }) => {
                Some(serde_json::json!({ "id": id }))
            }
            FoodsError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for FoodsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Food Errors
// =============================================================================

/// Errors related to the foods resource itself
#[derive(Debug, Error)]
pub enum FoodError {
    #[error("Food not found with id of {id}")]
    NotFound { id: String },

    #[error("Food named '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Invalid food id: {value}")]
    InvalidId { value: String },
}

impl FoodError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FoodError::NotFound { .. } => StatusCode::NOT_FOUND,
            FoodError::AlreadyExists { .. } => StatusCode::CONFLICT,
            FoodError::InvalidId { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FoodError::NotFound { .. } => "FOOD_NOT_FOUND",
            FoodError::AlreadyExists { .. } => "FOOD_ALREADY_EXISTS",
            FoodError::InvalidId { .. } => "INVALID_ID",
        }
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised while turning request parameters into a list query.
///
/// Bad `page`/`limit` values and unknown fields never end up here, they fall
/// back to defaults or simply match nothing.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid filter syntax for '{key}': {message}")]
    InvalidFilterSyntax { key: String, message: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation errors: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        // field_errors() is a HashMap, keep the output stable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Errors related to photo uploads
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload a file")]
    MissingFile,

    #[error("Please upload an image file (got {content_type})")]
    NotAnImage { content_type: String },

    #[error("Please upload an image less than {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    #[error("Malformed multipart body: {message}")]
    Multipart { message: String },

    #[error("Problem with file upload: {message}")]
    Io { message: String },
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::MissingFile => "UPLOAD_MISSING_FILE",
            UploadError::NotAnImage { .. } => "UPLOAD_NOT_AN_IMAGE",
            UploadError::TooLarge { .. } => "UPLOAD_TOO_LARGE",
            UploadError::Multipart { .. } => "UPLOAD_MALFORMED",
            UploadError::Io { .. } => "UPLOAD_IO_ERROR",
        }
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to collection backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionFailed { backend: String, message: String },

    #[error("Collection {operation} failed: {message}")]
    QueryFailed { operation: String, message: String },
}

impl StorageError {
    /// Wrap a backend error for the given collection operation
    pub fn query_failed(operation: &str, err: anyhow::Error) -> Self {
        StorageError::QueryFailed {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for FoodsError {
    fn from(err: serde_json::Error) -> Self {
        FoodsError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for FoodsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        FoodsError::Validation(errors.into())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for FoodsError {
    fn from(err: anyhow::Error) -> Self {
        FoodsError::Internal(err.to_string())
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for foods operations
pub type FoodsResult<T> = Result<T, FoodsError>;
