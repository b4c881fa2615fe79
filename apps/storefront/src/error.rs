//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  User action                 Rust Backend                               │
//! │  ───────────                 ────────────                               │
//! │                                                                         │
//! │  {"action":"add_to_cart"}                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── StoreError::Io { key, .. } ────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Core Error? ─── CoreError::InsufficientStock ─── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  notification: "Only 3 units of product 4 left"                         │
//! │  checkout form: per-field messages from `fields`                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these errors end the session. The presentation layer shows them
//! as transient messages and keeps going.

use serde::Serialize;

use fiftyone_core::{CoreError, FormErrors};
use fiftyone_store::StoreError;

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_INPUT",
///   "message": "Please correct the highlighted fields",
///   "fields": [{ "field": "email", "message": "email is required" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages for form submissions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

/// One failing form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product or cart line
    NotFound,

    /// Requested quantity exceeds availability
    InsufficientStock,

    /// Checkout with nothing in the cart
    EmptyCart,

    /// Malformed input (form fields, size/color, snapshots)
    InvalidInput,

    /// Durable storage failed
    StorageError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates an invalid input error carrying every failing field.
    pub fn form(errors: &FormErrors) -> Self {
        ApiError {
            code: ErrorCode::InvalidInput,
            message: "Please correct the highlighted fields".to_string(),
            fields: errors
                .iter()
                .map(|e| FieldError {
                    field: e.field().to_string(),
                    message: e.to_string(),
                })
                .collect(),
        }
    }

    /// Message for a single field, if this error carries one.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == name)
            .map(|f| f.message.as_str())
    }
}

/// Converts storage errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { key, source } => {
                // Log the actual error but return a generic message
                tracing::error!(key = %key, error = %source, "Storage I/O failed");
                ApiError::new(ErrorCode::StorageError, "Could not save your data")
            }
            StoreError::Serialization { key, source } => {
                tracing::error!(key = %key, error = %source, "Stored data is malformed");
                ApiError::new(ErrorCode::StorageError, "Stored data could not be read")
            }
            StoreError::InvalidKey(key) => {
                tracing::error!(key = %key, "Invalid storage key");
                ApiError::internal("Storage operation failed")
            }
            StoreError::Duplicate { entity, id } => {
                tracing::error!(entity = %entity, id = %id, "Duplicate stored entity");
                ApiError::new(ErrorCode::StorageError, format!("{entity} {id} already exists"))
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
            CoreError::CartLineNotFound {
                product_id,
                size,
                color,
            } => ApiError::not_found("Cart line", format!("{product_id} ({size}, {color})")),
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Only {available} units of product {product_id} left ({requested} requested)"
                ),
            ),
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, "Your cart is empty"),
            CoreError::Validation(e) => ApiError {
                code: ErrorCode::InvalidInput,
                message: e.to_string(),
                fields: vec![FieldError {
                    field: e.field().to_string(),
                    message: e.to_string(),
                }],
            },
            CoreError::InvalidForm(errors) => ApiError::form(&errors),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for storefront commands.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
