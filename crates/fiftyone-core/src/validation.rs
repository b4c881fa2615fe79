//! # Validation Module
//!
//! Input validation for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation                                                 │
//! │  ├── Parses raw input (numbers, JSON actions)                          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Checkout form: required fields, email, phone                      │
//! │  └── Search text and quantities                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart bookkeeping                                             │
//! │  └── Size/color against the product, stock availability               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fiftyone_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_email("ana@example.com").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CoreResult, FormErrors, ValidationError};
use crate::types::CustomerInfo;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of the catalog search text.
pub const MAX_SEARCH_LEN: usize = 100;

/// Maximum length of any checkout form field.
pub const MAX_FIELD_LEN: usize = 200;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("static phone regex"))
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required free-text field.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_FIELD_LEN`] characters
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FIELD_LEN,
        });
    }

    Ok(())
}

/// Validates an email address (`local@domain.tld`, no whitespace).
///
/// ## Example
/// ```rust
/// use fiftyone_core::validation::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("ana@example").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email)?;

    if !email_regex().is_match(email.trim()) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number: digits, spaces, hyphens, parentheses, with an
/// optional leading `+`.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    validate_required("phone", phone)?;

    if !phone_regex().is_match(phone.trim()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "may contain only digits, spaces, '-', '(', ')' and a leading '+'"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity entered by the shopper.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates catalog search text.
///
/// ## Returns
/// The trimmed query string. Empty is allowed and matches everything.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the checkout form, reporting every failing field.
///
/// ## Rules
/// - name, email, phone, address, city, zip are required
/// - email and phone must be well formed
/// - state and notes are optional
///
/// ```text
/// submit ──► validate_customer_info ──┬── Ok ──► order simulator
///                                     └── InvalidForm([name, email]) ──► per-field messages
/// ```
pub fn validate_customer_info(info: &CustomerInfo) -> CoreResult<()> {
    let mut errors = FormErrors::new();

    let checks = [
        validate_required("name", &info.name),
        validate_email(&info.email),
        validate_phone(&info.phone),
        validate_required("address", &info.address),
        validate_required("city", &info.city),
        validate_required("zip", &info.zip),
    ];

    for err in checks.into_iter().filter_map(Result::err) {
        errors.push(err);
    }

    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
