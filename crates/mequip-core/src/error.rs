//! # Error Types
//!
//! Validation error types for mequip-core.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mequip-core errors (this file)                                        │
//! │  └── ValidationError  - Input validation failures, field-level         │
//! │                                                                         │
//! │  mequip-db errors (separate crate)                                     │
//! │  └── DbError          - NotFound, constraint and transaction failures  │
//! │                         (wraps ValidationError for the repo surface)   │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → HTTP controller → Frontend          │
//! │                                                                         │
//! │  Validation is rejected BEFORE any mutation occurs; persistence        │
//! │  failures roll the whole transaction back.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, limits)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These carry field-level detail so the CRM can highlight the offending
/// form field. Raised before any mutation happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A date that must come after another one does not.
    #[error("{field} must be after {other}")]
    MustFollow { field: String, other: String },

    /// A field that must be null for the given line-item tipo is set.
    #[error("{field} must be empty: {reason}")]
    Forbidden { field: String, reason: String },

    /// Too many entries in a collection.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },
}

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "nombre".to_string(),
        };
        assert_eq!(err.to_string(), "nombre is required");

        let err = ValidationError::MustFollow {
            field: "fecha_vencimiento".to_string(),
            other: "fecha_cotizacion".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "fecha_vencimiento must be after fecha_cotizacion"
        );

        let err = ValidationError::OutOfRange {
            field: "cantidad".to_string(),
            min: 1,
            max: 999,
        };
        assert_eq!(err.to_string(), "cantidad must be between 1 and 999");
    }
}
