//! # Error Types
//!
//! Domain-specific error types for tiles-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tiles-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Empty cart / empty document                    │
//! │                                                                         │
//! │  tiles-render errors (separate crate)                                  │
//! │  └── SerializationError - Malformed draw instruction                   │
//! │                                                                         │
//! │  tiles-engine errors                                                   │
//! │  └── EngineError      - What the app sees (sink IO, tickets, ...)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → App alert           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Non-fatal problems (a field that failed to parse) are NOT errors. They are
//! reported as [`NumericCoercionWarning`](crate::validation::NumericCoercionWarning)
//! values next to the result.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The priced lines could not be encoded for the submission payload.
    ///
    /// ## When This Occurs
    /// - Practically never: every field of a priced line is JSON-safe.
    ///   Kept so the submission builder never has to panic.
    #[error("Could not encode order details: {0}")]
    Serialization(#[from] serde_json::Error),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are the only fatal outcomes of the pricing pipeline. Everything else
/// (bad numbers, missing fields) is defaulted and reported as a warning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Aggregation for submission was asked to total an empty cart.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: 0 items
    ///      │
    ///      ▼
    /// Process Order
    ///      │
    ///      ▼
    /// EmptyCart
    ///      │
    ///      ▼
    /// UI shows: "Please add items to cart before processing"
    /// ```
    #[error("Cart is empty: add items to the cart before processing")]
    EmptyCart,

    /// A quotation document was requested without any line items.
    #[error("Quotation has no line items: nothing to print")]
    EmptyDocument,

    /// Invalid format (e.g., unknown document type).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Short message suitable for an alert dialog title.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::EmptyCart => "Cart Empty",
            ValidationError::EmptyDocument => "Nothing To Print",
            ValidationError::InvalidFormat { .. } => "Invalid Input",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
