//! # Engine Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Input       │  │       Rendering         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Validation     │  │  Serialization          │ │
//! │  │  ConfigLoad...  │  │  Submission     │  │  Overflow (strict only) │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │     Output      │  │                 Sharing                     │  │
//! │  │                 │  │                                             │  │
//! │  │  Sink (retry)   │  │  ShareInFlight   TicketMismatch             │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried inside the engine. [`EngineError::is_retryable`] tells
//! the caller which failures are worth another attempt.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tiles_core::{CoreError, ValidationError};
use tiles_render::{RenderError, RenderOverflowWarning, SerializationError};

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type alias for document sinks.
pub type SinkResult<T> = Result<T, SinkError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The submission record could not be encoded.
    #[error("Failed to build submission: {0}")]
    Submission(String),

    // =========================================================================
    // Rendering Errors
    // =========================================================================
    #[error("Failed to encode PDF: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Quotation does not fit on one page: {0}")]
    Overflow(RenderOverflowWarning),

    // =========================================================================
    // Output Errors
    // =========================================================================
    #[error(transparent)]
    Sink(#[from] SinkError),

    // =========================================================================
    // Sharing Errors
    // =========================================================================
    /// Another share of the same order has not finished yet.
    #[error("Quotation {order_id} is already being shared")]
    ShareInFlight { order_id: String },

    /// The ticket was issued for a different order.
    #[error("Share ticket for {ticket} cannot be used for quotation {document}")]
    TicketMismatch { ticket: String, document: String },
}

/// Failure writing a finished document.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File name is empty or would leave the sink's directory.
    #[error("Invalid document file name: {0:?}")]
    InvalidName(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => EngineError::Validation(v),
            CoreError::Serialization(e) => EngineError::Submission(e.to_string()),
        }
    }
}

impl From<RenderError> for EngineError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Serialization(e) => EngineError::Serialization(e),
            RenderError::Overflow(w) => EngineError::Overflow(w),
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl EngineError {
    /// Returns true if the same call may succeed when repeated.
    ///
    /// Only sink I/O qualifies. A full disk or a locked cache directory can
    /// clear up; bad input and bad layout cannot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Sink(SinkError::CreateDir { .. } | SinkError::Write { .. }))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_) | EngineError::ConfigLoadFailed(_)
        )
    }

    /// Short title for a user-facing alert.
    pub fn title(&self) -> &'static str {
        match self {
            EngineError::InvalidConfig(_) | EngineError::ConfigLoadFailed(_) => "Settings Error",
            EngineError::Validation(v) => v.title(),
            EngineError::Submission(_) => "Could Not Save Order",
            EngineError::Serialization(_) => "Could Not Create PDF",
            EngineError::Overflow(_) => "Too Many Items",
            EngineError::Sink(_) => "Could Not Save PDF",
            EngineError::ShareInFlight { .. } => "Already Sharing",
            EngineError::TicketMismatch { .. } => "Share Failed",
        }
    }
}
