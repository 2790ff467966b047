//! # Render Error Types
//!
//! ```text
//! RenderError
//!  ├── Serialization(SerializationError)   bad draw op, fatal
//!  └── Overflow(RenderOverflowWarning)      only when overflow is strict
//! ```
//!
//! Layout itself never fails. An overflowing table is a warning on the
//! [`crate::layout::PageModel`] unless the caller asks for strict rendering.

use thiserror::Error;

use crate::layout::{FontFace, RenderOverflowWarning};

/// Result type alias for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type alias for PDF serialization.
pub type SerializationResult<T> = Result<T, SerializationError>;

/// Errors from the render pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The table did not fit the page even at the tightest row pitch.
    #[error("Quotation does not fit on one page: {0}")]
    Overflow(RenderOverflowWarning),
}

/// A draw op the PDF writer cannot encode.
///
/// Everything but [`SerializationError::Pdf`] is raised before a document
/// is created, so a failed serialization never leaves a half-written one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SerializationError {
    /// Text uses a font that was not registered with the writer.
    #[error("Font {0} is not embedded in this document")]
    UnembeddedFont(FontFace),

    /// A coordinate, size or thickness is NaN or infinite.
    #[error("Non-finite {field} in draw op #{index}")]
    NonFiniteValue { index: usize, field: &'static str },

    /// A color channel outside `0.0..=1.0`.
    #[error("Color channel {value} in draw op #{index} is outside 0..1")]
    ColorOutOfRange { index: usize, value: f64 },

    /// Font size of zero or below.
    #[error("Font size {size} in draw op #{index} must be positive")]
    InvalidFontSize { index: usize, size: f64 },

    /// printpdf could not load a builtin font or save the document.
    #[error("PDF output failed: {0}")]
    Pdf(String),
}

impl RenderError {
    /// Short title for a user-facing alert.
    pub fn title(&self) -> &'static str {
        match self {
            RenderError::Serialization(_) => "Could Not Create PDF",
            RenderError::Overflow(_) => "Too Many Items",
        }
    }
}
