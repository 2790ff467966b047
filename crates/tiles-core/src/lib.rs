//! # tiles-core: Pure Pricing and Document Logic for Tiles
//!
//! This crate holds every calculation the tile sales app performs: line
//! pricing, order totals, the order submission record, amount-in-words and
//! the quotation document model. Nothing here touches the file system, the
//! network or a clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tiles Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile App (cart screens)                    │   │
//! │  │       Cart ──► Order header ──► Save order ──► Share PDF        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HeaderRecord / LineRecord              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   tiles-engine (I/O shell)                      │   │
//! │  │     config • tracing • document sink • share de-duplication     │   │
//! │  └──────────────┬─────────────────────────────────┬────────────────┘   │
//! │                 │                                 │                     │
//! │  ┌──────────────▼──────────────────┐   ┌──────────▼─────────────────┐  │
//! │  │   ★ tiles-core (THIS CRATE) ★   │◄──│      tiles-render          │  │
//! │  │                                 │   │  layout engine • PDF bytes │  │
//! │  │  money  pricing  aggregate      │   └────────────────────────────┘  │
//! │  │  submission  words  document    │                                    │
//! │  │                                 │                                    │
//! │  │  NO I/O • NO CLOCK • PURE       │                                    │
//! │  └─────────────────────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in paisa and quantities in milli-units
//! - [`types`] - App records, the order header and document types
//! - [`validation`] - Lenient numeric coercion and cart checks
//! - [`pricing`] - Line pricing
//! - [`aggregate`] - Order totals
//! - [`submission`] - Order submission record
//! - [`words`] - Amount in words (lakh/crore)
//! - [`document`] - Quotation document model
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tiles_core::money::Money;
//! use tiles_core::pricing::{price_line, LineInput};
//! use tiles_core::aggregate::aggregate;
//!
//! let item = price_line(LineInput {
//!     stock_id: "803-1333".to_string(),
//!     description: "Glossy Tile 12x12".to_string(),
//!     long_description: None,
//!     uom: None,
//!     box_count: 2,
//!     piece_count: 3,
//!     packing_factor: 10.0,
//!     unit_price: Money::from_rupees(500),
//!     discount_per_unit: Money::zero(),
//! });
//!
//! let totals = aggregate(&[item], Money::zero()).unwrap();
//! assert_eq!(totals.grand_total.format_grouped(), "25,000.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod document;
pub mod error;
pub mod money;
pub mod pricing;
pub mod submission;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate, OrderTotals};
pub use document::{DocumentModelBuilder, QuotationDocument};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Quantity};
pub use pricing::{price_line, price_record, LineInput, LineItem, QuantityFormula};
pub use submission::{build_submission, SubmissionLine, SubmissionPayload};
pub use types::*;
pub use validation::NumericCoercionWarning;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Back-office transaction type for a sales quotation.
pub const TRANS_TYPE_QUOTATION: u32 = 32;

/// Back-office transaction type for a sales order.
pub const TRANS_TYPE_ORDER: u32 = 30;

/// Unit printed when a line carries none.
pub const DEFAULT_UOM: &str = "sqm";
