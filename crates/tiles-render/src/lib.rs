//! # tiles-render: Quotation Layout and PDF Output
//!
//! Pure rendering for Tiles quotations. A [`QuotationDocument`] goes in,
//! PDF bytes come out. Writing the bytes anywhere is the engine's job.
//!
//! ## Modules
//!
//! - [`layout`] - Declarative page layout producing a [`PageModel`]
//! - [`pdf`] - Single-page PDF serializer on top of `printpdf`
//! - [`error`] - Render and serialization errors
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tiles_core::{aggregate, price_line, DocumentModelBuilder, LineInput, Money, OrderHeader};
//! use tiles_render::{render_document, LayoutSpec, RenderOptions};
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
//! let items = vec![item];
//! let totals = aggregate(&items, Money::zero()).unwrap();
//! let now = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let doc = DocumentModelBuilder::new(now)
//!     .build(OrderHeader::for_customer("Ali Traders"), items, totals)
//!     .unwrap();
//!
//! let rendered = render_document(&doc, &LayoutSpec::standard(), &RenderOptions::default()).unwrap();
//! assert!(rendered.bytes.starts_with(b"%PDF-"));
//! assert!(rendered.warnings.is_empty());
//! ```

pub mod error;
pub mod layout;
pub mod pdf;

use chrono::NaiveDateTime;
use tiles_core::QuotationDocument;

pub use error::{RenderError, RenderResult, SerializationError, SerializationResult};
pub use layout::{
    layout_quotation, DrawOp, FontFace, LayoutSpec, Letterhead, PageModel, RenderOverflowWarning,
    Rgb,
};
pub use pdf::{serialize_page, PdfWriter};

/// Options for [`render_document`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Fail with [`RenderError::Overflow`] instead of warning.
    pub strict_overflow: bool,
    /// Stamped as the document's creation date.
    pub created_at: Option<NaiveDateTime>,
}

/// PDF bytes plus whatever the layout had to warn about.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub warnings: Vec<RenderOverflowWarning>,
}

/// Lays out and serializes a quotation.
///
/// ## Errors
/// - [`RenderError::Overflow`] when rows overflow and `strict_overflow` is set
/// - [`RenderError::Serialization`] when a draw op cannot be encoded
pub fn render_document(
    doc: &QuotationDocument,
    spec: &LayoutSpec,
    options: &RenderOptions,
) -> RenderResult<RenderedDocument> {
    let page = layout_quotation(doc, spec);
    if options.strict_overflow {
        if let Some(warning) = page.warnings.first() {
            return Err(RenderError::Overflow(*warning));
        }
    }

    let mut writer = PdfWriter::default().title(format!("Quotation {}", doc.quotation_number()));
    if let Some(created_at) = options.created_at {
        writer = writer.created_at(created_at);
    }

    Ok(RenderedDocument {
        bytes: writer.write(&page)?,
        warnings: page.warnings,
    })
}
