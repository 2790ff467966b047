//! # Layout Specification
//!
//! Every coordinate the layout engine uses lives here as data. Defaults
//! reproduce the printed quotation the shop has always issued.
//!
//! ## Page Map (A4, origin bottom-left, points)
//! ```text
//!  50                                        W-250        W-200     W-50
//!  ┌──────────────────────────────────────────────────────────────────┐
//!  │ WAREHOUSE I-9:                          SALES QUOTATION          │ H-50
//!  │ address lines ...                                Date  01/05/24  │
//!  │                                           Quotation No     1042  │
//!  │ ──────────────────────────────────────────────────────────────── │ rule
//!  │ Customer / name / phone                                          │
//!  │ ┌───────────────────────────┬───────────────────────────┐        │
//!  │ │        Sales Person       │        Contact No         │        │ box
//!  │ ├───────────────────────────┼───────────────────────────┤        │
//!  │ │ name                      │ contact                   │        │
//!  │ └───────────────────────────┴───────────────────────────┘        │
//!  │ ┌──┬────────────┬───┬──┬──┬───┬──┬───┬───┬─────┐                 │
//!  │ │Sr│ Product    │Pkg│Bx│Pc│Qty│Uo│Rte│Dsc│ Amt │  header strip   │
//!  │ │ 1│ ...        │   │  │  │   │  │   │   │     │  rows           │
//!  │ └──┴────────────┴───┴──┴──┴───┴──┴───┴───┴─────┘                 │
//!  │                               Sub-total / Discount / TOTAL       │
//!  │ Amount in words: ...                                             │
//!  │   ________                                    ________           │
//!  │   Prepared By                                 Approved By        │
//!  └──────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use super::Rgb;

// =============================================================================
// Page
// =============================================================================

/// Page size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

// =============================================================================
// Letterhead
// =============================================================================

/// Company identity printed at the top of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Letterhead {
    /// Large grey title on the right.
    pub title: String,
    /// Address blocks on the left. The first line of the first block is the
    /// bold heading.
    pub blocks: Vec<Vec<String>>,
}

impl Default for Letterhead {
    fn default() -> Self {
        Letterhead {
            title: "SALES QUOTATION".to_string(),
            blocks: vec![
                vec![
                    "WAREHOUSE I-9:".to_string(),
                    "PLOT NO 231-232, ST NO. 7, I-9/2, ISLAMABAD.".to_string(),
                    "(7) 051-6133238, (8) 051-6130686, (9) 051-2751461".to_string(),
                ],
                vec![
                    "T.CHOWK: 1 KM-TCHOWK, NEAR NOOR MAHAL MARQUEE, GT".to_string(),
                    "ROAD, RAWALPINDI. 051-3757525".to_string(),
                ],
            ],
        }
    }
}

// =============================================================================
// Header Block
// =============================================================================

/// Title, letterhead, date fields, rule line and customer block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSpec {
    /// Distance from the page top to the first baseline.
    pub top_margin: f64,
    /// Title x, measured from the right page edge.
    pub title_inset: f64,
    pub title_size: f64,
    pub title_color: Rgb,
    pub heading_size: f64,
    pub address_size: f64,
    /// Step from the bold heading to the first address line.
    pub heading_gap: f64,
    /// Step between address lines of one block.
    pub line_gap: f64,
    /// Step between address blocks.
    pub block_gap: f64,
    /// Date/number labels x, measured from the right page edge.
    pub field_label_inset: f64,
    /// First field baseline, measured down from the first baseline.
    pub field_drop: f64,
    pub field_size: f64,
    pub field_step: f64,
    pub rule_gap: f64,
    pub rule_thickness: f64,
    pub customer_gap: f64,
    pub customer_size: f64,
    pub customer_name_gap: f64,
    pub customer_phone_gap: f64,
    pub customer_after: f64,
}

impl Default for HeaderSpec {
    fn default() -> Self {
        HeaderSpec {
            top_margin: 50.0,
            title_inset: 250.0,
            title_size: 20.0,
            title_color: Rgb::grey(0.6),
            heading_size: 10.0,
            address_size: 8.0,
            heading_gap: 12.0,
            line_gap: 10.0,
            block_gap: 20.0,
            field_label_inset: 200.0,
            field_drop: 22.0,
            field_size: 9.0,
            field_step: 12.0,
            rule_gap: 20.0,
            rule_thickness: 1.5,
            customer_gap: 15.0,
            customer_size: 10.0,
            customer_name_gap: 15.0,
            customer_phone_gap: 12.0,
            customer_after: 25.0,
        }
    }
}

// =============================================================================
// Sales Person Box
// =============================================================================

/// Two-cell "Sales Person / Contact No" box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesBoxSpec {
    pub height: f64,
    pub strip_height: f64,
    pub strip_color: Rgb,
    pub border_width: f64,
    pub label_size: f64,
    /// Label baseline below the box top.
    pub label_drop: f64,
    /// Value baseline below the box top.
    pub value_drop: f64,
    /// Label x back-off from the quarter point of each cell.
    pub label_backoff: f64,
    pub value_backoff: f64,
    pub after: f64,
}

impl Default for SalesBoxSpec {
    fn default() -> Self {
        SalesBoxSpec {
            height: 25.0,
            strip_height: 12.0,
            strip_color: Rgb::grey(0.85),
            border_width: 1.0,
            label_size: 9.0,
            label_drop: 9.0,
            value_drop: 22.0,
            label_backoff: 25.0,
            value_backoff: 30.0,
            after: 40.0,
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// What a table column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    Serial,
    Product,
    Packing,
    Boxes,
    Pieces,
    Quantity,
    Uom,
    Rate,
    Discount,
    Amount,
}

/// Horizontal text alignment inside a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// One table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: ColumnKey,
    pub title: String,
    /// Left edge.
    pub x: f64,
    pub width: f64,
    pub align: Align,
    /// Inset from the aligned edge for cell text.
    pub inset: f64,
    /// Inset from the left edge for the header title.
    pub header_inset: f64,
}

impl ColumnSpec {
    fn new(key: ColumnKey, title: &str, x: f64, width: f64, inset: f64, header_inset: f64) -> Self {
        ColumnSpec {
            key,
            title: title.to_string(),
            x,
            width,
            align: Align::Left,
            inset,
            header_inset,
        }
    }

    fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    /// Right edge.
    pub fn right_edge(&self) -> f64 {
        self.x + self.width
    }
}

/// Vertical metrics for item rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowMetrics {
    /// Baseline-to-baseline step between rows.
    pub pitch: f64,
    /// Extra step taken before a long-description line.
    pub secondary_pitch: f64,
}

impl RowMetrics {
    /// Height a set of rows occupies.
    pub fn height_for(&self, rows: usize, secondary_lines: usize) -> f64 {
        rows as f64 * self.pitch + secondary_lines as f64 * self.secondary_pitch
    }
}

/// Item table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    pub columns: Vec<ColumnSpec>,
    pub header_height: f64,
    pub header_color: Rgb,
    /// Header title baseline below the table top.
    pub header_text_drop: f64,
    pub header_size: f64,
    /// First row baseline below the table top.
    pub first_row_drop: f64,
    pub row_size: f64,
    pub secondary_size: f64,
    pub secondary_color: Rgb,
    pub rows: RowMetrics,
    /// Tightest pitch the overflow policy may compress to.
    pub min_rows: RowMetrics,
    /// Space between the last row and the table border.
    pub bottom_padding: f64,
    /// Dividers sit this far left of each column edge.
    pub divider_offset: f64,
    pub border_width: f64,
    /// Descriptions longer than this are cut.
    pub description_limit: usize,
    /// Characters kept from a cut description, before the ellipsis.
    pub description_keep: usize,
}

impl Default for TableSpec {
    fn default() -> Self {
        TableSpec {
            columns: vec![
                ColumnSpec::new(ColumnKey::Serial, "Sr.", 50.0, 25.0, 2.0, 0.0),
                ColumnSpec::new(ColumnKey::Product, "Product", 75.0, 165.0, 0.0, 0.0),
                ColumnSpec::new(ColumnKey::Packing, "Packing", 240.0, 40.0, 5.0, 2.0),
                ColumnSpec::new(ColumnKey::Boxes, "Box", 280.0, 30.0, 5.0, 2.0),
                ColumnSpec::new(ColumnKey::Pieces, "Pc", 310.0, 30.0, 5.0, 2.0),
                ColumnSpec::new(ColumnKey::Quantity, "Qty", 340.0, 40.0, 5.0, 2.0),
                ColumnSpec::new(ColumnKey::Uom, "Uom", 380.0, 30.0, 5.0, 2.0),
                ColumnSpec::new(ColumnKey::Rate, "Rate", 410.0, 40.0, 0.0, 2.0),
                ColumnSpec::new(ColumnKey::Discount, "Disc", 450.0, 40.0, 5.0, 2.0),
                ColumnSpec::new(ColumnKey::Amount, "Amount", 490.0, 55.0, 5.0, 12.0).right(),
            ],
            header_height: 15.0,
            header_color: Rgb::grey(0.85),
            header_text_drop: 11.0,
            header_size: 8.0,
            first_row_drop: 25.0,
            row_size: 8.0,
            secondary_size: 7.0,
            secondary_color: Rgb::grey(0.4),
            rows: RowMetrics {
                pitch: 12.0,
                secondary_pitch: 10.0,
            },
            min_rows: RowMetrics {
                pitch: 9.0,
                secondary_pitch: 8.0,
            },
            bottom_padding: 5.0,
            divider_offset: 2.0,
            border_width: 1.0,
            description_limit: 35,
            description_keep: 32,
        }
    }
}

impl TableSpec {
    /// The column showing `key`, if the table has one.
    pub fn column(&self, key: ColumnKey) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.key == key)
    }
}

// =============================================================================
// Trailer
// =============================================================================

/// Totals, amount in words and signatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailerSpec {
    pub totals_gap: f64,
    pub label_x: f64,
    pub total_label_x: f64,
    pub step: f64,
    pub size: f64,
    pub total_size: f64,
    pub total_label: String,
    pub words_gap: f64,
    pub words_size: f64,
    pub signature_gap: f64,
    pub signatory_x: f64,
    pub signatory_size: f64,
    /// Signature line length.
    pub line_length: f64,
    /// Left signature line start.
    pub line_x: f64,
    /// Right signature line start, measured from the right page edge.
    pub approver_line_inset: f64,
    /// "Approved By" x, measured from the right page edge.
    pub approver_inset: f64,
    pub line_drop: f64,
    pub caption_drop: f64,
    pub caption_size: f64,
    /// Lowest baseline allowed on the page.
    pub bottom_margin: f64,
}

impl Default for TrailerSpec {
    fn default() -> Self {
        TrailerSpec {
            totals_gap: 20.0,
            label_x: 400.0,
            total_label_x: 380.0,
            step: 12.0,
            size: 8.0,
            total_size: 9.0,
            total_label: "QUOTATION TOTAL".to_string(),
            words_gap: 20.0,
            words_size: 8.0,
            signature_gap: 40.0,
            signatory_x: 100.0,
            signatory_size: 10.0,
            line_length: 100.0,
            line_x: 80.0,
            approver_line_inset: 180.0,
            approver_inset: 160.0,
            line_drop: 5.0,
            caption_drop: 15.0,
            caption_size: 8.0,
            bottom_margin: 30.0,
        }
    }
}

impl TrailerSpec {
    /// Height from the table bottom to the lowest signature caption.
    pub fn height(&self) -> f64 {
        self.totals_gap + 2.0 * self.step + self.words_gap + self.signature_gap + self.caption_drop
    }
}

// =============================================================================
// Layout Spec
// =============================================================================

/// The complete quotation layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub page: PageSize,
    /// Left and right page margin.
    pub margin: f64,
    pub letterhead: Letterhead,
    pub header: HeaderSpec,
    pub sales_box: SalesBoxSpec,
    pub table: TableSpec,
    pub trailer: TrailerSpec,
    /// Unit printed when a line has none.
    pub default_uom: String,
    /// Printed in place of a missing value.
    pub placeholder: String,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        LayoutSpec {
            page: PageSize::A4,
            margin: 50.0,
            letterhead: Letterhead::default(),
            header: HeaderSpec::default(),
            sales_box: SalesBoxSpec::default(),
            table: TableSpec::default(),
            trailer: TrailerSpec::default(),
            default_uom: tiles_core::DEFAULT_UOM.to_string(),
            placeholder: "-".to_string(),
        }
    }
}

impl LayoutSpec {
    /// The shop's standard quotation.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Replaces the letterhead.
    pub fn with_letterhead(mut self, letterhead: Letterhead) -> Self {
        self.letterhead = letterhead;
        self
    }

    /// Usable width between the margins.
    pub fn content_width(&self) -> f64 {
        self.page.width - 2.0 * self.margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_columns() {
        let spec = LayoutSpec::standard();
        let xs: Vec<f64> = spec.table.columns.iter().map(|c| c.x).collect();
        assert_eq!(
            xs,
            vec![50.0, 75.0, 240.0, 280.0, 310.0, 340.0, 380.0, 410.0, 450.0, 490.0]
        );
        let amount = spec.table.column(ColumnKey::Amount).unwrap();
        assert_eq!(amount.align, Align::Right);
        assert_eq!(amount.right_edge(), 545.0);
        assert!((spec.content_width() - 495.28).abs() < 1e-9);
    }

    #[test]
    fn test_trailer_height() {
        let trailer = TrailerSpec::default();
        assert_eq!(trailer.height(), 119.0);
    }

    #[test]
    fn test_row_height() {
        let rows = TableSpec::default().rows;
        assert_eq!(rows.height_for(3, 1), 46.0);
    }
}
