//! # Quotation Layout Engine
//!
//! Places a [`QuotationDocument`] on one A4 page as an ordered list of
//! [`DrawOp`]s. Geometry comes from [`LayoutSpec`]; this module only walks a
//! single cursor `y` down the page and never moves it back up.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  y = H - top_margin                                                     │
//! │     │                                                                   │
//! │     ├── header      title, letterhead, date / number, rule, customer    │
//! │     ├── sales box   shaded strip, border, two dividers, four labels     │
//! │     ├── table       header strip, rows (fit_rows decides the pitch)     │
//! │     │               border + column dividers drawn after the rows       │
//! │     └── trailer     totals, amount in words, signatures                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overflow
//! Rows that do not fit at the natural pitch are compressed proportionally,
//! never below `table.min_rows`. If they still do not fit, every row is
//! drawn anyway and a [`RenderOverflowWarning`] is attached to the page.
//! Layout never fails and never drops content.

pub mod metrics;
pub mod spec;

use serde::{Deserialize, Serialize};
use std::fmt;

use tiles_core::{LineItem, QuotationDocument};

pub use metrics::text_width;
pub use spec::{
    Align, ColumnKey, ColumnSpec, HeaderSpec, LayoutSpec, Letterhead, PageSize, RowMetrics,
    SalesBoxSpec, TableSpec, TrailerSpec,
};

/// Printed for a missing customer or salesman name.
const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Draw Ops
// =============================================================================

/// The standard PDF fonts the layout can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl FontFace {
    /// PostScript name used as `/BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
            FontFace::Courier => "Courier",
        }
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_font())
    }
}

/// RGB color, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::grey(0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    pub const fn grey(level: f64) -> Self {
        Rgb::new(level, level, level)
    }

    pub fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// Outline of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub color: Rgb,
}

/// One drawing instruction. Coordinates are PDF points, origin bottom-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    /// Text with its baseline starting at `(x, y)`.
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        font: FontFace,
        color: Rgb,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        thickness: f64,
        color: Rgb,
    },
    /// Rectangle with `(x, y)` at its lower-left corner.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
}

impl DrawOp {
    /// The string a text op prints.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

// =============================================================================
// Page Model
// =============================================================================

/// Rows needed more height than the page has, even fully compressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderOverflowWarning {
    /// Row height after compression, in points.
    pub required: f64,
    /// Height the rows had to fit into.
    pub available: f64,
    pub rows: usize,
}

impl fmt::Display for RenderOverflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows need {:.1}pt but only {:.1}pt is available",
            self.rows, self.required, self.available
        )
    }
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageModel {
    pub size: PageSize,
    pub ops: Vec<DrawOp>,
    pub columns: Vec<ColumnSpec>,
    /// Row metrics actually used, after any compression.
    pub row_metrics: RowMetrics,
    pub warnings: Vec<RenderOverflowWarning>,
}

impl PageModel {
    /// Every string printed on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(DrawOp::text)
    }

    pub fn is_overflowing(&self) -> bool {
        !self.warnings.is_empty()
    }
}

// =============================================================================
// Cell Placement
// =============================================================================

/// Positions `text` inside `column` on baseline `y`.
pub fn place_cell(
    column: &ColumnSpec,
    text: &str,
    y: f64,
    size: f64,
    font: FontFace,
    color: Rgb,
) -> DrawOp {
    let x = match column.align {
        Align::Left => column.x + column.inset,
        Align::Right => column.right_edge() - column.inset - text_width(text, font, size),
    };
    DrawOp::Text {
        text: text.to_string(),
        x,
        y,
        size,
        font,
        color,
    }
}

/// Cuts a description longer than `limit` characters to `keep` plus "...".
pub fn truncate_description(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(keep).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Picks row metrics that fit `rows` into `available` points.
///
/// Returns the natural metrics when they fit, otherwise metrics scaled down
/// proportionally and floored at `table.min_rows`. The warning is set when
/// even the floored metrics overflow.
pub fn fit_rows(
    table: &TableSpec,
    rows: usize,
    secondary_lines: usize,
    available: f64,
) -> (RowMetrics, Option<RenderOverflowWarning>) {
    let natural = table.rows;
    let required = natural.height_for(rows, secondary_lines);
    if required <= available {
        return (natural, None);
    }

    let scale = (available / required).max(0.0);
    let compressed = RowMetrics {
        pitch: (natural.pitch * scale).max(table.min_rows.pitch),
        secondary_pitch: (natural.secondary_pitch * scale).max(table.min_rows.secondary_pitch),
    };
    let required = compressed.height_for(rows, secondary_lines);
    // Scaling can land a hair above the band through rounding.
    if required <= available + 1e-6 {
        (compressed, None)
    } else {
        (
            compressed,
            Some(RenderOverflowWarning {
                required,
                available: available.max(0.0),
                rows,
            }),
        )
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Lays out a quotation. Pure and deterministic.
pub fn layout_quotation(doc: &QuotationDocument, spec: &LayoutSpec) -> PageModel {
    let mut page = PageBuilder {
        spec,
        ops: Vec::new(),
    };

    let y = spec.page.height - spec.header.top_margin;
    let y = page.header(doc, y);
    let y = page.sales_box(doc, y);
    let (y, row_metrics, warning) = page.table(doc.line_items(), y);
    page.trailer(doc, y);

    PageModel {
        size: spec.page,
        ops: page.ops,
        columns: spec.table.columns.clone(),
        row_metrics,
        warnings: warning.into_iter().collect(),
    }
}

struct PageBuilder<'a> {
    spec: &'a LayoutSpec,
    ops: Vec<DrawOp>,
}

impl PageBuilder<'_> {
    fn text(&mut self, text: &str, x: f64, y: f64, size: f64, font: FontFace) {
        self.text_colored(text, x, y, size, font, Rgb::BLACK);
    }

    fn text_colored(&mut self, text: &str, x: f64, y: f64, size: f64, font: FontFace, color: Rgb) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            size,
            font,
            color,
        });
    }

    /// Text whose right end sits at `right`.
    fn text_right(&mut self, text: &str, right: f64, y: f64, size: f64, font: FontFace) {
        let x = right - text_width(text, font, size);
        self.text(text, x, y, size, font);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, thickness: f64) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            thickness,
            color: Rgb::BLACK,
        });
    }

    fn fill(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill: Some(color),
            stroke: None,
        });
    }

    fn border(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some(Stroke {
                width: line_width,
                color: Rgb::BLACK,
            }),
        });
    }

    fn or_placeholder<'s>(&'s self, value: &'s str) -> &'s str {
        if value.trim().is_empty() {
            &self.spec.placeholder
        } else {
            value
        }
    }

    // -------------------------------------------------------------------------
    // Header
    // -------------------------------------------------------------------------

    fn header(&mut self, doc: &QuotationDocument, top: f64) -> f64 {
        let spec = self.spec;
        let h = &spec.header;
        let width = spec.page.width;
        let margin = spec.margin;

        self.text_colored(
            &spec.letterhead.title,
            width - h.title_inset,
            top,
            h.title_size,
            FontFace::HelveticaBold,
            h.title_color,
        );

        let mut y = top;
        let mut first = true;
        for (b, block) in spec.letterhead.blocks.iter().enumerate() {
            for (i, line) in block.iter().enumerate() {
                if first {
                    self.text(line, margin, y, h.heading_size, FontFace::HelveticaBold);
                    first = false;
                    continue;
                }
                y -= if b > 0 && i == 0 {
                    h.block_gap
                } else if b == 0 && i == 1 {
                    h.heading_gap
                } else {
                    h.line_gap
                };
                self.text(line, margin, y, h.address_size, FontFace::Helvetica);
            }
        }

        let label_x = width - h.field_label_inset;
        let value_right = width - margin;
        let field_y = top - h.field_drop;
        self.text("Date", label_x, field_y, h.field_size, FontFace::Helvetica);
        self.text_right(
            doc.document_date(),
            value_right,
            field_y,
            h.field_size,
            FontFace::Helvetica,
        );
        let field_y = field_y - h.field_step;
        self.text("Quotation No", label_x, field_y, h.field_size, FontFace::Helvetica);
        self.text_right(
            doc.quotation_number(),
            value_right,
            field_y,
            h.field_size,
            FontFace::Helvetica,
        );

        y -= h.rule_gap;
        self.line(margin, y, width - margin, y, h.rule_thickness);

        let header = doc.header();
        y -= h.customer_gap;
        self.text("Customer", margin, y, h.customer_size, FontFace::HelveticaBold);
        y -= h.customer_name_gap;
        let name = if header.customer_name.trim().is_empty() {
            NOT_AVAILABLE
        } else {
            header.customer_name.as_str()
        };
        self.text(name, margin, y, h.customer_size, FontFace::HelveticaBold);
        y -= h.customer_phone_gap;
        let phone = self.or_placeholder(&header.contact_number).to_string();
        self.text(&phone, margin, y, h.customer_size, FontFace::Helvetica);

        y - h.customer_after
    }

    // -------------------------------------------------------------------------
    // Sales Person Box
    // -------------------------------------------------------------------------

    fn sales_box(&mut self, doc: &QuotationDocument, y: f64) -> f64 {
        let spec = self.spec;
        let sb = &spec.sales_box;
        let margin = spec.margin;
        let width = spec.page.width;
        let box_width = spec.content_width();
        let middle = width / 2.0;
        let quarter = box_width / 4.0;

        self.fill(margin, y - sb.strip_height, box_width, sb.strip_height, sb.strip_color);
        self.border(margin, y - sb.height, box_width, sb.height, sb.border_width);
        self.line(middle, y, middle, y - sb.height, sb.border_width);
        self.line(
            margin,
            y - sb.strip_height,
            width - margin,
            y - sb.strip_height,
            sb.border_width,
        );

        let label_y = y - sb.label_drop;
        self.text(
            "Sales Person",
            margin + quarter - sb.label_backoff,
            label_y,
            sb.label_size,
            FontFace::HelveticaBold,
        );
        self.text(
            "Contact No",
            middle + quarter - sb.label_backoff,
            label_y,
            sb.label_size,
            FontFace::HelveticaBold,
        );

        let header = doc.header();
        let salesman = header
            .salesman_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_string();
        let contact = self
            .or_placeholder(header.salesman_contact.as_deref().unwrap_or_default())
            .to_string();
        let value_y = y - sb.value_drop;
        self.text(
            &salesman,
            margin + quarter - sb.value_backoff,
            value_y,
            sb.label_size,
            FontFace::Helvetica,
        );
        self.text(
            &contact,
            middle + quarter - sb.value_backoff,
            value_y,
            sb.label_size,
            FontFace::Helvetica,
        );

        y - sb.after
    }

    // -------------------------------------------------------------------------
    // Item Table
    // -------------------------------------------------------------------------

    fn table(
        &mut self,
        items: &[LineItem],
        table_top: f64,
    ) -> (f64, RowMetrics, Option<RenderOverflowWarning>) {
        let spec = self.spec;
        let t = &spec.table;
        let margin = spec.margin;
        let box_width = spec.content_width();
        let header_bottom = table_top - t.header_height;

        self.fill(margin, header_bottom, box_width, t.header_height, t.header_color);
        for column in &t.columns {
            self.text(
                &column.title,
                column.x + column.header_inset,
                table_top - t.header_text_drop,
                t.header_size,
                FontFace::HelveticaBold,
            );
        }
        self.border(margin, header_bottom, box_width, t.header_height, t.border_width);

        let mut y = table_top - t.first_row_drop;
        let secondary_lines = items
            .iter()
            .filter(|item| item.long_description().is_some())
            .count();
        let available = y - t.bottom_padding - spec.trailer.height() - spec.trailer.bottom_margin;
        let (metrics, warning) = fit_rows(t, items.len(), secondary_lines, available);

        for (index, item) in items.iter().enumerate() {
            for column in &t.columns {
                let text = self.cell_text(column.key, index, item);
                self.ops
                    .push(place_cell(column, &text, y, t.row_size, FontFace::Helvetica, Rgb::BLACK));
            }
            if let Some(long) = item.long_description() {
                y -= metrics.secondary_pitch;
                let x = t
                    .column(ColumnKey::Product)
                    .map(|c| c.x + c.inset)
                    .unwrap_or(margin);
                self.text_colored(
                    long,
                    x,
                    y,
                    t.secondary_size,
                    FontFace::Helvetica,
                    t.secondary_color,
                );
            }
            y -= metrics.pitch;
        }

        y -= t.bottom_padding;
        let table_bottom = y;
        self.border(
            margin,
            table_bottom,
            box_width,
            header_bottom - table_bottom,
            t.border_width,
        );
        for column in t.columns.iter().skip(1) {
            let x = column.x - t.divider_offset;
            self.line(x, header_bottom, x, table_bottom, t.border_width);
        }

        (table_bottom, metrics, warning)
    }

    fn cell_text(&self, key: ColumnKey, index: usize, item: &LineItem) -> String {
        let t = &self.spec.table;
        match key {
            ColumnKey::Serial => (index + 1).to_string(),
            ColumnKey::Product => {
                let description = self.or_placeholder(item.description());
                truncate_description(description, t.description_limit, t.description_keep)
            }
            ColumnKey::Packing => {
                let packing = item.packing_factor();
                if packing.is_finite() {
                    packing.to_string()
                } else {
                    self.spec.placeholder.clone()
                }
            }
            ColumnKey::Boxes => item.box_count().to_string(),
            ColumnKey::Pieces => item.piece_count().to_string(),
            ColumnKey::Quantity => item.quantity().to_string(),
            ColumnKey::Uom => item.uom().unwrap_or(self.spec.default_uom.as_str()).to_string(),
            ColumnKey::Rate => item.unit_price().to_fixed_2(),
            ColumnKey::Discount => format!("{:.2}", item.discount_percent()),
            ColumnKey::Amount => item.line_amount().format_grouped(),
        }
    }

    // -------------------------------------------------------------------------
    // Totals, Words, Signatures
    // -------------------------------------------------------------------------

    fn trailer(&mut self, doc: &QuotationDocument, table_bottom: f64) {
        let spec = self.spec;
        let tr = &spec.trailer;
        let width = spec.page.width;
        let totals = doc.totals();
        let value_right = spec
            .table
            .column(ColumnKey::Amount)
            .map(|c| c.right_edge() - c.inset)
            .unwrap_or(width - spec.margin);

        let mut y = table_bottom - tr.totals_gap;
        self.text("Sub-total", tr.label_x, y, tr.size, FontFace::HelveticaBold);
        self.text_right(
            &totals.subtotal.format_grouped(),
            value_right,
            y,
            tr.size,
            FontFace::Helvetica,
        );

        y -= tr.step;
        self.text("Discount", tr.label_x, y, tr.size, FontFace::HelveticaBold);
        self.text_right(
            &totals.header_discount.format_grouped(),
            value_right,
            y,
            tr.size,
            FontFace::Helvetica,
        );

        y -= tr.step;
        self.text(
            &tr.total_label,
            tr.total_label_x,
            y,
            tr.total_size,
            FontFace::HelveticaBold,
        );
        self.text_right(
            &totals.grand_total.format_grouped(),
            value_right,
            y,
            tr.total_size,
            FontFace::HelveticaBold,
        );

        y -= tr.words_gap;
        let words = format!("Amount in words: {}", doc.amount_in_words());
        self.text(&words, spec.margin, y, tr.words_size, FontFace::Helvetica);

        y -= tr.signature_gap;
        let sig_y = y;
        let line_y = sig_y - tr.line_drop;
        let caption_y = sig_y - tr.caption_drop;

        self.text(
            doc.prepared_by(),
            tr.signatory_x,
            sig_y,
            tr.signatory_size,
            FontFace::Helvetica,
        );
        self.line(tr.line_x, line_y, tr.line_x + tr.line_length, line_y, 1.0);
        self.text("Prepared By", tr.signatory_x, caption_y, tr.caption_size, FontFace::Helvetica);

        let approver_x = width - tr.approver_line_inset;
        self.line(approver_x, line_y, approver_x + tr.line_length, line_y, 1.0);
        self.text(
            "Approved By",
            width - tr.approver_inset,
            caption_y,
            tr.caption_size,
            FontFace::Helvetica,
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tiles_core::{aggregate, price_line, DocumentModelBuilder, LineInput, Money, OrderHeader};

    fn item(description: &str, long: Option<&str>) -> LineItem {
        price_line(LineInput {
            stock_id: "803-1333".to_string(),
            description: description.to_string(),
            long_description: long.map(str::to_string),
            uom: None,
            box_count: 2,
            piece_count: 3,
            packing_factor: 10.0,
            unit_price: Money::from_rupees(500),
            discount_per_unit: Money::zero(),
        })
    }

    fn document(items: Vec<LineItem>) -> QuotationDocument {
        let header = OrderHeader {
            trans_no: Some("1042".to_string()),
            salesman_name: Some("Usman".to_string()),
            ..OrderHeader::for_customer("Ali Traders")
        };
        let totals = aggregate(&items, Money::zero()).unwrap();
        let issued_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        DocumentModelBuilder::new(issued_at)
            .build(header, items, totals)
            .unwrap()
    }

    fn find_text<'a>(page: &'a PageModel, needle: &str) -> &'a DrawOp {
        page.ops
            .iter()
            .find(|op| op.text() == Some(needle))
            .unwrap_or_else(|| panic!("{needle:?} not on page"))
    }

    fn position(op: &DrawOp) -> (f64, f64, f64, FontFace) {
        match op {
            DrawOp::Text {
                x, y, size, font, ..
            } => (*x, *y, *size, *font),
            other => panic!("not text: {other:?}"),
        }
    }

    #[test]
    fn test_header_content() {
        let doc = document(vec![item("Glossy Tile 12x12", None)]);
        let page = layout_quotation(&doc, &LayoutSpec::standard());
        let texts: Vec<&str> = page.texts().collect();
        for expected in [
            "SALES QUOTATION",
            "WAREHOUSE I-9:",
            "ROAD, RAWALPINDI. 051-3757525",
            "Date",
            "01/05/2024",
            "Quotation No",
            "1042",
            "Customer",
            "Ali Traders",
            "Sales Person",
            "Usman",
            "Contact No",
            "Sr.",
            "Amount",
            "Sub-total",
            "QUOTATION TOTAL",
            "Amount in words: Twenty Five Thousand Only",
            "Prepared By",
            "Approved By",
        ] {
            assert!(texts.contains(&expected), "missing {expected:?}");
        }

        let (x, y, size, font) = position(find_text(&page, "SALES QUOTATION"));
        assert!((x - 345.28).abs() < 1e-9);
        assert!((y - 791.89).abs() < 1e-9);
        assert_eq!(size, 20.0);
        assert_eq!(font, FontFace::HelveticaBold);
    }

    #[test]
    fn test_first_row_and_amount_alignment() {
        let doc = document(vec![item("Glossy Tile 12x12", None)]);
        let page = layout_quotation(&doc, &LayoutSpec::standard());

        let (x, y, _, _) = position(find_text(&page, "Glossy Tile 12x12"));
        assert_eq!(x, 75.0);
        assert!((y - 587.89).abs() < 1e-9);

        // The row amount comes before the totals and ends 5pt inside the
        // Amount column.
        let (x, _, size, font) = position(find_text(&page, "25,000.00"));
        assert_eq!(font, FontFace::Helvetica);
        assert!((x + text_width("25,000.00", font, size) - 540.0).abs() < 1e-9);

        let grand_total = page
            .ops
            .iter()
            .filter(|op| op.text() == Some("25,000.00"))
            .last()
            .map(position)
            .unwrap();
        assert_eq!(grand_total.3, FontFace::HelveticaBold);
        assert!((grand_total.0 + text_width("25,000.00", grand_total.3, 9.0) - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_values_use_placeholders() {
        let items = vec![item("", None)];
        let totals = aggregate(&items, Money::zero()).unwrap();
        let issued_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let doc = DocumentModelBuilder::new(issued_at)
            .build(OrderHeader::default(), items, totals)
            .unwrap();
        let page = layout_quotation(&doc, &LayoutSpec::standard());
        let texts: Vec<&str> = page.texts().collect();

        assert_eq!(texts.iter().filter(|t| **t == NOT_AVAILABLE).count(), 2);
        assert!(texts.contains(&"-"));
        assert!(texts.contains(&"sqm"));
    }

    #[test]
    fn test_description_truncation() {
        let long = "Porcelain Floor Tile Carrara White 60x60 Matt";
        assert_eq!(
            truncate_description(long, 35, 32),
            "Porcelain Floor Tile Carrara Whi..."
        );
        assert_eq!(truncate_description("Short", 35, 32), "Short");

        let page = layout_quotation(&document(vec![item(long, None)]), &LayoutSpec::standard());
        assert!(page.texts().any(|t| t == "Porcelain Floor Tile Carrara Whi..."));
    }

    #[test]
    fn test_long_description_line() {
        let page = layout_quotation(
            &document(vec![item("Glossy Tile", Some("Rectified edge, 9mm"))]),
            &LayoutSpec::standard(),
        );
        match find_text(&page, "Rectified edge, 9mm") {
            DrawOp::Text {
                x,
                y,
                size,
                color,
                ..
            } => {
                assert_eq!(*x, 75.0);
                assert!((y - 577.89).abs() < 1e-9);
                assert_eq!(*size, 7.0);
                assert_eq!(*color, Rgb::grey(0.4));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_table_frame_and_dividers() {
        let page = layout_quotation(
            &document(vec![item("A", None), item("B", None)]),
            &LayoutSpec::standard(),
        );
        let header_bottom = 612.89 - 15.0;
        // Two rows of 12pt from 587.89, then 5pt padding.
        let table_bottom = 587.89 - 24.0 - 5.0;

        let dividers: Vec<f64> = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { x1, y1, x2, y2, .. }
                    if x1 == x2
                        && (y1 - header_bottom).abs() < 1e-9
                        && (y2 - table_bottom).abs() < 1e-9 =>
                {
                    Some(*x1)
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            dividers,
            vec![73.0, 238.0, 278.0, 308.0, 338.0, 378.0, 408.0, 448.0, 488.0]
        );
    }

    #[test]
    fn test_fit_rows_compresses_then_warns() {
        let table = TableSpec::default();

        let (metrics, warning) = fit_rows(&table, 10, 0, 433.89);
        assert_eq!(metrics, table.rows);
        assert!(warning.is_none());

        let (metrics, warning) = fit_rows(&table, 40, 0, 433.89);
        assert!(metrics.pitch < 12.0 && metrics.pitch >= 9.0);
        assert!(warning.is_none());

        let (metrics, warning) = fit_rows(&table, 80, 0, 433.89);
        assert_eq!(metrics.pitch, 9.0);
        let warning = warning.unwrap();
        assert_eq!(warning.rows, 80);
        assert_eq!(warning.required, 720.0);
    }

    #[test]
    fn test_overflowing_page_keeps_every_row() {
        let items: Vec<LineItem> = (0..80).map(|i| item(&format!("Tile {i}"), None)).collect();
        let page = layout_quotation(&document(items), &LayoutSpec::standard());

        assert!(page.is_overflowing());
        assert!(page.texts().any(|t| t == "Tile 0"));
        assert!(page.texts().any(|t| t == "Tile 79"));
        assert_eq!(page.row_metrics.pitch, 9.0);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let doc = document(vec![item("Glossy Tile", Some("Rectified"))]);
        let spec = LayoutSpec::standard();
        assert_eq!(layout_quotation(&doc, &spec), layout_quotation(&doc, &spec));
    }

    #[test]
    fn test_place_cell_alignment() {
        let left = &TableSpec::default().columns[2];
        match place_cell(left, "10", 100.0, 8.0, FontFace::Helvetica, Rgb::BLACK) {
            DrawOp::Text { x, .. } => assert_eq!(x, 245.0),
            _ => unreachable!(),
        }
    }
}
