//! # Quotation Document Model
//!
//! Assembles header, priced lines and totals into the immutable
//! [`QuotationDocument`] that the renderer lays out.
//!
//! ## Quotation Number
//! ```text
//! header.trans_no ──► header.reference ──► "Q" + yyyymmddHHMMSSmmm
//!    (saved doc)         (draft ref)          (synthesized)
//! ```
//! The synthesized number is only as unique as the millisecond clock that
//! produced `issued_at`. Two drafts built in the same millisecond collide.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::aggregate::OrderTotals;
use crate::pricing::LineItem;
use crate::types::OrderHeader;
use crate::validation::{validate_document_not_empty, ValidationResult};
use crate::words::amount_in_words;

/// Everything printed on one quotation. Built fresh per render call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotationDocument {
    header: OrderHeader,
    line_items: Vec<LineItem>,
    totals: OrderTotals,
    amount_in_words: String,
    quotation_number: String,
    prepared_by: String,
    document_date: String,
}

impl QuotationDocument {
    pub fn header(&self) -> &OrderHeader {
        &self.header
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    pub fn amount_in_words(&self) -> &str {
        &self.amount_in_words
    }

    pub fn quotation_number(&self) -> &str {
        &self.quotation_number
    }

    pub fn prepared_by(&self) -> &str {
        &self.prepared_by
    }

    /// Date printed in the header, `dd/mm/yyyy`.
    pub fn document_date(&self) -> &str {
        &self.document_date
    }
}

/// Builds [`QuotationDocument`]s.
///
/// The builder holds only the issue time and an optional default signatory,
/// so one instance can be reused for any number of documents.
#[derive(Debug, Clone)]
pub struct DocumentModelBuilder {
    issued_at: NaiveDateTime,
    default_prepared_by: Option<String>,
}

impl DocumentModelBuilder {
    /// `issued_at` is the local time the document is produced.
    pub fn new(issued_at: NaiveDateTime) -> Self {
        DocumentModelBuilder {
            issued_at,
            default_prepared_by: None,
        }
    }

    /// Name printed above "Prepared By" when the header does not carry one.
    pub fn default_prepared_by(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.default_prepared_by = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
        self
    }

    /// Assembles the document.
    ///
    /// ## Errors
    /// `ValidationError::EmptyDocument` when there are no line items.
    pub fn build(
        &self,
        header: OrderHeader,
        line_items: Vec<LineItem>,
        totals: OrderTotals,
    ) -> ValidationResult<QuotationDocument> {
        validate_document_not_empty(line_items.len())?;

        let quotation_number = header
            .document_number()
            .map(str::to_string)
            .unwrap_or_else(|| self.synthesize_number());

        let prepared_by = header
            .prepared_by
            .clone()
            .or_else(|| self.default_prepared_by.clone())
            .or_else(|| header.salesman_name.clone())
            .unwrap_or_else(|| "-".to_string());

        let document_date = header
            .transaction_date
            .unwrap_or_else(|| self.issued_at.date())
            .format("%d/%m/%Y")
            .to_string();

        Ok(QuotationDocument {
            amount_in_words: amount_in_words(totals.grand_total),
            header,
            line_items,
            totals,
            quotation_number,
            prepared_by,
            document_date,
        })
    }

    fn synthesize_number(&self) -> String {
        format!("Q{}", self.issued_at.format("%Y%m%d%H%M%S%3f"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::pricing::{price_line, LineInput};
    use chrono::NaiveDate;

    fn issued_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_milli_opt(9, 30, 15, 42)
            .unwrap()
    }

    fn lines() -> Vec<LineItem> {
        vec![price_line(LineInput {
            stock_id: "803-1333".to_string(),
            description: "Glossy Tile 12x12".to_string(),
            long_description: None,
            uom: None,
            box_count: 2,
            piece_count: 3,
            packing_factor: 10.0,
            unit_price: Money::from_rupees(500),
            discount_per_unit: Money::zero(),
        })]
    }

    #[test]
    fn test_build_with_trans_no() {
        let header = OrderHeader {
            trans_no: Some("1042".to_string()),
            reference: Some("QT-9".to_string()),
            ..OrderHeader::for_customer("Ali Traders")
        };
        let lines = lines();
        let totals = aggregate(&lines, Money::zero()).unwrap();

        let doc = DocumentModelBuilder::new(issued_at())
            .build(header, lines, totals)
            .unwrap();

        assert_eq!(doc.quotation_number(), "1042");
        assert_eq!(doc.amount_in_words(), "Twenty Five Thousand Only");
        assert_eq!(doc.document_date(), "01/05/2024");
        assert_eq!(doc.prepared_by(), "-");
        assert_eq!(doc.line_items().len(), 1);
    }

    #[test]
    fn test_synthesized_number_and_signatory() {
        let header = OrderHeader {
            salesman_name: Some("Usman".to_string()),
            ..OrderHeader::for_customer("Ali Traders")
        };
        let lines = lines();
        let totals = aggregate(&lines, Money::zero()).unwrap();

        let builder = DocumentModelBuilder::new(issued_at());
        let doc = builder.build(header.clone(), lines.clone(), totals).unwrap();
        assert_eq!(doc.quotation_number(), "Q20240501093015042");
        assert_eq!(doc.prepared_by(), "Usman");

        let doc = builder
            .default_prepared_by("Sales Desk")
            .build(header, lines, totals)
            .unwrap();
        assert_eq!(doc.prepared_by(), "Sales Desk");
    }

    #[test]
    fn test_empty_document() {
        let result = DocumentModelBuilder::new(issued_at()).build(
            OrderHeader::default(),
            Vec::new(),
            OrderTotals::default(),
        );
        assert_eq!(result.unwrap_err(), ValidationError::EmptyDocument);
    }
}
