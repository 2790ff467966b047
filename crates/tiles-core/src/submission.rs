//! # Submission Record
//!
//! Maps a priced cart onto the multipart fields the order endpoint expects.
//!
//! ## Field Mapping
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────┐
//! │ form field           │ source                                       │
//! ├──────────────────────┼──────────────────────────────────────────────┤
//! │ party_name           │ header.customer_name                         │
//! │ function_date        │ header.transaction_date (or today) YYYY-MM-DD│
//! │ contact_no           │ header.contact_number                        │
//! │ venue                │ header.venue                                 │
//! │ total                │ totals.grand_total, "25000.00"               │
//! │ so_advance           │ header.advance_amount, "0.00"                │
//! │ user_id              │ header.salesman_id                           │
//! │ sales_order_details  │ JSON array of priced lines                   │
//! │ bank_id              │ header.bank_id                               │
//! │ update_id            │ header.update_id                             │
//! │ comments             │ header.comments                              │
//! │ discount1            │ totals.header_discount                       │
//! │ f_time               │ submission time, "3:04:05 PM"                │
//! │ order_type           │ header.order_type                            │
//! │ trans_type           │ 32 quotation / 30 order                      │
//! └──────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Transport is not done here; the app posts [`SubmissionPayload::form_fields`].

use chrono::NaiveDateTime;
use serde::Serialize;
use ts_rs::TS;

use crate::aggregate::OrderTotals;
use crate::error::CoreResult;
use crate::pricing::LineItem;
use crate::types::OrderHeader;
use crate::validation::validate_cart_not_empty;
use crate::DEFAULT_UOM;

/// One entry of `sales_order_details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionLine {
    pub stock_id: String,
    pub description: String,
    #[serde(rename = "box")]
    pub box_count: i64,
    pub pec: i64,
    pub packing: f64,
    pub quantity: f64,
    pub unit_price: String,
    /// Per-unit discount amount, as entered.
    pub text1: String,
    pub discount_percent: String,
    pub amount: String,
    pub uom: String,
}

impl From<&LineItem> for SubmissionLine {
    fn from(item: &LineItem) -> Self {
        SubmissionLine {
            stock_id: item.stock_id().to_string(),
            description: item.description().to_string(),
            box_count: item.box_count(),
            pec: item.piece_count(),
            packing: item.packing_factor(),
            quantity: item.quantity().units(),
            unit_price: item.unit_price().to_fixed_2(),
            text1: item.discount_per_unit().to_fixed_2(),
            discount_percent: format!("{:.2}", item.discount_percent()),
            amount: item.line_amount().to_fixed_2(),
            uom: item.uom().unwrap_or(DEFAULT_UOM).to_string(),
        }
    }
}

/// The order/quotation submission record.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SubmissionPayload {
    pub party_name: String,
    pub function_date: String,
    pub contact_no: String,
    pub venue: String,
    pub total: String,
    pub so_advance: String,
    pub user_id: String,
    pub sales_order_details: String,
    pub bank_id: String,
    pub update_id: String,
    pub comments: String,
    pub discount1: String,
    pub f_time: String,
    pub order_type: String,
    pub trans_type: u32,
}

impl SubmissionPayload {
    /// Multipart form fields in the order the endpoint documents them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("party_name", self.party_name.clone()),
            ("function_date", self.function_date.clone()),
            ("contact_no", self.contact_no.clone()),
            ("venue", self.venue.clone()),
            ("total", self.total.clone()),
            ("so_advance", self.so_advance.clone()),
            ("user_id", self.user_id.clone()),
            ("sales_order_details", self.sales_order_details.clone()),
            ("bank_id", self.bank_id.clone()),
            ("update_id", self.update_id.clone()),
            ("comments", self.comments.clone()),
            ("discount1", self.discount1.clone()),
            ("f_time", self.f_time.clone()),
            ("order_type", self.order_type.clone()),
            ("trans_type", self.trans_type.to_string()),
        ]
    }
}

/// Builds the submission record.
///
/// `submitted_at` is the local wall-clock time of the submission; it fills
/// `f_time` and stands in for a missing transaction date.
///
/// ## Errors
/// - `ValidationError::EmptyCart` for an empty cart
/// - `CoreError::Serialization` if the line JSON cannot be produced
pub fn build_submission(
    header: &OrderHeader,
    lines: &[LineItem],
    totals: &OrderTotals,
    submitted_at: NaiveDateTime,
) -> CoreResult<SubmissionPayload> {
    validate_cart_not_empty(lines.len())?;

    let details: Vec<SubmissionLine> = lines.iter().map(SubmissionLine::from).collect();
    let function_date = header
        .transaction_date
        .unwrap_or_else(|| submitted_at.date())
        .format("%Y-%m-%d")
        .to_string();

    Ok(SubmissionPayload {
        party_name: header.customer_name.clone(),
        function_date,
        contact_no: header.contact_number.clone(),
        venue: header.venue.clone(),
        total: totals.grand_total.to_fixed_2(),
        so_advance: header.advance_amount.to_fixed_2(),
        user_id: header.salesman_id.clone(),
        sales_order_details: serde_json::to_string(&details)?,
        bank_id: header.bank_id.clone(),
        update_id: header.update_id.clone(),
        comments: header.comments.clone(),
        discount1: totals.header_discount.to_fixed_2(),
        f_time: submitted_at.format("%-I:%M:%S %p").to_string(),
        order_type: header.order_type.clone(),
        trans_type: header.document_type.trans_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::error::{CoreError, ValidationError};
    use crate::money::Money;
    use crate::pricing::{price_line, LineInput};
    use crate::types::DocumentType;
    use chrono::NaiveDate;

    fn submitted_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap()
    }

    fn glossy_tile() -> LineItem {
        price_line(LineInput {
            stock_id: "803-1333".to_string(),
            description: "Glossy Tile 12x12".to_string(),
            long_description: None,
            uom: None,
            box_count: 2,
            piece_count: 3,
            packing_factor: 10.0,
            unit_price: Money::from_rupees(500),
            discount_per_unit: Money::from_rupees(50),
        })
    }

    #[test]
    fn test_payload_fields() {
        let header = OrderHeader {
            customer_name: "Ali Traders".to_string(),
            contact_number: "0300-1234567".to_string(),
            advance_amount: Money::from_rupees(1_000),
            salesman_id: "17".to_string(),
            ..Default::default()
        };
        let lines = vec![glossy_tile()];
        let totals = aggregate(&lines, Money::zero()).unwrap();

        let payload = build_submission(&header, &lines, &totals, submitted_at()).unwrap();
        assert_eq!(payload.party_name, "Ali Traders");
        assert_eq!(payload.function_date, "2024-05-01");
        assert_eq!(payload.total, "22500.00");
        assert_eq!(payload.so_advance, "1000.00");
        assert_eq!(payload.discount1, "0.00");
        assert_eq!(payload.f_time, "3:04:05 PM");
        assert_eq!(payload.trans_type, 32);

        let details: serde_json::Value =
            serde_json::from_str(&payload.sales_order_details).unwrap();
        assert_eq!(details[0]["stock_id"], "803-1333");
        assert_eq!(details[0]["box"], 2);
        assert_eq!(details[0]["quantity"], 50.0);
        assert_eq!(details[0]["discount_percent"], "10.00");
        assert_eq!(details[0]["amount"], "22500.00");
        assert_eq!(details[0]["uom"], "sqm");
    }

    #[test]
    fn test_order_trans_type_and_date() {
        let header = OrderHeader {
            document_type: DocumentType::Order,
            transaction_date: NaiveDate::from_ymd_opt(2024, 12, 25),
            ..Default::default()
        };
        let lines = vec![glossy_tile()];
        let totals = aggregate(&lines, Money::zero()).unwrap();
        let payload = build_submission(&header, &lines, &totals, submitted_at()).unwrap();

        assert_eq!(payload.trans_type, 30);
        assert_eq!(payload.function_date, "2024-12-25");

        let fields = payload.form_fields();
        assert_eq!(fields.len(), 15);
        assert_eq!(fields[0], ("party_name", String::new()));
        assert_eq!(fields[14], ("trans_type", "30".to_string()));
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let err = build_submission(
            &OrderHeader::default(),
            &[],
            &OrderTotals::default(),
            submitted_at(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::EmptyCart)
        ));
    }
}
