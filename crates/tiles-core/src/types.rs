//! # Domain Types
//!
//! Records received from the mobile app and the order header built from them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  FROM THE APP (loose JSON)          DOMAIN (typed, defaulted)          │
//! │  ┌─────────────────┐                ┌─────────────────┐                │
//! │  │   LineRecord    │ ── pricing ──► │    LineItem     │                │
//! │  │  box: "2"       │                │  box_count: 2   │                │
//! │  │  packing: 1.44  │                │  quantity       │                │
//! │  └─────────────────┘                └─────────────────┘                │
//! │  ┌─────────────────┐                ┌─────────────────┐                │
//! │  │  HeaderRecord   │ ─ from_record ►│   OrderHeader   │                │
//! │  │  so_advance:"0" │                │  advance: Money │                │
//! │  └─────────────────┘                └─────────────────┘                │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  DocumentType   │  Quotation (trans_type 32) | Order (30)           │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names and aliases follow what the app and the backend actually send
//! (`pec` for pieces, `text1` for the per-unit discount, `name`/`phone` on
//! headers fetched back from the server).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    parse_date, parse_or_default, text_or_default, text_or_none, NumericCoercionWarning,
};
use crate::{TRANS_TYPE_ORDER, TRANS_TYPE_QUOTATION};

// =============================================================================
// Document Type
// =============================================================================

/// The two document subtypes. They share pricing and layout and differ only
/// in the `trans_type` code of the submission payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Sales quotation (trans_type 32).
    #[default]
    Quotation,
    /// Sales order (trans_type 30).
    Order,
}

impl DocumentType {
    /// Backend transaction type code.
    pub const fn trans_type(&self) -> u32 {
        match self {
            DocumentType::Quotation => TRANS_TYPE_QUOTATION,
            DocumentType::Order => TRANS_TYPE_ORDER,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Quotation => write!(f, "quotation"),
            DocumentType::Order => write!(f, "order"),
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quotation" | "quote" | "32" => Ok(DocumentType::Quotation),
            "order" | "sales_order" | "salesorder" | "30" => Ok(DocumentType::Order),
            other => Err(ValidationError::InvalidFormat {
                field: "document_type".to_string(),
                reason: format!("unknown document type '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Line Record (from the app)
// =============================================================================

/// One cart line exactly as the app hands it over.
///
/// Numbers may arrive as JSON numbers or as strings typed into text inputs,
/// so they stay `Value` until the pricer coerces them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineRecord {
    #[serde(default)]
    pub stock_id: String,

    #[serde(default)]
    pub description: String,

    /// Optional long-form description printed in grey under the row.
    #[serde(default)]
    pub long_description: Option<String>,

    #[serde(default, rename = "box")]
    pub box_count: Option<Value>,

    #[serde(default, rename = "pec", alias = "pc")]
    pub piece_count: Option<Value>,

    #[serde(default, alias = "rate")]
    pub unit_price: Option<Value>,

    /// Per-unit discount amount. The quantity modal stores it as `text1`;
    /// older payloads call it `discount_percent` although it is an amount.
    #[serde(default, rename = "text1", alias = "discount_percent", alias = "discount")]
    pub discount_per_unit: Option<Value>,

    /// Packing factor (pieces-per-box equivalent). Defaults to 1.
    #[serde(default)]
    pub packing: Option<Value>,

    /// Unit of measure (`sqm`, `pcs`, ...).
    #[serde(default)]
    pub uom: Option<String>,
}

// =============================================================================
// Header Record (from the app)
// =============================================================================

/// Order header as the app or the backend sends it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderRecord {
    #[serde(default, alias = "name", alias = "party_name")]
    pub customer_name: Option<Value>,

    #[serde(default, alias = "phone", alias = "contact_no")]
    pub contact_number: Option<Value>,

    #[serde(default)]
    pub venue: Option<Value>,

    #[serde(default, alias = "type")]
    pub document_type: Option<Value>,

    #[serde(default, alias = "function_date")]
    pub trans_date: Option<Value>,

    #[serde(default)]
    pub so_advance: Option<Value>,

    #[serde(default)]
    pub bank_id: Option<Value>,

    #[serde(default)]
    pub comments: Option<Value>,

    #[serde(default, alias = "user_id")]
    pub salesman_id: Option<Value>,

    #[serde(default, alias = "salesman_name")]
    pub salesman: Option<Value>,

    #[serde(default)]
    pub salesman_contact: Option<Value>,

    #[serde(default, alias = "order_no")]
    pub trans_no: Option<Value>,

    #[serde(default)]
    pub reference: Option<Value>,

    /// Header-level discount amount (`discount1` on submission).
    #[serde(default, alias = "discount1")]
    pub discount: Option<Value>,

    #[serde(default)]
    pub update_id: Option<Value>,

    #[serde(default)]
    pub order_type: Option<Value>,

    #[serde(default)]
    pub prepared_by: Option<Value>,
}

// =============================================================================
// Order Header
// =============================================================================

/// The typed order header used by aggregation, submission and printing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderHeader {
    pub customer_name: String,
    pub contact_number: String,
    pub venue: String,
    pub document_type: DocumentType,
    /// `None` when the app sent nothing usable; callers substitute today.
    pub transaction_date: Option<NaiveDate>,
    pub advance_amount: Money,
    pub bank_id: String,
    pub comments: String,
    pub salesman_id: String,

    /// Backend transaction number of an already-saved quotation.
    pub trans_no: Option<String>,
    /// Human reference (used when no transaction number exists yet).
    pub reference: Option<String>,
    pub header_discount: Money,
    pub salesman_name: Option<String>,
    pub salesman_contact: Option<String>,
    /// Id of the order being edited, empty for a new one.
    pub update_id: String,
    pub order_type: String,
    pub prepared_by: Option<String>,
}

impl OrderHeader {
    /// Creates a header for a customer with everything else defaulted.
    pub fn for_customer(customer_name: impl Into<String>) -> Self {
        OrderHeader {
            customer_name: customer_name.into(),
            ..Default::default()
        }
    }

    /// Builds a typed header from the app record.
    ///
    /// Never fails: unreadable amounts become 0 and are reported, an unknown
    /// document type falls back to Quotation.
    pub fn from_record(record: &HeaderRecord) -> (Self, Vec<NumericCoercionWarning>) {
        let mut warnings = Vec::new();

        let (advance, w) = parse_or_default("so_advance", record.so_advance.as_ref(), 0.0);
        warnings.extend(w);
        let (discount, w) = parse_or_default("discount", record.discount.as_ref(), 0.0);
        warnings.extend(w);

        let document_type = text_or_none(record.document_type.as_ref())
            .and_then(|t| t.parse().ok())
            .unwrap_or_default();

        let transaction_date = text_or_none(record.trans_date.as_ref())
            .as_deref()
            .and_then(parse_date);

        let header = OrderHeader {
            customer_name: text_or_default(record.customer_name.as_ref()),
            contact_number: text_or_default(record.contact_number.as_ref()),
            venue: text_or_default(record.venue.as_ref()),
            document_type,
            transaction_date,
            advance_amount: Money::from_decimal(advance),
            bank_id: text_or_default(record.bank_id.as_ref()),
            comments: text_or_default(record.comments.as_ref()),
            salesman_id: text_or_default(record.salesman_id.as_ref()),
            trans_no: text_or_none(record.trans_no.as_ref()),
            reference: text_or_none(record.reference.as_ref()),
            header_discount: Money::from_decimal(discount),
            salesman_name: text_or_none(record.salesman.as_ref()),
            salesman_contact: text_or_none(record.salesman_contact.as_ref()),
            update_id: text_or_default(record.update_id.as_ref()),
            order_type: text_or_default(record.order_type.as_ref()),
            prepared_by: text_or_none(record.prepared_by.as_ref()),
        };

        (header, warnings)
    }

    /// The number a saved document is known by: transaction number first,
    /// then reference.
    pub fn document_number(&self) -> Option<&str> {
        self.trans_no.as_deref().or(self.reference.as_deref())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
