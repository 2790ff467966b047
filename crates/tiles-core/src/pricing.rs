//! # Line Item Pricing
//!
//! Turns one cart line into a priced, immutable [`LineItem`].
//!
//! ## Pricing Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity        = box × packing + pec × packing                        │
//! │  gross_amount    = quantity × unit_price                                │
//! │  discount_amount = quantity × discount_per_unit                         │
//! │  discount_%      = clamp(discount / gross × 100, 0, 100)  (gross > 0)   │
//! │  line_amount     = gross_amount − discount_amount                       │
//! │                                                                         │
//! │  Example: 2 boxes + 3 pcs, packing 10, Rs 500, Rs 50 off per unit       │
//! │    quantity 50 → gross 25,000 → discount 2,500 (10%) → line 22,500      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing is a total function: malformed input is defaulted (see
//! [`crate::validation::parse_or_default`]) and negative input propagates.

use serde::Serialize;
use ts_rs::TS;

use crate::money::{Money, Quantity};
use crate::types::LineRecord;
use crate::validation::{parse_count, parse_or_default, NumericCoercionWarning};

// =============================================================================
// Quantity Formula
// =============================================================================

/// The ways the app has converted boxes and pieces into a quantity.
///
/// Only [`QuantityFormula::PackedBoxesAndPieces`] is used by the engine. The
/// other two are earlier revisions kept until the business owner confirms
/// which rule is intended.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum QuantityFormula {
    /// `box × packing + pec`
    BoxPackingPlusPieces,
    /// `box × packing + pec × packing`
    #[default]
    PackedBoxesAndPieces,
    /// `(api_box / api_pec) × pec + box`, with ratios read from the stock API.
    ApiRatio { api_box: f64, api_pec: f64 },
}

impl QuantityFormula {
    /// Applies the formula to raw counts.
    pub fn quantity(&self, box_count: i64, piece_count: i64, packing: f64) -> Quantity {
        let boxes = box_count as f64;
        let pieces = piece_count as f64;
        let units = match *self {
            QuantityFormula::BoxPackingPlusPieces => boxes * packing + pieces,
            QuantityFormula::PackedBoxesAndPieces => boxes * packing + pieces * packing,
            QuantityFormula::ApiRatio { api_box, api_pec } => {
                if api_pec == 0.0 {
                    boxes
                } else {
                    (api_box / api_pec) * pieces + boxes
                }
            }
        };
        Quantity::from_units(units)
    }
}

// =============================================================================
// Line Input
// =============================================================================

/// Coerced pricing input for one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInput {
    pub stock_id: String,
    pub description: String,
    pub long_description: Option<String>,
    pub uom: Option<String>,
    pub box_count: i64,
    pub piece_count: i64,
    pub packing_factor: f64,
    pub unit_price: Money,
    pub discount_per_unit: Money,
}

impl LineInput {
    /// Coerces an app record. Every unreadable number is reported.
    pub fn from_record(record: &LineRecord) -> (Self, Vec<NumericCoercionWarning>) {
        let mut warnings = Vec::new();

        let (box_count, w) = parse_count("box", record.box_count.as_ref());
        warnings.extend(w);
        let (piece_count, w) = parse_count("pec", record.piece_count.as_ref());
        warnings.extend(w);
        let (packing, w) = parse_or_default("packing", record.packing.as_ref(), 1.0);
        warnings.extend(w);
        let (unit_price, w) = parse_or_default("unit_price", record.unit_price.as_ref(), 0.0);
        warnings.extend(w);
        let (discount, w) = parse_or_default("text1", record.discount_per_unit.as_ref(), 0.0);
        warnings.extend(w);

        let input = LineInput {
            stock_id: record.stock_id.trim().to_string(),
            description: record.description.trim().to_string(),
            long_description: record
                .long_description
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            uom: record
                .uom
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            box_count,
            piece_count,
            packing_factor: packing,
            unit_price: Money::from_decimal(unit_price),
            discount_per_unit: Money::from_decimal(discount),
        };

        (input, warnings)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A priced cart line.
///
/// ## Immutability
/// Fields are private and there are no setters. Changing the counts goes
/// through [`LineItem::with_counts`], which prices a brand new item.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct LineItem {
    stock_id: String,
    description: String,
    long_description: Option<String>,
    uom: Option<String>,
    box_count: i64,
    piece_count: i64,
    packing_factor: f64,
    unit_price: Money,
    discount_per_unit: Money,
    quantity: Quantity,
    gross_amount: Money,
    discount_amount: Money,
    discount_percent: f64,
    line_amount: Money,
}

impl LineItem {
    pub fn stock_id(&self) -> &str {
        &self.stock_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn long_description(&self) -> Option<&str> {
        self.long_description.as_deref()
    }

    pub fn uom(&self) -> Option<&str> {
        self.uom.as_deref()
    }

    pub fn box_count(&self) -> i64 {
        self.box_count
    }

    pub fn piece_count(&self) -> i64 {
        self.piece_count
    }

    pub fn packing_factor(&self) -> f64 {
        self.packing_factor
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn discount_per_unit(&self) -> Money {
        self.discount_per_unit
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn gross_amount(&self) -> Money {
        self.gross_amount
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    /// Always within `[0, 100]`.
    pub fn discount_percent(&self) -> f64 {
        self.discount_percent
    }

    pub fn line_amount(&self) -> Money {
        self.line_amount
    }

    /// Prices a new item with different box/piece counts.
    pub fn with_counts(&self, box_count: i64, piece_count: i64) -> LineItem {
        price_line(LineInput {
            stock_id: self.stock_id.clone(),
            description: self.description.clone(),
            long_description: self.long_description.clone(),
            uom: self.uom.clone(),
            box_count,
            piece_count,
            packing_factor: self.packing_factor,
            unit_price: self.unit_price,
            discount_per_unit: self.discount_per_unit,
        })
    }
}

// =============================================================================
// Pricer
// =============================================================================

/// Prices a line with the canonical quantity formula.
pub fn price_line(input: LineInput) -> LineItem {
    price_line_with(input, QuantityFormula::default())
}

/// Prices a line with an explicit quantity formula.
pub fn price_line_with(input: LineInput, formula: QuantityFormula) -> LineItem {
    let quantity = formula.quantity(input.box_count, input.piece_count, input.packing_factor);
    let gross_amount = quantity.times_price(input.unit_price);
    let discount_amount = quantity.times_price(input.discount_per_unit);
    let discount_percent = if gross_amount.is_positive() {
        discount_amount.percent_of(gross_amount).clamp(0.0, 100.0)
    } else {
        0.0
    };

    LineItem {
        stock_id: input.stock_id,
        description: input.description,
        long_description: input.long_description,
        uom: input.uom,
        box_count: input.box_count,
        piece_count: input.piece_count,
        packing_factor: input.packing_factor,
        unit_price: input.unit_price,
        discount_per_unit: input.discount_per_unit,
        quantity,
        gross_amount,
        discount_amount,
        discount_percent,
        line_amount: gross_amount - discount_amount,
    }
}

/// Coerces and prices an app record in one step.
pub fn price_record(record: &LineRecord) -> (LineItem, Vec<NumericCoercionWarning>) {
    let (input, warnings) = LineInput::from_record(record);
    (price_line(input), warnings)
}

// =============================================================================
// Unit Tests
// =============================================================================
