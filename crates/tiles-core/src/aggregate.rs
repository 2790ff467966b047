//! # Order Aggregation
//!
//! Sums priced lines into [`OrderTotals`].
//!
//! ```text
//! subtotal     = Σ line_amount
//! total_boxes  = Σ box_count
//! total_pieces = Σ piece_count
//! grand_total  = subtotal − header_discount
//! ```
//!
//! Every sum saturates at the i64 range, so no cart can make it panic.
//!
//! [`OrderTotals::from_lines`] is the raw fold and accepts an empty list
//! (all zeros). [`aggregate`] is what submission and printing call; it
//! refuses an empty cart so a blank order can never go out with a zero total.

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::LineItem;
use crate::validation::{validate_cart_not_empty, ValidationResult};

/// Totals of a priced cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    pub total_boxes: i64,
    pub total_pieces: i64,
    pub subtotal: Money,
    pub header_discount: Money,
    pub grand_total: Money,
}

impl OrderTotals {
    /// Folds any number of lines, including none.
    pub fn from_lines(lines: &[LineItem], header_discount: Money) -> Self {
        let subtotal: Money = lines.iter().map(LineItem::line_amount).sum();
        OrderTotals {
            total_boxes: lines
                .iter()
                .map(LineItem::box_count)
                .fold(0, i64::saturating_add),
            total_pieces: lines
                .iter()
                .map(LineItem::piece_count)
                .fold(0, i64::saturating_add),
            subtotal,
            header_discount,
            grand_total: subtotal - header_discount,
        }
    }
}

/// Totals a non-empty cart.
///
/// ## Errors
/// `ValidationError::EmptyCart` when `lines` is empty. This is the only
/// failure mode.
pub fn aggregate(lines: &[LineItem], header_discount: Money) -> ValidationResult<OrderTotals> {
    validate_cart_not_empty(lines.len())?;
    Ok(OrderTotals::from_lines(lines, header_discount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::pricing::{price_line, LineInput};

    fn line(boxes: i64, pieces: i64, packing: f64, rate: i64, off: i64) -> LineItem {
        price_line(LineInput {
            stock_id: "S-1".to_string(),
            description: "Tile".to_string(),
            long_description: None,
            uom: None,
            box_count: boxes,
            piece_count: pieces,
            packing_factor: packing,
            unit_price: Money::from_rupees(rate),
            discount_per_unit: Money::from_rupees(off),
        })
    }

    #[test]
    fn test_single_line_totals() {
        let lines = vec![line(2, 3, 10.0, 500, 0)];
        let totals = aggregate(&lines, Money::zero()).unwrap();
        assert_eq!(totals.subtotal, Money::from_rupees(25_000));
        assert_eq!(totals.grand_total, Money::from_rupees(25_000));
        assert_eq!(totals.total_boxes, 2);
        assert_eq!(totals.total_pieces, 3);
    }

    #[test]
    fn test_subtotal_is_exact_sum_of_lines() {
        let lines = vec![
            line(2, 3, 10.0, 500, 50),
            line(1, 0, 1.44, 2_150, 0),
            line(0, 7, 0.36, 333, 3),
        ];
        let expected: Money = lines.iter().map(LineItem::line_amount).sum();
        let totals = aggregate(&lines, Money::from_rupees(1_000)).unwrap();
        assert_eq!(totals.subtotal, expected);
        assert_eq!(totals.grand_total, expected - Money::from_rupees(1_000));
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(
            aggregate(&[], Money::zero()),
            Err(ValidationError::EmptyCart)
        );

        let raw = OrderTotals::from_lines(&[], Money::zero());
        assert_eq!(raw, OrderTotals::default());
    }

    #[test]
    fn test_extreme_lines_saturate() {
        let mut lines = vec![line(2, 3, 10.0, 500, 0)];
        lines.push(price_line(LineInput {
            stock_id: "S-2".to_string(),
            description: "Slab".to_string(),
            long_description: None,
            uom: None,
            box_count: i64::MAX,
            piece_count: i64::MAX,
            packing_factor: 1e12,
            unit_price: Money::from_paisa(i64::MAX),
            discount_per_unit: Money::zero(),
        }));
        lines.push(lines[1].clone());

        let totals = aggregate(&lines, Money::from_paisa(i64::MIN)).unwrap();
        assert_eq!(totals.total_boxes, i64::MAX);
        assert_eq!(totals.total_pieces, i64::MAX);
        assert_eq!(totals.subtotal, Money::from_paisa(i64::MAX));
        assert_eq!(totals.grand_total, Money::from_paisa(i64::MAX));
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let lines = vec![line(2, 3, 10.0, 500, 50), line(5, 1, 2.0, 120, 10)];
        let first = aggregate(&lines, Money::from_rupees(10)).unwrap();
        let second = aggregate(&lines, Money::from_rupees(10)).unwrap();
        assert_eq!(first, second);
    }
}
