//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done with `Decimal` internally, then converted to
//! `f64` only for storage/serialization. This is what keeps the
//! `totalAmount == Σ price × quantity` invariant exact instead of
//! accumulating binary floating point drift.

use rust_decimal::prelude::*;
use shared::models::OrderItem;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: f64 = 0.01;

/// Convert an f64 to Decimal
///
/// Non-finite input collapses to zero; callers validate prices upstream.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to f64, rounded to monetary precision
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Line subtotal: price × quantity
pub fn item_subtotal(price: f64, quantity: u32) -> f64 {
    to_f64(to_decimal(price) * Decimal::from(quantity))
}

/// Order total: sum of price × quantity across items
pub fn order_total(items: &[OrderItem]) -> f64 {
    let total = items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum::<Decimal>();
    to_f64(total)
}

/// Monetary equality within tolerance
pub fn money_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < MONEY_TOLERANCE
}
