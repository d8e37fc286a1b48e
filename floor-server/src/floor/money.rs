//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done on `Decimal` internally and converted back to
//! `f64` for storage/serialization, rounded to 2 decimal places half-up.

use super::error::FloorError;
use rust_decimal::prelude::*;
use shared::models::{OrderLine, OrderLineInput};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed flat amount (discount, service charge)
const MAX_AMOUNT: f64 = 1_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), FloorError> {
    if !value.is_finite() {
        return Err(FloorError::InvalidOperation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate an OrderLineInput before catalog resolution
pub fn validate_order_line(line: &OrderLineInput) -> Result<(), FloorError> {
    if line.quantity <= 0 {
        return Err(FloorError::InvalidOperation(format!(
            "quantity must be positive, got {}",
            line.quantity
        )));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(FloorError::InvalidOperation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, line.quantity
        )));
    }
    Ok(())
}

/// Validate bill inputs before any mutation
pub fn validate_bill_inputs(
    tax_rate: f64,
    discount_amount: f64,
    service_charge: f64,
) -> Result<(), FloorError> {
    require_finite(tax_rate, "tax_rate")?;
    if !(0.0..=100.0).contains(&tax_rate) {
        return Err(FloorError::InvalidOperation(format!(
            "tax_rate must be between 0 and 100, got {}",
            tax_rate
        )));
    }

    require_finite(discount_amount, "discount_amount")?;
    if !(0.0..=MAX_AMOUNT).contains(&discount_amount) {
        return Err(FloorError::InvalidOperation(format!(
            "discount_amount must be between 0 and {}, got {}",
            MAX_AMOUNT, discount_amount
        )));
    }

    require_finite(service_charge, "service_charge")?;
    if !(0.0..=MAX_AMOUNT).contains(&service_charge) {
        return Err(FloorError::InvalidOperation(format!(
            "service_charge must be between 0 and {}, got {}",
            MAX_AMOUNT, service_charge
        )));
    }

    Ok(())
}

/// Validate a catalog unit price before it is snapshotted into a line
pub fn validate_unit_price(price: f64, item_name: &str) -> Result<(), FloorError> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(FloorError::InvalidOperation(format!(
            "price must be non-negative for {}, got {}",
            item_name, price
        )));
    }
    if price > MAX_PRICE {
        return Err(FloorError::InvalidOperation(format!(
            "price exceeds maximum allowed ({}) for {}, got {}",
            MAX_PRICE, item_name, price
        )));
    }
    Ok(())
}

/// Line total: unit_price × quantity
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Order total: sum of line totals
///
/// This is the single place order totals are computed, so the stored
/// `total_amount` always equals the sum of the stored line totals.
pub fn order_total(lines: &[OrderLine]) -> f64 {
    let total: Decimal = lines.iter().map(|l| to_decimal(l.line_total)).sum();
    to_f64(total)
}

/// Computed bill amounts
#[derive(Debug, Clone, Copy)]
pub struct BillAmounts {
    pub tax_amount: f64,
    pub total_amount: f64,
}

/// Bill arithmetic:
/// tax = subtotal × rate / 100, total = subtotal + tax + service − discount
pub fn bill_amounts(
    subtotal: f64,
    tax_rate: f64,
    discount_amount: f64,
    service_charge: f64,
) -> BillAmounts {
    let subtotal = to_decimal(subtotal);
    let tax = (subtotal * to_decimal(tax_rate) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal + tax + to_decimal(service_charge) - to_decimal(discount_amount);

    BillAmounts {
        tax_amount: to_f64(tax),
        total_amount: to_f64(total),
    }
}
