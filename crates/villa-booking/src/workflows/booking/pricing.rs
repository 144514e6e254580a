//! Price derivation for a stay.
//!
//! Amounts are whole rupiah. Nothing here holds state: the session calls
//! [`compute_pricing`] every time the date range or the applied promo changes.

use serde::{Deserialize, Serialize};

use super::domain::{DateRange, PromoCode, ValidationError};

pub const CURRENCY_CODE: &str = "IDR";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub original_price: u64,
    pub discount_amount: u64,
    pub final_price: u64,
}

impl PricingSnapshot {
    pub const fn zero() -> Self {
        Self {
            original_price: 0,
            discount_amount: 0,
            final_price: 0,
        }
    }
}

/// Derive the snapshot for `range`, or `None` when the range covers no nights.
///
/// Callers keep their previous snapshot on `None`. A total that does not fit
/// in a `u64` is refused with [`ValidationError::PriceOverflow`].
pub fn compute_pricing(
    range: &DateRange,
    base_price: u64,
    applied_promo: Option<&PromoCode>,
) -> Result<Option<PricingSnapshot>, ValidationError> {
    let nights = range.nights();
    if nights <= 0 {
        return Ok(None);
    }

    let original_price = u64::try_from(nights)
        .ok()
        .and_then(|nights| base_price.checked_mul(nights))
        .ok_or(ValidationError::PriceOverflow { nights })?;
    let discount_amount = applied_promo
        .map(|promo| discount_for(original_price, promo.discount_percentage))
        .unwrap_or(0);

    Ok(Some(PricingSnapshot {
        original_price,
        discount_amount,
        final_price: original_price - discount_amount,
    }))
}

// Percentages above 100 are clamped so the final price never goes negative.
fn discount_for(original_price: u64, percentage: u8) -> u64 {
    let percentage = u128::from(percentage.min(100));
    let discount = u128::from(original_price) * percentage / 100;
    discount as u64
}

/// Group thousands with commas: `6000000` becomes `6,000,000`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

pub fn format_currency(amount: u64) -> String {
    format!("{} {}", CURRENCY_CODE, format_amount(amount))
}
