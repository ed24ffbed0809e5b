//! Decimal money helpers shared by amounts and limits.

use crate::{TallyError, TallyResult};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Number of fractional digits kept for amounts and limits.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a single value may hold (20 digits, 2 of them fractional).
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, 2);

fn check_scale(value: Decimal, field: &str) -> TallyResult<()> {
    if value.normalize().scale() > MONEY_SCALE {
        return Err(TallyError::validation(format!(
            "{field} must have at most {MONEY_SCALE} decimal places"
        )));
    }
    if value > MAX_MONEY {
        return Err(TallyError::validation(format!("{field} is too large")));
    }
    Ok(())
}

/// Validates an expense amount: strictly positive, two decimal places at most.
pub fn validate_amount(amount: Decimal) -> TallyResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(TallyError::validation("Amount must be greater than 0"));
    }
    check_scale(amount, "Amount")?;
    Ok(amount)
}

/// Validates a category limit: non-negative, two decimal places at most.
pub fn validate_limit(limit: Decimal) -> TallyResult<Decimal> {
    if limit < Decimal::ZERO {
        return Err(TallyError::validation("Limit must not be negative"));
    }
    check_scale(limit, "Limit")?;
    Ok(limit)
}

/// Formats a value for storage as TEXT, always with two decimal places.
#[must_use]
pub fn to_storage(value: Decimal) -> String {
    let mut rounded = value.round_dp(MONEY_SCALE);
    rounded.rescale(MONEY_SCALE);
    rounded.to_string()
}

/// Parses a stored TEXT value back into a decimal.
pub fn from_storage(value: &str) -> TallyResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| TallyError::Database(format!("Invalid decimal value '{value}': {e}")))
}

/// Sums an iterator of amounts.
pub fn sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc + amount)
}
