//! Pricing
//!
//! All amounts are handled in minor units (kopecks, pence, cents). Every
//! currency a catalog may use has two decimal places, so rounding a major
//! amount to 2 decimals is the same as rounding minor units to a whole number.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while deriving prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Multiplying a unit price by a quantity left the representable range.
    #[error("{quantity} x {unit_price_minor} minor units is out of range")]
    Overflow {
        /// Quantity being priced
        quantity: Decimal,

        /// Unit price in minor units
        unit_price_minor: i64,
    },

    /// The sum of several amounts left the representable range.
    #[error("sum of amounts is out of range")]
    TotalOverflow,
}

/// Round a quantity to 2 decimal places, halves away from zero.
pub fn round_quantity(quantity: Decimal) -> Decimal {
    quantity.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a major-unit amount (e.g. `133.5`) into whole minor units.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::new(100, 0))
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
}

/// Price `quantity` units at `unit_price`, rounded to the nearest minor unit.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the product does not fit the money type.
pub fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: Decimal,
) -> Result<Money<'a, Currency>, PricingError> {
    let unit_price_minor = unit_price.to_minor_units();

    let minor = Decimal::from(unit_price_minor)
        .checked_mul(quantity)
        .map(|total| total.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|total| total.to_i64())
        .ok_or(PricingError::Overflow {
            quantity,
            unit_price_minor,
        })?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

/// Sum a list of amounts in the given currency.
///
/// An empty list sums to zero. Callers guarantee every amount shares `currency`.
///
/// # Errors
///
/// Returns [`PricingError::TotalOverflow`] if the sum does not fit the money type.
pub fn total_price<'a, 'b>(
    amounts: impl IntoIterator<Item = &'b Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError>
where
    'a: 'b,
{
    let minor = amounts
        .into_iter()
        .try_fold(0_i64, |acc, amount| acc.checked_add(amount.to_minor_units()))
        .ok_or(PricingError::TotalOverflow)?;

    Ok(Money::from_minor(minor, currency))
}
