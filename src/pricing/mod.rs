//! Quote pricing and composition.
//!
//! Leaves first: [`decoration`] and [`price_breaks`] are pure lookups,
//! [`catalog`] resolves a catalog record into selectable decoration methods,
//! [`line_item`] prices the item being configured and [`quote`] aggregates
//! committed items into quote totals.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

pub mod catalog;
pub mod decoration;
pub mod line_item;
pub mod price_breaks;
pub mod quote;

pub use catalog::{DecorationMethod, MethodKind, ProductOptions};
pub use line_item::{FieldError, ItemEditor, ItemValidation, LineItem};
pub use price_breaks::{PriceBreak, PriceBreaks};
pub use quote::{Discount, DiscountKind, QuoteBuilder, QuoteTotals};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("no catalog product is attached to this item")]
    NoProduct,

    #[error("unknown decoration method {0}")]
    UnknownMethod(String),

    #[error("decoration method {0} has no price breaks")]
    NoPriceBreaks(String),

    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),

    #[error("{0} must not exceed 1000000000")]
    AmountTooLarge(&'static str),

    #[error("quantity must not exceed 10000000")]
    QuantityTooLarge,

    #[error("a percentage discount must not exceed 100")]
    PercentageTooLarge,

    #[error("line item {0} appears more than once")]
    DuplicateItem(uuid::Uuid),
}

/// Upper bound for any single price, fee or fixed discount. Together with
/// [`MAX_QUANTITY`] it keeps every subtotal far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000);

pub const MAX_QUANTITY: u32 = 10_000_000;

/// Accept `amount` for `field` only within `0..=MAX_AMOUNT`.
pub fn check_amount(field: &'static str, amount: Decimal) -> Result<Decimal, PricingError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PricingError::NegativeAmount(field));
    }
    if amount > MAX_AMOUNT {
        return Err(PricingError::AmountTooLarge(field));
    }
    Ok(amount)
}

pub fn check_quantity(quantity: u32) -> Result<u32, PricingError> {
    if quantity > MAX_QUANTITY {
        return Err(PricingError::QuantityTooLarge);
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_bounded_both_ways() {
        assert_eq!(check_amount("unit_price", dec!(0)), Ok(dec!(0)));
        assert_eq!(check_amount("unit_price", MAX_AMOUNT), Ok(MAX_AMOUNT));
        assert_eq!(
            check_amount("unit_price", dec!(-0.01)),
            Err(PricingError::NegativeAmount("unit_price"))
        );
        assert_eq!(
            check_amount("setup_fee", Decimal::MAX),
            Err(PricingError::AmountTooLarge("setup_fee"))
        );
        assert_eq!(check_quantity(MAX_QUANTITY), Ok(MAX_QUANTITY));
        assert_eq!(check_quantity(u32::MAX), Err(PricingError::QuantityTooLarge));
    }
}
