//! Membership prices and discounts.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Prices that differ by less than this are considered equal.
const PRICE_TOLERANCE: f64 = 0.005;

/// A reduction applied to a plan's price when a member subscribes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// A percentage of the price, from 0 to 100.
    Percentage(f64),
    /// A fixed amount in the price's currency, no more than the price.
    Fixed(f64),
}

impl Discount {
    /// The amount taken off `price`.
    pub fn amount_off(&self, price: f64) -> f64 {
        match self {
            Discount::Percentage(percent) => price * percent / 100.0,
            Discount::Fixed(amount) => *amount,
        }
    }

    fn validate(&self, price: f64) -> Result<(), Error> {
        match *self {
            Discount::Percentage(percent) if !(0.0..=100.0).contains(&percent) => Err(
                Error::InvalidDiscount(format!("{percent}% is not between 0% and 100%")),
            ),
            Discount::Fixed(amount) if !amount.is_finite() || amount < 0.0 => Err(
                Error::InvalidDiscount(format!("{amount} is not a valid amount")),
            ),
            Discount::Fixed(amount) if amount > price => Err(Error::InvalidDiscount(format!(
                "{amount} is more than the price {price}"
            ))),
            _ => Ok(()),
        }
    }
}

/// What a member pays for a membership.
///
/// The final price is always the price minus the discount, rounded to cents.
/// Use [MembershipPricing::new] to create one; deserializing checks the
/// stored final price agrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PricingRecord")]
pub struct MembershipPricing {
    price: f64,
    discount: Option<Discount>,
    final_price: f64,
}

impl MembershipPricing {
    /// Price a membership.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidPrice] if `price` is negative or not finite,
    /// - or [Error::InvalidDiscount] if `discount` is out of range for `price`.
    pub fn new(price: f64, discount: Option<Discount>) -> Result<Self, Error> {
        if !price.is_finite() || price < 0.0 {
            return Err(Error::InvalidPrice(price));
        }

        if let Some(discount) = &discount {
            discount.validate(price)?;
        }

        let amount_off = discount.map_or(0.0, |discount| discount.amount_off(price));

        Ok(Self {
            price,
            discount,
            final_price: round_to_cents(price - amount_off),
        })
    }

    /// The undiscounted price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// The discount, if any.
    pub fn discount(&self) -> Option<Discount> {
        self.discount
    }

    /// The price after the discount.
    pub fn final_price(&self) -> f64 {
        self.final_price
    }
}

#[derive(Deserialize)]
struct PricingRecord {
    price: f64,
    #[serde(default)]
    discount: Option<Discount>,
    final_price: f64,
}

impl TryFrom<PricingRecord> for MembershipPricing {
    type Error = Error;

    fn try_from(record: PricingRecord) -> Result<Self, Self::Error> {
        let pricing = MembershipPricing::new(record.price, record.discount)?;

        if (pricing.final_price - record.final_price).abs() >= PRICE_TOLERANCE {
            return Err(Error::FinalPriceMismatch {
                got: record.final_price,
                want: pricing.final_price,
            });
        }

        Ok(pricing)
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
