//! Fee resolvers shared by the marketplace calculators: tiered fixed
//! fees, weight-bracket shipping, and Shopee's regressive fee.

use crate::rules::{FeeKind, FeeRule};
use std::collections::BTreeMap;

/// Fallback seller shipping cost when the weight table has no bracket.
pub const DEFAULT_SHIPPING_COST: f64 = 18.00;

/// Resolved fixed fee for a price tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixedFee {
    /// Flat fee charged at this tier.
    Amount(f64),
    /// The marketplace disallows listing at this tier.
    Blocked,
}

impl FixedFee {
    /// Returns the fee amount, or `None` for a blocked tier.
    pub fn amount(&self) -> Option<f64> {
        match self {
            FixedFee::Amount(fee) => Some(*fee),
            FixedFee::Blocked => None,
        }
    }
}

/// Scans a fee table for the tier matching `price`.
///
/// The table must already be sorted ascending by threshold (see
/// [`crate::rules::RuleSet::fee_table`]); the first matching rule wins. No match, or a
/// non-positive price, resolves to a zero fee.
pub fn fixed_fee(price: f64, fee_table: &[FeeRule]) -> FixedFee {
    if price <= 0.0 {
        return FixedFee::Amount(0.0);
    }
    for rule in fee_table {
        if rule.operator.matches(price, rule.threshold) {
            return match rule.kind {
                FeeKind::Fixed => FixedFee::Amount(rule.value),
                FeeKind::Blocked => FixedFee::Blocked,
            };
        }
    }
    FixedFee::Amount(0.0)
}

/// Estimates the seller-paid shipping cost on Mercado Livre.
///
/// Below the free-shipping limit the buyer pays and the cost is zero.
/// At or above it, the cost comes from the smallest weight bracket that
/// covers `weight_kg` (brackets 0.5 / 1.0 / 2.0 / 5.0 kg).
pub fn seller_shipping(
    price: f64,
    free_shipping_limit: f64,
    weight_kg: f64,
    shipping_table: &BTreeMap<String, f64>,
) -> f64 {
    if price < free_shipping_limit {
        return 0.0;
    }

    let bracket = if weight_kg <= 0.5 {
        "0.5"
    } else if weight_kg <= 1.0 {
        "1.0"
    } else if weight_kg <= 2.0 {
        "2.0"
    } else {
        "5.0"
    };

    shipping_table.get(bracket).copied().unwrap_or(DEFAULT_SHIPPING_COST)
}

/// Adjusts Shopee's base fixed fee by price bracket.
///
/// High base fees shrink linearly below the regressive threshold; low
/// base fees become half the price below the low-value threshold.
pub fn regressive_fee(
    price: f64,
    base_fee: f64,
    regressive_threshold: f64,
    low_value_threshold: f64,
) -> f64 {
    if base_fee >= 7.00 && price < regressive_threshold {
        let discount = (12.00 - price) * 0.25;
        return (base_fee - discount).max(0.0);
    }
    if base_fee < 7.00 && price < low_value_threshold {
        return price * 0.50;
    }
    base_fee
}
