//! Mercado Livre calculator: listing-type commissions, tiered fixed
//! fees, and weight-bracket seller shipping.

use crate::marketplaces::fees::{self, FixedFee};
use crate::marketplaces::Calculator;
use crate::models::{
    Analysis, CostBreakdown, CostComponents, ListingType, LogisticsType, MarketplaceResult,
    PriceSuggestion, PricingRequest, Suggestion,
};
use crate::percent::{as_fraction, as_percent, percent_from_total, round2};
use crate::rules::{Marketplace, RuleSet};
use tracing::debug;

const DEFAULT_COMMISSION: f64 = 0.17;
const DEFAULT_FREE_SHIPPING_LIMIT: f64 = 79.00;

/// Prices a listing on Mercado Livre for one listing/logistics mode
/// combination.
pub struct MercadoLivreCalculator {
    listing_type: ListingType,
    logistics_type: LogisticsType,
}

impl MercadoLivreCalculator {
    /// Creates a calculator for the given listing and logistics modes.
    pub fn new(listing_type: ListingType, logistics_type: LogisticsType) -> Self {
        Self { listing_type, logistics_type }
    }

    fn commission_rate(&self, rules: &RuleSet) -> f64 {
        rules.rate(&["commissions", self.listing_type.as_str()], DEFAULT_COMMISSION)
    }

    fn free_shipping_limit(&self, rules: &RuleSet) -> f64 {
        rules.amount(
            &["logistics_rules", self.logistics_type.as_str(), "free_shipping_limit"],
            DEFAULT_FREE_SHIPPING_LIMIT,
        )
    }

    fn fee_table_path(&self) -> [&'static str; 3] {
        ["logistics_rules", self.logistics_type.as_str(), "fee_table"]
    }

    /// Commission + tax + ads as a fraction of any sale price.
    fn bite_fraction(&self, request: &PricingRequest, rules: &RuleSet) -> f64 {
        self.commission_rate(rules)
            + as_fraction(request.tax_percent)
            + as_fraction(request.ads_investment_percent)
    }
}

impl Calculator for MercadoLivreCalculator {
    fn marketplace(&self) -> Marketplace {
        Marketplace::MercadoLivre
    }

    fn analyze(&self, request: &PricingRequest, rules: &RuleSet) -> Analysis {
        let Some(price) = request.analysis_price() else {
            return Analysis::Empty {};
        };

        let fee_table = rules.fee_table(&self.fee_table_path());
        let fixed_fee = match fees::fixed_fee(price, &fee_table) {
            FixedFee::Amount(fee) => fee,
            FixedFee::Blocked => {
                debug!("Price {} falls in a blocked tier", price);
                return Analysis::blocked();
            }
        };

        let shipping = fees::seller_shipping(
            price,
            self.free_shipping_limit(rules),
            request.weight_kg,
            &rules.shipping_table(&["estimated_seller_shipping"]),
        );

        let commission_rate = self.commission_rate(rules);
        let bite = self.bite_fraction(request, rules);
        let total_costs =
            price * bite + fixed_fee + shipping + request.product_cost + request.packaging_cost;
        let profit = price - total_costs;

        Analysis::Priced(CostBreakdown {
            analyzed_price: price,
            components: CostComponents {
                fixed_fee: round2(fixed_fee),
                fixed_fee_pct: percent_from_total(fixed_fee, price),
                tax: round2(as_fraction(request.tax_percent) * price),
                tax_pct: request.tax_percent,
                ads: round2(as_fraction(request.ads_investment_percent) * price),
                ads_pct: request.ads_investment_percent,
                commission: round2(commission_rate * price),
                commission_pct: as_percent(commission_rate),
                shipping: Some(round2(shipping)),
                shipping_pct: Some(percent_from_total(shipping, price)),
                product_cost: round2(request.product_cost),
                product_cost_pct: percent_from_total(request.product_cost, price),
                packaging_cost: round2(request.packaging_cost),
                packaging_cost_pct: percent_from_total(request.packaging_cost, price),
                total_costs: round2(total_costs),
                total_costs_pct: percent_from_total(total_costs, price),
                real_profit: round2(profit),
                profit_pct: percent_from_total(profit, price),
            },
        })
    }

    fn suggest(&self, request: &PricingRequest, rules: &RuleSet) -> Suggestion {
        let Some(margin) = request.suggestion_margin() else {
            return Suggestion::Empty {};
        };

        let bite = self.bite_fraction(request, rules);
        let divisor = 1.0 - bite - as_fraction(margin);
        if divisor <= 0.0 {
            debug!("Margin {}% is unreachable (divisor {})", margin, divisor);
            return Suggestion::Empty {};
        }

        // Single-iteration fixed point: resolve the fee/shipping tiers at
        // a first-pass price, then solve once more with them included.
        let base_costs = request.product_cost + request.packaging_cost;
        let estimated_price = base_costs / divisor;

        let fee_table = rules.fee_table(&self.fee_table_path());
        let fixed_fee = match fees::fixed_fee(estimated_price, &fee_table) {
            FixedFee::Amount(fee) => fee,
            FixedFee::Blocked => {
                debug!("Estimated price {} falls in a blocked tier", estimated_price);
                return Suggestion::Empty {};
            }
        };
        let shipping = fees::seller_shipping(
            estimated_price,
            self.free_shipping_limit(rules),
            request.weight_kg,
            &rules.shipping_table(&["estimated_seller_shipping"]),
        );

        let base_cost = base_costs + fixed_fee + shipping;
        let final_price = base_cost / divisor;

        let commission_rate = self.commission_rate(rules);
        let tax = round2(as_fraction(request.tax_percent) * final_price);
        let ads = round2(as_fraction(request.ads_investment_percent) * final_price);
        let commission = round2(commission_rate * final_price);
        let total_costs = round2(base_cost + ads + tax + commission);

        Suggestion::Solved(PriceSuggestion {
            target_margin_percent: margin,
            suggested_price: round2(final_price),
            components: CostComponents {
                fixed_fee: round2(fixed_fee),
                fixed_fee_pct: percent_from_total(fixed_fee, final_price),
                tax,
                tax_pct: request.tax_percent,
                ads,
                ads_pct: request.ads_investment_percent,
                commission,
                commission_pct: as_percent(commission_rate),
                shipping: Some(round2(shipping)),
                shipping_pct: Some(percent_from_total(shipping, final_price)),
                product_cost: round2(request.product_cost),
                product_cost_pct: percent_from_total(request.product_cost, final_price),
                packaging_cost: round2(request.packaging_cost),
                packaging_cost_pct: percent_from_total(request.packaging_cost, final_price),
                total_costs,
                total_costs_pct: percent_from_total(total_costs, final_price),
                real_profit: round2(final_price - total_costs),
                profit_pct: percent_from_total(final_price - total_costs, final_price),
            },
        })
    }

    fn evaluate(&self, request: &PricingRequest, rules: &RuleSet) -> MarketplaceResult {
        MarketplaceResult {
            marketplace: self.marketplace().label().to_string(),
            listing_type: Some(self.listing_type.to_string()),
            logistics_type: Some(self.logistics_type.to_string()),
            seller_type: None,
            current_analysis: self.analyze(request, rules),
            price_suggestion: self.suggest(request, rules),
        }
    }
}
