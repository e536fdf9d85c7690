//! SHEIN calculator: flat commission with a promotional new-seller rate,
//! no fixed fee or shipping modeled.

use crate::marketplaces::Calculator;
use crate::models::{
    Analysis, CostBreakdown, CostComponents, MarketplaceResult, PriceSuggestion, PricingRequest,
    Suggestion,
};
use crate::percent::{as_fraction, percent_from_total, round2};
use crate::rules::{Marketplace, RuleSet};
use tracing::debug;

const DEFAULT_STANDARD_COMMISSION: f64 = 0.16;
const DEFAULT_NEW_SELLER_COMMISSION: f64 = 0.00;
const DEFAULT_NEW_SELLER_DAYS: i64 = 30;

/// Prices a listing on SHEIN.
pub struct SheinCalculator;

impl SheinCalculator {
    /// Creates a SHEIN calculator.
    pub fn new() -> Self {
        Self
    }

    /// Resolves the commission rate and whether the promotional
    /// new-seller rate applies.
    fn commission_rate(&self, request: &PricingRequest, rules: &RuleSet) -> (f64, bool) {
        let days_limit = rules.count(&["limits", "new_seller_days_limit"], DEFAULT_NEW_SELLER_DAYS);
        if request.shein_days_since_registration <= days_limit {
            let rate =
                rules.rate(&["percentages", "new_seller_commission"], DEFAULT_NEW_SELLER_COMMISSION);
            (rate, true)
        } else {
            let rate =
                rules.rate(&["percentages", "standard_commission"], DEFAULT_STANDARD_COMMISSION);
            (rate, false)
        }
    }

    fn components_at(
        &self,
        price: f64,
        commission_rate: f64,
        request: &PricingRequest,
    ) -> CostComponents {
        let commission = price * commission_rate;
        let tax = as_fraction(request.tax_percent) * price;
        let ads = as_fraction(request.ads_investment_percent) * price;
        let total_costs = commission + tax + ads + request.product_cost + request.packaging_cost;

        CostComponents {
            fixed_fee: 0.0,
            fixed_fee_pct: 0.0,
            tax: round2(tax),
            tax_pct: request.tax_percent,
            ads: round2(ads),
            ads_pct: request.ads_investment_percent,
            commission: round2(commission),
            commission_pct: percent_from_total(commission, price),
            shipping: None,
            shipping_pct: None,
            product_cost: round2(request.product_cost),
            product_cost_pct: percent_from_total(request.product_cost, price),
            packaging_cost: round2(request.packaging_cost),
            packaging_cost_pct: percent_from_total(request.packaging_cost, price),
            total_costs: round2(total_costs),
            total_costs_pct: percent_from_total(total_costs, price),
            real_profit: round2(price - total_costs),
            profit_pct: percent_from_total(price - total_costs, price),
        }
    }
}

impl Default for SheinCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator for SheinCalculator {
    fn marketplace(&self) -> Marketplace {
        Marketplace::Shein
    }

    fn analyze(&self, request: &PricingRequest, rules: &RuleSet) -> Analysis {
        let Some(price) = request.analysis_price() else {
            return Analysis::Empty {};
        };

        let (rate, _) = self.commission_rate(request, rules);
        Analysis::Priced(CostBreakdown {
            analyzed_price: price,
            components: self.components_at(price, rate, request),
        })
    }

    fn suggest(&self, request: &PricingRequest, rules: &RuleSet) -> Suggestion {
        let Some(margin) = request.suggestion_margin() else {
            return Suggestion::Empty {};
        };

        let (rate, _) = self.commission_rate(request, rules);
        let denominator = 1.0
            - as_fraction(request.tax_percent)
            - as_fraction(request.ads_investment_percent)
            - as_fraction(margin)
            - rate;
        if denominator <= 0.0 {
            debug!("Margin {}% is unreachable (denominator {})", margin, denominator);
            return Suggestion::Empty {};
        }

        let suggested = (request.product_cost + request.packaging_cost) / denominator;
        Suggestion::Solved(PriceSuggestion {
            target_margin_percent: margin,
            suggested_price: round2(suggested),
            components: self.components_at(suggested, rate, request),
        })
    }

    fn evaluate(&self, request: &PricingRequest, rules: &RuleSet) -> MarketplaceResult {
        let (_, new_seller) = self.commission_rate(request, rules);
        let seller_type = if new_seller { "New Seller" } else { "Standard" };

        MarketplaceResult {
            marketplace: self.marketplace().label().to_string(),
            listing_type: Some("Standard".to_string()),
            logistics_type: None,
            seller_type: Some(seller_type.to_string()),
            current_analysis: self.analyze(request, rules),
            price_suggestion: self.suggest(request, rules),
        }
    }
}
