//! Shopee calculator: capped commission, regressive fixed fee, and the
//! CPF high-volume seller tier.

use crate::marketplaces::fees;
use crate::marketplaces::Calculator;
use crate::models::{
    Analysis, CostBreakdown, CostComponents, MarketplaceResult, PriceSuggestion, PricingRequest,
    Suggestion,
};
use crate::percent::{as_fraction, percent_from_total, round2};
use crate::rules::{Marketplace, RuleSet};
use tracing::debug;

const DEFAULT_BASE_COMMISSION: f64 = 0.14;
const DEFAULT_FREE_SHIPPING_SURCHARGE: f64 = 0.06;
const DEFAULT_BASE_FIXED_FEE: f64 = 4.00;
const DEFAULT_CPF_EXTRA_FEE: f64 = 3.00;
const DEFAULT_CPF_VOLUME_THRESHOLD: i64 = 450;
const DEFAULT_COMMISSION_CAP: f64 = 100.00;
const DEFAULT_REGRESSIVE_THRESHOLD: f64 = 12.00;
const DEFAULT_LOW_VALUE_THRESHOLD: f64 = 8.00;

/// Iteration cap for the margin solve.
const MAX_SOLVE_ITERATIONS: usize = 10;
/// Successive estimates closer than this are considered converged.
const SOLVE_TOLERANCE: f64 = 0.05;

/// Seller profile resolved from the request and rule set.
struct SellerProfile {
    commission_rate: f64,
    base_fee: f64,
    high_volume: bool,
    commission_cap: f64,
    regressive_threshold: f64,
    low_value_threshold: f64,
}

/// Prices a listing on Shopee.
pub struct ShopeeCalculator;

impl ShopeeCalculator {
    /// Creates a Shopee calculator.
    pub fn new() -> Self {
        Self
    }

    fn profile(&self, request: &PricingRequest, rules: &RuleSet) -> SellerProfile {
        let mut commission_rate =
            rules.rate(&["percentages", "base_commission"], DEFAULT_BASE_COMMISSION);
        if request.use_free_shipping {
            commission_rate +=
                rules.rate(&["percentages", "free_shipping_program"], DEFAULT_FREE_SHIPPING_SURCHARGE);
        }

        let mut base_fee = rules.amount(&["fixed_fees", "standard"], DEFAULT_BASE_FIXED_FEE);
        let volume_threshold =
            rules.count(&["limits", "cpf_high_volume_threshold_orders"], DEFAULT_CPF_VOLUME_THRESHOLD);
        let high_volume = request.is_cpf && request.orders_last_90_days > volume_threshold;
        if high_volume {
            base_fee += rules.amount(&["fixed_fees", "cpf_extra"], DEFAULT_CPF_EXTRA_FEE);
        }

        SellerProfile {
            commission_rate,
            base_fee,
            high_volume,
            commission_cap: rules.amount(&["limits", "commission_cap"], DEFAULT_COMMISSION_CAP),
            regressive_threshold: rules
                .amount(&["limits", "regressive_threshold_price"], DEFAULT_REGRESSIVE_THRESHOLD),
            low_value_threshold: rules
                .amount(&["limits", "standard_low_value_threshold"], DEFAULT_LOW_VALUE_THRESHOLD),
        }
    }

    fn fee_at(&self, price: f64, profile: &SellerProfile) -> f64 {
        fees::regressive_fee(
            price,
            profile.base_fee,
            profile.regressive_threshold,
            profile.low_value_threshold,
        )
    }

    fn commission_at(&self, price: f64, profile: &SellerProfile) -> f64 {
        (price * profile.commission_rate).min(profile.commission_cap)
    }

    fn components_at(
        &self,
        price: f64,
        request: &PricingRequest,
        profile: &SellerProfile,
    ) -> CostComponents {
        let fixed_fee = self.fee_at(price, profile);
        let commission = self.commission_at(price, profile);
        let tax = as_fraction(request.tax_percent) * price;
        let ads = as_fraction(request.ads_investment_percent) * price;
        let total_costs =
            commission + fixed_fee + tax + ads + request.product_cost + request.packaging_cost;

        CostComponents {
            fixed_fee: round2(fixed_fee),
            fixed_fee_pct: percent_from_total(fixed_fee, price),
            tax: round2(tax),
            tax_pct: request.tax_percent,
            ads: round2(ads),
            ads_pct: request.ads_investment_percent,
            commission: round2(commission),
            // Cap-aware: derived from the charged amount, not the rate
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

impl Default for ShopeeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator for ShopeeCalculator {
    fn marketplace(&self) -> Marketplace {
        Marketplace::Shopee
    }

    fn analyze(&self, request: &PricingRequest, rules: &RuleSet) -> Analysis {
        let Some(price) = request.analysis_price() else {
            return Analysis::Empty {};
        };

        let profile = self.profile(request, rules);
        Analysis::Priced(CostBreakdown {
            analyzed_price: price,
            components: self.components_at(price, request, &profile),
        })
    }

    fn suggest(&self, request: &PricingRequest, rules: &RuleSet) -> Suggestion {
        let Some(margin) = request.suggestion_margin() else {
            return Suggestion::Empty {};
        };

        let profile = self.profile(request, rules);

        // Fixed-point iteration: the fee and capped commission depend on
        // the price, so re-solve until the estimate settles. A
        // non-converged last estimate is still returned.
        let mut price_guess = request.product_cost * 2.0;
        for iteration in 0..MAX_SOLVE_ITERATIONS {
            let fixed_fee = self.fee_at(price_guess, &profile);
            let commission = self.commission_at(price_guess, &profile);
            let cash_needed =
                request.product_cost + request.packaging_cost + fixed_fee + commission;

            let divisor = 1.0
                - as_fraction(request.tax_percent)
                - as_fraction(request.ads_investment_percent)
                - as_fraction(margin);
            if divisor <= 0.0 {
                debug!("Margin {}% is unreachable (divisor {})", margin, divisor);
                return Suggestion::Empty {};
            }

            let new_price = cash_needed / divisor;
            let converged = (new_price - price_guess).abs() < SOLVE_TOLERANCE;
            price_guess = new_price;
            if converged {
                debug!("Solve converged after {} iterations", iteration + 1);
                break;
            }
        }

        Suggestion::Solved(PriceSuggestion {
            target_margin_percent: margin,
            suggested_price: round2(price_guess),
            components: self.components_at(price_guess, request, &profile),
        })
    }

    fn evaluate(&self, request: &PricingRequest, rules: &RuleSet) -> MarketplaceResult {
        let profile = self.profile(request, rules);
        let seller_type = if profile.high_volume { "High Volume CPF" } else { "Standard" };

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
