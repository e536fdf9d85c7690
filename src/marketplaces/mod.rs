//! Marketplace calculators: one per marketplace, plus the aggregator
//! that runs them all for a single request.

pub mod fees;
pub mod mercado_livre;
pub mod shein;
pub mod shopee;

use crate::models::{
    Analysis, ListingType, LogisticsType, MarketplaceResult, PricingRequest, Suggestion,
};
use crate::rules::{Marketplace, RuleRepository, RuleSet};

pub use mercado_livre::MercadoLivreCalculator;
pub use shein::SheinCalculator;
pub use shopee::ShopeeCalculator;

/// A marketplace's pricing logic.
///
/// `analyze` decomposes a given sale price into cost components;
/// `suggest` solves for the price that reaches a target margin. Both
/// return their empty variant when the triggering input is absent or
/// non-positive.
pub trait Calculator {
    /// The marketplace this calculator prices for.
    fn marketplace(&self) -> Marketplace;

    /// Decomposes the request's current sale price into cost components.
    fn analyze(&self, request: &PricingRequest, rules: &RuleSet) -> Analysis;

    /// Solves for the sale price that yields the desired margin.
    fn suggest(&self, request: &PricingRequest, rules: &RuleSet) -> Suggestion;

    /// Runs both computations and labels the result.
    fn evaluate(&self, request: &PricingRequest, rules: &RuleSet) -> MarketplaceResult;
}

/// Runs every marketplace calculator for one request and returns the
/// results in a fixed order: Mercado Livre premium, Mercado Livre
/// classic, Shopee, SHEIN.
///
/// Rule sets are re-loaded per invocation; no caching. No ranking is
/// applied across marketplaces.
///
/// Both Mercado Livre rows run under the standard logistics mode; the
/// request's `logistics_type` field is accepted on the wire but does
/// not change the rows produced here.
pub fn evaluate_all(
    request: &PricingRequest,
    repository: &RuleRepository,
) -> Vec<MarketplaceResult> {
    let calculators: [Box<dyn Calculator>; 4] = [
        Box::new(MercadoLivreCalculator::new(ListingType::Premium, LogisticsType::default())),
        Box::new(MercadoLivreCalculator::new(ListingType::Classic, LogisticsType::default())),
        Box::new(ShopeeCalculator::new()),
        Box::new(SheinCalculator::new()),
    ];

    calculators
        .iter()
        .map(|calc| {
            let rules = repository.load(calc.marketplace());
            calc.evaluate(request, &rules)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_request() -> PricingRequest {
        serde_json::from_str(
            r#"{"product_cost": 10.0, "packaging_cost": 2.0,
                "current_sale_price": 50.0, "desired_margin": 20.0}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_evaluate_all_order_and_labels() {
        // Empty rules dir: everything runs on defaults
        let dir = TempDir::new().unwrap();
        let repo = RuleRepository::new(Some(dir.path().to_path_buf()));

        let results = evaluate_all(&make_request(), &repo);
        assert_eq!(results.len(), 4);

        assert_eq!(results[0].marketplace, "Mercado Livre");
        assert_eq!(results[0].listing_type.as_deref(), Some("premium"));
        assert_eq!(results[0].logistics_type.as_deref(), Some("standard"));

        assert_eq!(results[1].marketplace, "Mercado Livre");
        assert_eq!(results[1].listing_type.as_deref(), Some("classic"));

        assert_eq!(results[2].marketplace, "Shopee");
        assert_eq!(results[3].marketplace, "SHEIN");
    }

    #[test]
    fn test_evaluate_all_ignores_request_logistics_mode() {
        let dir = TempDir::new().unwrap();
        let repo = RuleRepository::new(Some(dir.path().to_path_buf()));

        let request: PricingRequest = serde_json::from_str(
            r#"{"product_cost": 10.0, "packaging_cost": 2.0,
                "current_sale_price": 50.0, "logistics_type": "fulfillment"}"#,
        )
        .unwrap();
        let results = evaluate_all(&request, &repo);
        assert_eq!(results[0].logistics_type.as_deref(), Some("standard"));
        assert_eq!(results[1].logistics_type.as_deref(), Some("standard"));
    }

    #[test]
    fn test_evaluate_all_produces_breakdowns_on_defaults() {
        let dir = TempDir::new().unwrap();
        let repo = RuleRepository::new(Some(dir.path().to_path_buf()));

        let results = evaluate_all(&make_request(), &repo);
        for result in &results {
            assert!(result.current_analysis.breakdown().is_some(), "{}", result.marketplace);
            assert!(result.price_suggestion.solved().is_some(), "{}", result.marketplace);
        }
    }

    #[test]
    fn test_evaluate_all_empty_request_yields_empty_blocks() {
        let dir = TempDir::new().unwrap();
        let repo = RuleRepository::new(Some(dir.path().to_path_buf()));

        let request: PricingRequest =
            serde_json::from_str(r#"{"product_cost": 10.0, "packaging_cost": 2.0}"#).unwrap();
        let results = evaluate_all(&request, &repo);
        for result in &results {
            assert!(result.current_analysis.is_empty());
            assert!(result.price_suggestion.is_empty());
        }
    }
}
