//! Integration tests for the pricing pipeline using fixture rule files.

use mkt_pricer::commands::CalculateCommand;
use mkt_pricer::config::{Config, OutputFormat};
use mkt_pricer::marketplaces::evaluate_all;
use mkt_pricer::models::PricingRequest;
use mkt_pricer::rules::{Marketplace, RuleRepository};
use std::path::PathBuf;

fn fixtures_repo() -> RuleRepository {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    RuleRepository::new(Some(dir))
}

fn make_request(json: &str) -> PricingRequest {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_full_calculation_flow() {
    let request = make_request(
        r#"{"product_cost": 10.0, "packaging_cost": 2.0,
            "current_sale_price": 50.0, "desired_margin": 20.0}"#,
    );

    let results = evaluate_all(&request, &fixtures_repo());
    assert_eq!(results.len(), 4);

    // Mercado Livre premium: commission 0.17 * 50 = 8.50 at 17%
    let ml_premium = &results[0];
    assert_eq!(ml_premium.marketplace, "Mercado Livre");
    assert_eq!(ml_premium.listing_type.as_deref(), Some("premium"));
    let breakdown = ml_premium.current_analysis.breakdown().unwrap();
    assert_eq!(breakdown.components.commission, 8.50);
    assert_eq!(breakdown.components.commission_pct, 17.0);
    assert_eq!(breakdown.components.fixed_fee, 6.5);
    assert_eq!(breakdown.components.shipping, Some(0.0));

    // Mercado Livre classic uses the 0.12 rate from the fixture
    let ml_classic = &results[1];
    assert_eq!(ml_classic.listing_type.as_deref(), Some("classic"));
    let breakdown = ml_classic.current_analysis.breakdown().unwrap();
    assert_eq!(breakdown.components.commission, 6.0);
    assert_eq!(breakdown.components.commission_pct, 12.0);

    // Shopee: 20% commission with the free-shipping program
    let shopee = &results[2];
    assert_eq!(shopee.marketplace, "Shopee");
    let breakdown = shopee.current_analysis.breakdown().unwrap();
    assert_eq!(breakdown.components.commission, 10.0);
    assert_eq!(breakdown.components.fixed_fee, 4.0);

    // SHEIN: standard 16% seller
    let shein = &results[3];
    assert_eq!(shein.marketplace, "SHEIN");
    assert_eq!(shein.seller_type.as_deref(), Some("Standard"));
    let breakdown = shein.current_analysis.breakdown().unwrap();
    assert_eq!(breakdown.components.commission, 8.0);

    // Every marketplace solved the 20% margin
    for result in &results {
        let solved = result.price_suggestion.solved().unwrap();
        assert_eq!(solved.target_margin_percent, 20.0);
        assert!(solved.suggested_price > 0.0);
    }
}

#[test]
fn test_blocked_price_error_object() {
    let request = make_request(
        r#"{"product_cost": 5.0, "packaging_cost": 1.0, "current_sale_price": 10.0}"#,
    );

    let results = evaluate_all(&request, &fixtures_repo());
    let json = serde_json::to_string(&results[0].current_analysis).unwrap();
    assert_eq!(json, r#"{"error":"Invalid price (Blocked)"}"#);

    // Shopee and SHEIN have no blocked tiers and still produce breakdowns
    assert!(results[2].current_analysis.breakdown().is_some());
    assert!(results[3].current_analysis.breakdown().is_some());
}

#[test]
fn test_free_shipping_threshold_behavior() {
    let repo = fixtures_repo();

    let at_limit = make_request(
        r#"{"product_cost": 30.0, "packaging_cost": 2.0,
            "current_sale_price": 79.0, "weight_kg": 1.8}"#,
    );
    let results = evaluate_all(&at_limit, &repo);
    let breakdown = results[0].current_analysis.breakdown().unwrap();
    // 2.0kg bracket from the fixture shipping table
    assert_eq!(breakdown.components.shipping, Some(24.9));

    let below_limit = make_request(
        r#"{"product_cost": 30.0, "packaging_cost": 2.0,
            "current_sale_price": 78.0, "weight_kg": 1.8}"#,
    );
    let results = evaluate_all(&below_limit, &repo);
    let breakdown = results[0].current_analysis.breakdown().unwrap();
    assert_eq!(breakdown.components.shipping, Some(0.0));
}

#[test]
fn test_shein_suggestion_closed_form_scenario() {
    // denominator = 1 - 0.20 - 0.16 = 0.64 -> 12 / 0.64 = 18.75
    let request =
        make_request(r#"{"product_cost": 10.0, "packaging_cost": 2.0, "desired_margin": 20.0}"#);

    let results = evaluate_all(&request, &fixtures_repo());
    let solved = results[3].price_suggestion.solved().unwrap();
    assert_eq!(solved.suggested_price, 18.75);
}

#[test]
fn test_shein_new_seller_rate() {
    let request = make_request(
        r#"{"product_cost": 10.0, "packaging_cost": 2.0, "current_sale_price": 50.0,
            "shein_days_since_registration": 10}"#,
    );

    let results = evaluate_all(&request, &fixtures_repo());
    let shein = &results[3];
    assert_eq!(shein.seller_type.as_deref(), Some("New Seller"));
    let breakdown = shein.current_analysis.breakdown().unwrap();
    assert_eq!(breakdown.components.commission, 0.0);
    assert_eq!(breakdown.components.commission_pct, 0.0);
}

#[test]
fn test_shopee_high_volume_cpf_tier() {
    let request = make_request(
        r#"{"product_cost": 10.0, "packaging_cost": 2.0, "current_sale_price": 50.0,
            "is_cpf": true, "orders_last_90_days": 500}"#,
    );

    let results = evaluate_all(&request, &fixtures_repo());
    let shopee = &results[2];
    assert_eq!(shopee.seller_type.as_deref(), Some("High Volume CPF"));
    // 4.00 base + 3.00 CPF surcharge
    let breakdown = shopee.current_analysis.breakdown().unwrap();
    assert_eq!(breakdown.components.fixed_fee, 7.0);
}

#[test]
fn test_shopee_suggestion_terminates_and_holds_margin() {
    let request = make_request(
        r#"{"product_cost": 40.0, "packaging_cost": 5.0, "desired_margin": 15.0,
            "tax_percent": 6.0, "ads_investment_percent": 3.0}"#,
    );

    let results = evaluate_all(&request, &fixtures_repo());
    let solved = results[2].price_suggestion.solved().unwrap();

    // The iterative solve converged close enough that the realized margin
    // sits near the target.
    assert!((solved.components.profit_pct - 15.0).abs() < 1.0);
    assert!(solved.suggested_price > 45.0);
}

#[test]
fn test_unreachable_margin_yields_empty_suggestions() {
    let request = make_request(
        r#"{"product_cost": 10.0, "packaging_cost": 2.0, "desired_margin": 95.0,
            "tax_percent": 10.0, "ads_investment_percent": 5.0}"#,
    );

    let results = evaluate_all(&request, &fixtures_repo());
    for result in &results {
        assert!(result.price_suggestion.is_empty(), "{}", result.marketplace);
    }
}

#[test]
fn test_legacy_payload_aliases() {
    // Payloads from the old frontend use Portuguese mode names
    let request = make_request(
        r#"{"product_cost": 10.0, "packaging_cost": 2.0, "current_sale_price": 50.0,
            "listing_type": "classico", "logistics_type": "padrao"}"#,
    );

    let results = evaluate_all(&request, &fixtures_repo());
    assert_eq!(results[0].logistics_type.as_deref(), Some("standard"));
}

#[test]
fn test_missing_rules_dir_degrades_to_defaults() {
    let repo = RuleRepository::new(Some(PathBuf::from("/nonexistent/rules")));
    let request = make_request(
        r#"{"product_cost": 10.0, "packaging_cost": 2.0, "current_sale_price": 50.0}"#,
    );

    let results = evaluate_all(&request, &repo);
    assert_eq!(results.len(), 4);

    // No fee table: no blocked tiers, zero fixed fee, default commission
    let breakdown = results[0].current_analysis.breakdown().unwrap();
    assert_eq!(breakdown.components.commission, 8.5);
    assert_eq!(breakdown.components.fixed_fee, 0.0);
}

#[test]
fn test_command_envelope_output() {
    let config = Config {
        rules_dir: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")),
        format: OutputFormat::Json,
    };
    let request = make_request(
        r#"{"product_cost": 10.0, "packaging_cost": 2.0,
            "current_sale_price": 50.0, "desired_margin": 20.0}"#,
    );

    let output = CalculateCommand::new(config).execute(&request).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed["success"], true);
    let data = parsed["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    assert_eq!(data[0]["current_analysis"]["commission"], 8.5);
    assert_eq!(data[3]["price_suggestion"]["suggested_price"], 18.75);
}

#[test]
fn test_rule_files_ship_with_the_crate() {
    // The shipped rules/ directory parses for every marketplace
    let repo =
        RuleRepository::new(Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("rules")));
    for marketplace in Marketplace::all() {
        assert!(!repo.load(*marketplace).is_empty(), "{}", marketplace);
    }
}
