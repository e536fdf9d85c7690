//! Output formatting for marketplace results (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::models::{Analysis, CostComponents, Envelope, MarketplaceResult, Suggestion};

/// Formats marketplace results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the full result set.
    pub fn format_results(&self, results: &[MarketplaceResult]) -> String {
        match self.format {
            OutputFormat::Json => self.json_results(results),
            OutputFormat::Table => self.table_results(results),
            OutputFormat::Markdown => self.markdown_results(results),
            OutputFormat::Csv => self.csv_results(results),
        }
    }

    // JSON formatting

    fn json_results(&self, results: &[MarketplaceResult]) -> String {
        let envelope = Envelope::ok(results.to_vec());
        serde_json::to_string_pretty(&envelope)
            .unwrap_or_else(|_| r#"{"success":false,"data":[]}"#.to_string())
    }

    // Table formatting

    fn table_results(&self, results: &[MarketplaceResult]) -> String {
        if results.is_empty() {
            return "No results.".to_string();
        }

        let mut lines = Vec::new();
        for result in results {
            lines.push(section_title(result));
            lines.push("-".repeat(48));

            match &result.current_analysis {
                Analysis::Blocked { error } => {
                    lines.push(format!("Analysis: {}", error));
                }
                Analysis::Priced(breakdown) => {
                    lines.push(format!("Analyzed price:  {:>10.2}", breakdown.analyzed_price));
                    lines.extend(component_lines(&breakdown.components));
                }
                Analysis::Empty {} => {
                    lines.push("Analysis: skipped (no sale price given)".to_string());
                }
            }

            match &result.price_suggestion {
                Suggestion::Solved(suggestion) => {
                    lines.push(format!(
                        "Suggested price: {:>10.2}  (target margin {}%)",
                        suggestion.suggested_price, suggestion.target_margin_percent
                    ));
                    lines.push(format!(
                        "  profit {:.2} ({:.2}%), total costs {:.2}",
                        suggestion.components.real_profit,
                        suggestion.components.profit_pct,
                        suggestion.components.total_costs
                    ));
                }
                Suggestion::Empty {} => {
                    lines.push("Suggestion: none (no margin given or unreachable)".to_string());
                }
            }

            lines.push(String::new());
        }

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_results(&self, results: &[MarketplaceResult]) -> String {
        let mut lines = Vec::new();
        lines.push(
            "| Marketplace | Mode | Seller tier | Price | Profit | Profit % | Suggested |"
                .to_string(),
        );
        lines.push("|---|---|---|---|---|---|---|".to_string());

        for result in results {
            let row = SummaryRow::from_result(result);
            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} | {} |",
                row.marketplace,
                row.mode,
                row.seller_tier,
                row.price,
                row.profit,
                row.profit_pct,
                row.suggested
            ));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "marketplace,mode,seller_tier,price,profit,profit_pct,suggested".to_string()
    }

    fn csv_results(&self, results: &[MarketplaceResult]) -> String {
        let mut lines = vec![self.csv_header()];
        for result in results {
            let row = SummaryRow::from_result(result);
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                csv_escape(&row.marketplace),
                csv_escape(&row.mode),
                csv_escape(&row.seller_tier),
                row.price,
                row.profit,
                row.profit_pct,
                row.suggested
            ));
        }
        lines.join("\n")
    }
}

/// One summary line per marketplace for the tabular formats.
struct SummaryRow {
    marketplace: String,
    mode: String,
    seller_tier: String,
    price: String,
    profit: String,
    profit_pct: String,
    suggested: String,
}

impl SummaryRow {
    fn from_result(result: &MarketplaceResult) -> Self {
        let mode = match (&result.listing_type, &result.logistics_type) {
            (Some(listing), Some(logistics)) => format!("{} / {}", listing, logistics),
            (Some(listing), None) => listing.clone(),
            (None, Some(logistics)) => logistics.clone(),
            (None, None) => "-".to_string(),
        };

        let (price, profit, profit_pct) = match &result.current_analysis {
            Analysis::Blocked { .. } => {
                ("blocked".to_string(), "-".to_string(), "-".to_string())
            }
            Analysis::Priced(breakdown) => (
                format!("{:.2}", breakdown.analyzed_price),
                format!("{:.2}", breakdown.components.real_profit),
                format!("{:.2}", breakdown.components.profit_pct),
            ),
            Analysis::Empty {} => ("-".to_string(), "-".to_string(), "-".to_string()),
        };

        let suggested = match &result.price_suggestion {
            Suggestion::Solved(suggestion) => format!("{:.2}", suggestion.suggested_price),
            Suggestion::Empty {} => "-".to_string(),
        };

        Self {
            marketplace: result.marketplace.clone(),
            mode,
            seller_tier: result.seller_type.clone().unwrap_or_else(|| "-".to_string()),
            price,
            profit,
            profit_pct,
            suggested,
        }
    }
}

fn section_title(result: &MarketplaceResult) -> String {
    let mut title = result.marketplace.clone();
    let mut labels = Vec::new();
    if let Some(listing) = &result.listing_type {
        labels.push(listing.clone());
    }
    if let Some(logistics) = &result.logistics_type {
        labels.push(logistics.clone());
    }
    if let Some(seller) = &result.seller_type {
        labels.push(seller.clone());
    }
    if !labels.is_empty() {
        title.push_str(&format!(" ({})", labels.join(" / ")));
    }
    title
}

fn component_lines(components: &CostComponents) -> Vec<String> {
    let mut lines = vec![
        format!("  commission     {:>10.2}  ({:.2}%)", components.commission, components.commission_pct),
        format!("  fixed fee      {:>10.2}  ({:.2}%)", components.fixed_fee, components.fixed_fee_pct),
    ];
    if let (Some(shipping), Some(shipping_pct)) = (components.shipping, components.shipping_pct) {
        lines.push(format!("  shipping       {:>10.2}  ({:.2}%)", shipping, shipping_pct));
    }
    lines.push(format!("  tax            {:>10.2}  ({:.2}%)", components.tax, components.tax_pct));
    lines.push(format!("  ads            {:>10.2}  ({:.2}%)", components.ads, components.ads_pct));
    lines.push(format!(
        "  product cost   {:>10.2}  ({:.2}%)",
        components.product_cost, components.product_cost_pct
    ));
    lines.push(format!(
        "  packaging      {:>10.2}  ({:.2}%)",
        components.packaging_cost, components.packaging_cost_pct
    ));
    lines.push(format!(
        "  total costs    {:>10.2}  ({:.2}%)",
        components.total_costs, components.total_costs_pct
    ));
    lines.push(format!(
        "  profit         {:>10.2}  ({:.2}%)",
        components.real_profit, components.profit_pct
    ));
    lines
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostBreakdown, PriceSuggestion};

    fn make_result() -> MarketplaceResult {
        MarketplaceResult {
            marketplace: "Mercado Livre".to_string(),
            listing_type: Some("premium".to_string()),
            logistics_type: Some("standard".to_string()),
            seller_type: None,
            current_analysis: Analysis::Priced(CostBreakdown {
                analyzed_price: 50.0,
                components: CostComponents {
                    commission: 8.5,
                    commission_pct: 17.0,
                    fixed_fee: 6.5,
                    fixed_fee_pct: 13.0,
                    shipping: Some(0.0),
                    shipping_pct: Some(0.0),
                    total_costs: 27.0,
                    total_costs_pct: 54.0,
                    real_profit: 23.0,
                    profit_pct: 46.0,
                    ..Default::default()
                },
            }),
            price_suggestion: Suggestion::Solved(PriceSuggestion {
                target_margin_percent: 20.0,
                suggested_price: 28.97,
                components: CostComponents {
                    real_profit: 5.8,
                    profit_pct: 20.02,
                    total_costs: 23.17,
                    ..Default::default()
                },
            }),
        }
    }

    fn make_empty_result() -> MarketplaceResult {
        MarketplaceResult {
            marketplace: "SHEIN".to_string(),
            listing_type: Some("Standard".to_string()),
            logistics_type: None,
            seller_type: Some("New Seller".to_string()),
            current_analysis: Analysis::Empty {},
            price_suggestion: Suggestion::Empty {},
        }
    }

    #[test]
    fn test_json_envelope() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format_results(&[make_result()]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["data"][0]["marketplace"], "Mercado Livre");
        assert_eq!(parsed["data"][0]["current_analysis"]["commission"], 8.5);
    }

    #[test]
    fn test_table_output() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_results(&[make_result()]);

        assert!(output.contains("Mercado Livre (premium / standard)"));
        assert!(output.contains("Analyzed price:"));
        assert!(output.contains("50.00"));
        assert!(output.contains("Suggested price:"));
        assert!(output.contains("28.97"));
    }

    #[test]
    fn test_table_output_empty_blocks() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_results(&[make_empty_result()]);

        assert!(output.contains("SHEIN (Standard / New Seller)"));
        assert!(output.contains("Analysis: skipped"));
        assert!(output.contains("Suggestion: none"));
    }

    #[test]
    fn test_table_output_blocked() {
        let formatter = Formatter::new(OutputFormat::Table);
        let mut result = make_result();
        result.current_analysis = Analysis::blocked();

        let output = formatter.format_results(&[result]);
        assert!(output.contains("Invalid price (Blocked)"));
    }

    #[test]
    fn test_table_no_results() {
        let formatter = Formatter::new(OutputFormat::Table);
        assert_eq!(formatter.format_results(&[]), "No results.");
    }

    #[test]
    fn test_markdown_output() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        let output = formatter.format_results(&[make_result(), make_empty_result()]);

        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("| Marketplace |"));
        assert!(lines[1].starts_with("|---"));
        assert!(lines[2].contains("| Mercado Livre | premium / standard |"));
        assert!(lines[2].contains("| 28.97 |"));
        assert!(lines[3].contains("| SHEIN | Standard | New Seller | - | - | - | - |"));
    }

    #[test]
    fn test_csv_output() {
        let formatter = Formatter::new(OutputFormat::Csv);
        let output = formatter.format_results(&[make_result()]);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "marketplace,mode,seller_tier,price,profit,profit_pct,suggested");
        assert_eq!(lines[1], "Mercado Livre,premium / standard,-,50.00,23.00,46.00,28.97");
    }

    #[test]
    fn test_csv_output_empty_results() {
        let formatter = Formatter::new(OutputFormat::Csv);
        let output = formatter.format_results(&[]);
        assert_eq!(output, "marketplace,mode,seller_tier,price,profit,profit_pct,suggested");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(csv_escape("with\"quote"), "\"with\"\"quote\"");
    }
}
