//! Request and result models for pricing calculations.
//!
//! Field names are wire-compatible with the JSON payloads the existing
//! calculator frontend sends and receives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single pricing request. Immutable input, no identity beyond the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Acquisition cost of the product.
    pub product_cost: f64,
    /// Packaging cost per unit.
    pub packaging_cost: f64,
    /// Price to analyze. Absent or zero skips the analysis.
    #[serde(default)]
    pub current_sale_price: Option<f64>,
    /// Target profit margin in percentage points. Absent or zero skips
    /// the suggestion.
    #[serde(default)]
    pub desired_margin: Option<f64>,
    /// Tax burden in percentage points of the sale price.
    #[serde(default)]
    pub tax_percent: f64,
    /// Ads investment in percentage points of the sale price.
    #[serde(default)]
    pub ads_investment_percent: f64,
    /// Mercado Livre listing type.
    #[serde(default)]
    pub listing_type: ListingType,
    /// Mercado Livre logistics mode.
    #[serde(default)]
    pub logistics_type: LogisticsType,
    /// Shipping weight in kilograms.
    #[serde(default = "default_weight_kg")]
    pub weight_kg: f64,
    /// Seller is registered as an individual (CPF) rather than a company.
    #[serde(default)]
    pub is_cpf: bool,
    /// Order volume over the last 90 days.
    #[serde(default)]
    pub orders_last_90_days: i64,
    /// Seller opted into the Shopee free-shipping program.
    #[serde(default = "default_use_free_shipping")]
    pub use_free_shipping: bool,
    /// Days since the seller registered on SHEIN.
    #[serde(default = "default_days_since_registration")]
    pub shein_days_since_registration: i64,
}

fn default_weight_kg() -> f64 {
    0.5
}

fn default_use_free_shipping() -> bool {
    true
}

fn default_days_since_registration() -> i64 {
    999
}

impl PricingRequest {
    /// Returns the sale price to analyze, if one was given and is
    /// strictly positive.
    pub fn analysis_price(&self) -> Option<f64> {
        self.current_sale_price.filter(|p| *p > 0.0)
    }

    /// Returns the desired margin in percentage points, if one was given
    /// and is strictly positive.
    pub fn suggestion_margin(&self) -> Option<f64> {
        self.desired_margin.filter(|m| *m > 0.0)
    }
}

/// Mercado Livre listing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    #[default]
    Premium,
    #[serde(alias = "classico")]
    Classic,
}

impl ListingType {
    /// Returns the commission-table key for this listing type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Premium => "premium",
            ListingType::Classic => "classic",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "premium" => Ok(ListingType::Premium),
            "classic" | "classico" => Ok(ListingType::Classic),
            _ => Err(ParseModeError { kind: "listing type", value: s.to_string() }),
        }
    }
}

/// Mercado Livre logistics mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogisticsType {
    #[default]
    #[serde(alias = "padrao")]
    Standard,
    Fulfillment,
}

impl LogisticsType {
    /// Returns the logistics-rules key for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogisticsType::Standard => "standard",
            LogisticsType::Fulfillment => "fulfillment",
        }
    }
}

impl fmt::Display for LogisticsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogisticsType {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" | "padrao" => Ok(LogisticsType::Standard),
            "fulfillment" | "full" => Ok(LogisticsType::Fulfillment),
            _ => Err(ParseModeError { kind: "logistics type", value: s.to_string() }),
        }
    }
}

/// Error for unrecognized listing/logistics mode names.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
}

/// Per-component cost values, each with its percentage of the price it
/// was computed against. Shipping only applies to marketplaces that
/// model it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CostComponents {
    pub fixed_fee: f64,
    pub fixed_fee_pct: f64,
    pub tax: f64,
    pub tax_pct: f64,
    pub ads: f64,
    pub ads_pct: f64,
    pub commission: f64,
    pub commission_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_pct: Option<f64>,
    pub product_cost: f64,
    pub product_cost_pct: f64,
    pub packaging_cost: f64,
    pub packaging_cost_pct: f64,
    pub total_costs: f64,
    pub total_costs_pct: f64,
    pub real_profit: f64,
    pub profit_pct: f64,
}

/// Cost decomposition of a given sale price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub analyzed_price: f64,
    #[serde(flatten)]
    pub components: CostComponents,
}

/// Solved price for a target margin, with its cost decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub target_margin_percent: f64,
    pub suggested_price: f64,
    #[serde(flatten)]
    pub components: CostComponents,
}

/// Analysis block of a marketplace result.
///
/// Serializes to the breakdown object, the blocked-price error object, or
/// `{}` when no sale price was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Analysis {
    Blocked { error: String },
    Priced(CostBreakdown),
    Empty {},
}

/// Error message emitted when the fee table blocks a price tier.
pub const BLOCKED_PRICE_ERROR: &str = "Invalid price (Blocked)";

impl Analysis {
    /// The blocked-price error object.
    pub fn blocked() -> Self {
        Analysis::Blocked { error: BLOCKED_PRICE_ERROR.to_string() }
    }

    /// Returns the breakdown if the analysis produced one.
    pub fn breakdown(&self) -> Option<&CostBreakdown> {
        match self {
            Analysis::Priced(breakdown) => Some(breakdown),
            _ => None,
        }
    }

    /// Returns true for the empty analysis.
    pub fn is_empty(&self) -> bool {
        matches!(self, Analysis::Empty {})
    }
}

/// Suggestion block of a marketplace result.
///
/// Serializes to the suggestion object, or `{}` when no margin was given
/// or the margin is unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Suggestion {
    Solved(PriceSuggestion),
    Empty {},
}

impl Suggestion {
    /// Returns the suggestion if one was solved.
    pub fn solved(&self) -> Option<&PriceSuggestion> {
        match self {
            Suggestion::Solved(suggestion) => Some(suggestion),
            Suggestion::Empty {} => None,
        }
    }

    /// Returns true for the empty suggestion.
    pub fn is_empty(&self) -> bool {
        matches!(self, Suggestion::Empty {})
    }
}

/// One marketplace's analysis and suggestion for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceResult {
    /// Marketplace display label.
    pub marketplace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logistics_type: Option<String>,
    /// Seller tier label (e.g. "High Volume CPF", "New Seller").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_type: Option<String>,
    pub current_analysis: Analysis,
    pub price_suggestion: Suggestion,
}

/// Success envelope wrapping the ordered marketplace results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub data: Vec<MarketplaceResult>,
}

impl Envelope {
    /// Wraps results in a success envelope.
    pub fn ok(data: Vec<MarketplaceResult>) -> Self {
        Self { success: true, data }
    }
}
