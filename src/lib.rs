//! mkt-pricer - Fast, stateless marketplace pricing calculator CLI
//!
//! Computes seller cost breakdowns and margin-based price suggestions
//! for Mercado Livre, Shopee, and SHEIN from per-marketplace rule files.

pub mod commands;
pub mod config;
pub mod format;
pub mod marketplaces;
pub mod models;
pub mod percent;
pub mod rules;

pub use config::Config;
pub use marketplaces::{evaluate_all, Calculator};
pub use models::{Envelope, MarketplaceResult, PricingRequest};
pub use rules::{Marketplace, RuleRepository, RuleSet};
