//! Supported marketplaces and their rule-file locations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplaces the calculator knows how to price for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    #[default]
    MercadoLivre,
    Shopee,
    Shein,
}

impl Marketplace {
    /// Returns the display label used in results.
    pub fn label(&self) -> &'static str {
        match self {
            Marketplace::MercadoLivre => "Mercado Livre",
            Marketplace::Shopee => "Shopee",
            Marketplace::Shein => "SHEIN",
        }
    }

    /// Returns the rule file name for this marketplace.
    pub fn rules_file(&self) -> &'static str {
        match self {
            Marketplace::MercadoLivre => "rules_mercadolivre.json",
            Marketplace::Shopee => "rules_shopee.json",
            Marketplace::Shein => "rules_shein.json",
        }
    }

    /// Returns the root key under which the rule file nests its tables.
    pub fn root_key(&self) -> &'static str {
        match self {
            Marketplace::MercadoLivre => "ml_rules",
            Marketplace::Shopee => "shopee_rules",
            Marketplace::Shein => "shein_rules",
        }
    }

    /// Returns all supported marketplaces.
    pub fn all() -> &'static [Marketplace] {
        &[Marketplace::MercadoLivre, Marketplace::Shopee, Marketplace::Shein]
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Marketplace::MercadoLivre => "mercadolivre",
            Marketplace::Shopee => "shopee",
            Marketplace::Shein => "shein",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Marketplace {
    type Err = ParseMarketplaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mercadolivre" | "mercado-livre" | "ml" => Ok(Marketplace::MercadoLivre),
            "shopee" => Ok(Marketplace::Shopee),
            "shein" => Ok(Marketplace::Shein),
            _ => Err(ParseMarketplaceError(s.to_string())),
        }
    }
}

/// Error for unrecognized marketplace names.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown marketplace '{0}'. Valid marketplaces: mercadolivre (ml), shopee, shein")]
pub struct ParseMarketplaceError(String);
