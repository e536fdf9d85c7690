//! Rule-file loading and defaulted lookups.
//!
//! Rule files are best-effort: a missing or malformed file degrades to an
//! empty rule set and every lookup falls back to its call-site default. A
//! pricing estimate with stale defaults beats a hard failure here.

use crate::rules::marketplace::Marketplace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default directory for shipped rule files.
pub const DEFAULT_RULES_DIR: &str = "rules";

/// Loads per-marketplace rule sets from JSON files on disk.
#[derive(Debug, Clone)]
pub struct RuleRepository {
    rules_dir: PathBuf,
}

impl RuleRepository {
    /// Creates a repository reading from the given directory, or the
    /// default `rules/` directory when none is configured.
    pub fn new(rules_dir: Option<PathBuf>) -> Self {
        Self { rules_dir: rules_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_DIR)) }
    }

    /// Returns the directory rule files are read from.
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Loads the rule set for a marketplace. Re-reads the file on every
    /// call; any read or parse failure yields an empty rule set.
    pub fn load(&self, marketplace: Marketplace) -> RuleSet {
        let path = self.rules_dir.join(marketplace.rules_file());
        debug!("Loading rules from: {}", path.display());

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warn!("Could not read {}: {}; using defaults", path.display(), err);
                return RuleSet::empty();
            }
        };

        let root: Value = match serde_json::from_str(&content) {
            Ok(root) => root,
            Err(err) => {
                warn!("Could not parse {}: {}; using defaults", path.display(), err);
                return RuleSet::empty();
            }
        };

        match root.get(marketplace.root_key()) {
            Some(rules) => RuleSet::new(rules.clone()),
            None => {
                warn!(
                    "Missing '{}' key in {}; using defaults",
                    marketplace.root_key(),
                    path.display()
                );
                RuleSet::empty()
            }
        }
    }
}

/// A loaded rule table with defaulted lookups.
///
/// Wraps the raw JSON so callers name their fallback inline instead of
/// scattering `.get(...).unwrap_or(...)` chains.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    root: Value,
}

impl RuleSet {
    /// Wraps a raw rule value.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// An empty rule set; every lookup returns its default.
    pub fn empty() -> Self {
        Self { root: Value::Null }
    }

    /// Returns true if no rules were loaded.
    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Returns the raw rule value (for diagnostics output).
    pub fn raw(&self) -> &Value {
        &self.root
    }

    fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let mut node = &self.root;
        for key in path {
            node = node.get(key)?;
        }
        Some(node)
    }

    /// Looks up a fractional rate (e.g. a commission), falling back to
    /// `default` when the path is absent or not a number.
    pub fn rate(&self, path: &[&str], default: f64) -> f64 {
        self.lookup(path).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Looks up a monetary amount, falling back to `default`.
    pub fn amount(&self, path: &[&str], default: f64) -> f64 {
        self.lookup(path).and_then(Value::as_f64).unwrap_or(default)
    }

    /// Looks up an integer threshold, falling back to `default`.
    pub fn count(&self, path: &[&str], default: i64) -> i64 {
        self.lookup(path).and_then(Value::as_i64).unwrap_or(default)
    }

    /// Returns the fee table at `path`, sorted ascending by threshold.
    ///
    /// The sort happens on a local copy so a shared rule set is never
    /// mutated. Rules that fail to deserialize are skipped. An absent
    /// table is an empty list (no fee applies).
    pub fn fee_table(&self, path: &[&str]) -> Vec<FeeRule> {
        let mut table: Vec<FeeRule> = match self.lookup(path) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        };
        table.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        table
    }

    /// Returns the weight-keyed shipping cost table at `path`.
    pub fn shipping_table(&self, path: &[&str]) -> BTreeMap<String, f64> {
        match self.lookup(path) {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| v.as_f64().map(|cost| (k.clone(), cost)))
                .collect(),
            _ => BTreeMap::new(),
        }
    }
}

/// A single threshold rule in a fixed-fee table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRule {
    /// Comparison against the sale price.
    pub operator: RuleOperator,
    /// Price threshold the operator compares against.
    #[serde(rename = "opValue")]
    pub threshold: f64,
    /// Whether the tier carries a fixed fee or blocks the listing.
    #[serde(rename = "type")]
    pub kind: FeeKind,
    /// Fee amount for fixed tiers (ignored for blocked tiers).
    #[serde(default)]
    pub value: f64,
}

/// Comparison operator for a fee-table rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<=")]
    AtMost,
}

impl RuleOperator {
    /// Returns true if `price` falls in this rule's tier.
    pub fn matches(&self, price: f64, threshold: f64) -> bool {
        match self {
            RuleOperator::GreaterThan => price > threshold,
            RuleOperator::AtMost => price <= threshold,
        }
    }
}

/// Fee tier kind. Legacy rule files use the Portuguese spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    #[serde(alias = "fixo")]
    Fixed,
    #[serde(alias = "bloqueado")]
    Blocked,
}
