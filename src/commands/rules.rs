//! Rules command implementation: shows the effective rule set for a
//! marketplace, or reports that defaults are in effect.

use crate::config::Config;
use crate::rules::{Marketplace, RuleRepository};
use anyhow::{Context, Result};
use tracing::info;

/// Dumps the loaded rule set for one marketplace.
pub struct RulesCommand {
    config: Config,
}

impl RulesCommand {
    /// Creates a new rules command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads and renders the rule set.
    pub fn execute(&self, marketplace: Marketplace) -> Result<String> {
        let repository = RuleRepository::new(self.config.rules_dir.clone());
        info!("Loading rules for {}", marketplace.label());

        let rules = repository.load(marketplace);
        if rules.is_empty() {
            return Ok(format!(
                "No rules loaded for {} from {} (built-in defaults apply).",
                marketplace.label(),
                repository.rules_dir().join(marketplace.rules_file()).display()
            ));
        }

        serde_json::to_string_pretty(rules.raw())
            .with_context(|| format!("Failed to render rules for {}", marketplace.label()))
    }
}
