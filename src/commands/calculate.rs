//! Calculate command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::marketplaces::evaluate_all;
use crate::models::PricingRequest;
use crate::rules::RuleRepository;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Runs a pricing calculation across all marketplaces.
pub struct CalculateCommand {
    config: Config,
}

impl CalculateCommand {
    /// Creates a new calculate command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the calculation and returns formatted output.
    pub fn execute(&self, request: &PricingRequest) -> Result<String> {
        let repository = RuleRepository::new(self.config.rules_dir.clone());
        self.execute_with_repository(&repository, request)
    }

    /// Executes the calculation with a provided repository (for testing).
    pub fn execute_with_repository(
        &self,
        repository: &RuleRepository,
        request: &PricingRequest,
    ) -> Result<String> {
        info!(
            "Calculating: product_cost={} packaging_cost={}",
            request.product_cost, request.packaging_cost
        );
        debug!("Rules dir: {}", repository.rules_dir().display());

        let results = evaluate_all(request, repository);
        info!("Computed {} marketplace results", results.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_results(&results))
    }

    /// Reads a pricing request from a JSON file.
    pub fn read_request(path: impl AsRef<Path>) -> Result<PricingRequest> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse request file: {}", path.display()))
    }
}
