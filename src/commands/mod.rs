//! CLI command implementations.

pub mod calculate;
pub mod rules;

pub use calculate::CalculateCommand;
pub use rules::RulesCommand;
