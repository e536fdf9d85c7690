//! Marketplace rule files: identifiers, loading, and defaulted lookups.

pub mod marketplace;
pub mod repository;

pub use marketplace::Marketplace;
pub use repository::{FeeKind, FeeRule, RuleOperator, RuleRepository, RuleSet};
