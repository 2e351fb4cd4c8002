//! # sdd-core
//!
//! Core types shared across the sdd-relink crates:
//! - `EntityType`, the closed set of bundle entity types and their folders
//! - `MigrationRule` and `RuleSet`, validated once at load time
//! - The built-in rule catalog and the canonical relationship titles
//! - `RuleError` for rule validation and rule-file parsing

pub mod catalog;
pub mod enums;
pub mod errors;
pub mod rule;

pub use enums::{Cardinality, EntityType};
pub use errors::RuleError;
pub use rule::{MigrationRule, RuleSet};
