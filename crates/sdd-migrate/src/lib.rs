//! # sdd-migrate
//!
//! Relationship migration engine for bundles moving from source-holds-reference
//! to target-holds-reference.
//!
//! - [`field`]: synthesizes the back-reference property added to target schemas
//! - [`migrator`]: plans and commits one [`MigrationRule`](sdd_core::MigrationRule)
//! - [`driver`]: runs a rule set in order with per-rule failure isolation
//! - [`cleanup`]: prunes undeclared fields and normalizes relationship titles
//!
//! Every write goes through a [`WriteMode`]; a dry run computes the same plan
//! as a live run and only skips the writes.

pub mod cleanup;
pub mod confirm;
pub mod driver;
pub mod error;
pub mod field;
pub mod migrator;
pub mod mode;
pub mod plan;
pub mod stats;

pub use cleanup::{Cleanup, CleanupOutcome, CleanupReport};
pub use confirm::{AssumeYes, Confirm, LineConfirm};
pub use driver::{Driver, RuleReport, RunOutcome, RunReport};
pub use error::MigrateError;
pub use migrator::Migrator;
pub use mode::WriteMode;
pub use plan::RulePlan;
pub use stats::{CleanupStats, MigrationStats};
