//! Migration driver: applies a rule set in order with per-rule isolation.

use sdd_core::RuleSet;
use serde::Serialize;

use crate::confirm::Confirm;
use crate::error::error_chain;
use crate::migrator::Migrator;
use crate::mode::WriteMode;
use crate::stats::MigrationStats;

/// Prompt shown before a live run.
pub const LIVE_PROMPT: &str = "Live mode: bundle files will be modified. Proceed?";

/// Result of one rule within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MigrationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuleReport {
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Aggregate result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub mode: WriteMode,
    pub totals: MigrationStats,
    pub rules: Vec<RuleReport>,
}

impl RunReport {
    #[must_use]
    pub fn failures(&self) -> usize {
        self.rules.iter().filter(|r| r.failed()).count()
    }
}

/// Whether the run happened at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The live-mode confirmation was declined; nothing was touched.
    Aborted,
    Completed(RunReport),
}

#[derive(Debug, Clone)]
pub struct Driver {
    migrator: Migrator,
}

impl Driver {
    #[must_use]
    pub const fn new(migrator: Migrator) -> Self {
        Self { migrator }
    }

    /// Run every rule, asking `confirm` first when `mode` is live.
    pub fn run(&self, rules: &RuleSet, mode: WriteMode, confirm: &mut dyn Confirm) -> RunOutcome {
        if mode == WriteMode::Live && !confirm.confirm(LIVE_PROMPT) {
            tracing::warn!("confirmation declined; aborting without changes");
            return RunOutcome::Aborted;
        }
        RunOutcome::Completed(self.run_unchecked(rules, mode))
    }

    /// Run every rule without the confirmation gate.
    ///
    /// A failing rule is logged with its full cause chain and recorded in the
    /// report; the remaining rules still run.
    pub fn run_unchecked(&self, rules: &RuleSet, mode: WriteMode) -> RunReport {
        tracing::info!(%mode, rules = rules.len(), "starting relationship migration");

        let mut totals = MigrationStats::default();
        let mut reports = Vec::with_capacity(rules.len());

        for rule in rules {
            match self.migrator.migrate(rule, mode) {
                Ok(stats) => {
                    totals += stats;
                    reports.push(RuleReport {
                        rule: rule.to_string(),
                        stats: Some(stats),
                        error: None,
                    });
                }
                Err(error) => {
                    let chain = error_chain(&error);
                    tracing::error!(error = %chain, "rule {rule} failed");
                    reports.push(RuleReport {
                        rule: rule.to_string(),
                        stats: None,
                        error: Some(chain),
                    });
                }
            }
        }

        tracing::info!(
            schema_updates = totals.schema_updates,
            entities_updated = totals.entities_updated,
            refs_migrated = totals.refs_migrated,
            "migration complete"
        );

        RunReport {
            mode,
            totals,
            rules: reports,
        }
    }
}
