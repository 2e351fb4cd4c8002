use sdd_config::SddConfig;
use sdd_core::catalog::TITLE_CORRECTIONS;
use sdd_migrate::{Cleanup, CleanupOutcome, WriteMode};

use crate::cli::{CleanupArgs, GlobalFlags};
use crate::commands::migrate::confirmer;
use crate::output;

/// Handle `sdd-relink cleanup`.
pub fn handle(args: &CleanupArgs, config: &SddConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mode = WriteMode::from_dry_run(args.dry_run);
    let outcome = Cleanup::new(config).run(TITLE_CORRECTIONS, mode, &mut *confirmer(args.yes));

    if let CleanupOutcome::Completed(report) = &outcome {
        if !report.failures.is_empty() {
            tracing::warn!("{} cleanup units failed; see errors above", report.failures.len());
        }
    }

    output::print_cleanup(&outcome, flags.format)
}
