use sdd_config::SddConfig;
use sdd_migrate::{AssumeYes, Confirm, Driver, LineConfirm, Migrator, RunOutcome, WriteMode};

use crate::cli::{GlobalFlags, MigrateArgs};
use crate::commands::rules;
use crate::output;

/// Handle `sdd-relink migrate`.
///
/// Per-rule failures and a declined prompt are reported, not returned as errors.
pub fn handle(args: &MigrateArgs, config: &SddConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rules = rules::load(args.rules.as_deref())?;
    let mode = WriteMode::from_dry_run(args.dry_run);
    let driver = Driver::new(Migrator::new(config));

    let outcome = driver.run(&rules, mode, &mut *confirmer(args.yes));
    if let RunOutcome::Completed(report) = &outcome {
        if report.failures() > 0 {
            tracing::warn!(
                "{} of {} rules failed; see errors above",
                report.failures(),
                report.rules.len()
            );
        }
    }

    output::print_run(&outcome, flags.format)
}

/// `--yes` skips the prompt; otherwise ask on the terminal.
pub fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(LineConfirm::stdio())
    }
}
