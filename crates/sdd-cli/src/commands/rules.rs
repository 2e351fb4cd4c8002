use std::path::Path;

use anyhow::Context;
use sdd_core::RuleSet;

use crate::cli::{GlobalFlags, RulesArgs};
use crate::output;

/// Load the rule file when given, else the built-in catalog.
pub fn load(path: Option<&Path>) -> anyhow::Result<RuleSet> {
    match path {
        Some(path) => RuleSet::from_path(path)
            .with_context(|| format!("invalid rule file {}", path.display())),
        None => RuleSet::builtin().context("built-in rule catalog is invalid"),
    }
}

/// Handle `sdd-relink rules`.
pub fn handle(args: &RulesArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rules = load(args.rules.as_deref())?;
    output::print_rules(&rules, flags.format)
}
