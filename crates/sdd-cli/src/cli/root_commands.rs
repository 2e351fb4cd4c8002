use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Move relationships from source entities onto their targets.
    Migrate(MigrateArgs),
    /// Drop undeclared record fields and normalize relationship titles.
    Cleanup(CleanupArgs),
    /// Print the effective rule list.
    Rules(RulesArgs),
}

/// Arguments for `sdd-relink migrate`.
#[derive(Clone, Debug, Args)]
pub struct MigrateArgs {
    /// Report every change without writing anything.
    #[arg(long)]
    pub dry_run: bool,
    /// Skip the live-mode confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
    /// Rule file (TOML `[[rule]]` tables) replacing the built-in catalog.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

/// Arguments for `sdd-relink cleanup`.
#[derive(Clone, Debug, Args)]
pub struct CleanupArgs {
    /// Report every change without writing anything.
    #[arg(long)]
    pub dry_run: bool,
    /// Skip the live-mode confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `sdd-relink rules`.
#[derive(Clone, Debug, Args)]
pub struct RulesArgs {
    /// Rule file to validate and list instead of the built-in catalog.
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}
