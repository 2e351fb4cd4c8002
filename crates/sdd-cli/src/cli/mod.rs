use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{CleanupArgs, Commands, MigrateArgs, RulesArgs};

/// Top-level CLI parser for the `sdd-relink` binary.
#[derive(Debug, Parser)]
#[command(
    name = "sdd-relink",
    version,
    about = "Move SDD bundle relationships onto the entities they point at"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bundle root (overrides SDD_SAMPLE_BUNDLE_PATH and config files)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub bundle: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            bundle: self.bundle.clone(),
        }
    }
}
