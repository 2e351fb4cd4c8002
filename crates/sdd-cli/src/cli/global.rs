use std::path::PathBuf;

use clap::ValueEnum;

/// Report format on stdout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned tables for people.
    #[default]
    Text,
    /// Pretty-printed JSON for tooling.
    Json,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub bundle: Option<PathBuf>,
}
