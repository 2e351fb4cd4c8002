use sdd_config::SddConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod cleanup;
pub mod migrate;
pub mod rules;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Commands, config: &SddConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Migrate(args) => migrate::handle(&args, config, flags),
        Commands::Cleanup(args) => cleanup::handle(&args, config, flags),
        Commands::Rules(args) => rules::handle(&args, flags),
    }
}
