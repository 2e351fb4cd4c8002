use anyhow::Context;
use sdd_config::SddConfig;

use crate::cli::GlobalFlags;

/// Resolve the run configuration: `.env`, config files, environment, then `--bundle`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<SddConfig> {
    load_local_dotenv()?;

    let mut config = SddConfig::load().context("failed to load sdd-relink configuration")?;
    if let Some(bundle) = &flags.bundle {
        config = config.with_bundle_path(bundle);
        config.validate().context("invalid --bundle")?;
    }

    tracing::debug!(
        bundle = %config.bundle_path.display(),
        schemas = %config.schemas_root().display(),
        entities = %config.entities_root().display(),
        "configuration loaded"
    );
    if !config.bundle_path.is_dir() {
        tracing::warn!(
            "bundle path {} does not exist; nothing will be migrated",
            config.bundle_path.display()
        );
    }

    Ok(config)
}

fn load_local_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.is_file() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
