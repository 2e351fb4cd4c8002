//! # sdd-config
//!
//! Layered configuration loading for sdd-relink using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. `SDD_SAMPLE_BUNDLE_PATH` (bundle root only)
//! 2. Environment variables (`SDD_RELINK_*` prefix)
//! 3. Project-level `sdd-relink.toml` in the current directory
//! 4. User-level `~/.config/sdd-relink/config.toml`
//! 5. Built-in defaults (`~/dev/sdd-sample-bundle`, `schemas/`, `bundle/`)
//!
//! The resolved [`SddConfig`] is built once by the binary and handed to the
//! stores; nothing below the binary reads the environment.
//!
//! # Usage
//!
//! ```no_run
//! use sdd_config::SddConfig;
//!
//! let config = SddConfig::load_with_dotenv().expect("config");
//! println!("schemas live in {}", config.schemas_root().display());
//! ```

mod error;

pub use error::ConfigError;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the bundle root.
pub const BUNDLE_PATH_ENV: &str = "SDD_SAMPLE_BUNDLE_PATH";

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "sdd-relink.toml";

fn default_bundle_path() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from("sdd-sample-bundle"),
        |home| home.join("dev").join("sdd-sample-bundle"),
    )
}

fn default_schemas_dir() -> String {
    "schemas".to_string()
}

fn default_entities_dir() -> String {
    "bundle".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SddConfig {
    /// Root of the bundle holding both the schema and the entity folders.
    #[serde(default = "default_bundle_path")]
    pub bundle_path: PathBuf,

    /// Schema directory, relative to `bundle_path`.
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: String,

    /// Entity data directory, relative to `bundle_path`.
    #[serde(default = "default_entities_dir")]
    pub entities_dir: String,
}

impl Default for SddConfig {
    fn default() -> Self {
        Self {
            bundle_path: default_bundle_path(),
            schemas_dir: default_schemas_dir(),
            entities_dir: default_entities_dir(),
        }
    }
}

impl SddConfig {
    /// Configuration rooted at `bundle_path` with default directory names.
    #[must_use]
    pub fn for_bundle(bundle_path: impl Into<PathBuf>) -> Self {
        Self {
            bundle_path: bundle_path.into(),
            ..Self::default()
        }
    }

    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`SddConfig::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source is malformed, or
    /// `ConfigError::InvalidValue` if the merged values fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`SddConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Prefixed environment variables
        figment = figment.merge(Env::prefixed("SDD_RELINK_").ignore(&["LOG"]));

        // Layer 4: The historical bundle variable wins over everything else
        figment.merge(
            Env::raw()
                .only(&[BUNDLE_PATH_ENV])
                .map(|_| "bundle_path".into()),
        )
    }

    /// Replace the bundle root (e.g. from a `--bundle` flag).
    #[must_use]
    pub fn with_bundle_path(mut self, bundle_path: impl Into<PathBuf>) -> Self {
        self.bundle_path = bundle_path.into();
        self
    }

    /// Reject empty paths and directory names that escape the bundle.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bundle_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "bundle_path".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        for (field, value) in [
            ("schemas_dir", &self.schemas_dir),
            ("entities_dir", &self.entities_dir),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            if Path::new(value).is_absolute() || value.split(['/', '\\']).any(|part| part == "..")
            {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("'{value}' must be a relative path inside the bundle"),
                });
            }
        }

        Ok(())
    }

    /// Directory holding `<Type>.schema.json` files.
    #[must_use]
    pub fn schemas_root(&self) -> PathBuf {
        self.bundle_path.join(&self.schemas_dir)
    }

    /// Directory holding one folder per entity type.
    #[must_use]
    pub fn entities_root(&self) -> PathBuf {
        self.bundle_path.join(&self.entities_dir)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sdd-relink").join("config.toml"))
    }
}
