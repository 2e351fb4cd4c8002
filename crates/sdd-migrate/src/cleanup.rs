//! Post-migration cleanup.
//!
//! Two normalization passes over the same stores:
//! 1. drop record fields the current schema no longer declares
//! 2. rewrite relationship titles to their canonical verb-only form
//!
//! Each entity type and each schema is an independent unit; a failing unit is
//! logged and recorded while the others proceed.

use std::collections::BTreeMap;

use sdd_config::SddConfig;
use sdd_core::EntityType;
use sdd_core::catalog::TitleCorrection;
use sdd_store::{EntityStore, SchemaStore};
use serde::Serialize;
use serde_json::Value;

use crate::confirm::Confirm;
use crate::error::{MigrateError, error_chain};
use crate::mode::WriteMode;
use crate::stats::CleanupStats;

pub const CLEANUP_PROMPT: &str = "Live mode: undeclared fields and titles will be rewritten. Proceed?";

/// A unit (entity type or schema) that failed during cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub unit: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub mode: WriteMode,
    pub totals: CleanupStats,
    /// Removed field names per record label, grouped by type.
    pub removed: BTreeMap<EntityType, BTreeMap<String, Vec<String>>>,
    pub failures: Vec<UnitFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Aborted,
    Completed(CleanupReport),
}

#[derive(Debug, Clone)]
pub struct Cleanup {
    schemas: SchemaStore,
    entities: EntityStore,
}

impl Cleanup {
    #[must_use]
    pub fn new(config: &SddConfig) -> Self {
        Self::from_stores(SchemaStore::new(config), EntityStore::new(config))
    }

    #[must_use]
    pub const fn from_stores(schemas: SchemaStore, entities: EntityStore) -> Self {
        Self { schemas, entities }
    }

    /// Run both passes, asking `confirm` first when `mode` is live.
    pub fn run(
        &self,
        corrections: &[TitleCorrection],
        mode: WriteMode,
        confirm: &mut dyn Confirm,
    ) -> CleanupOutcome {
        if mode == WriteMode::Live && !confirm.confirm(CLEANUP_PROMPT) {
            tracing::warn!("confirmation declined; aborting cleanup");
            return CleanupOutcome::Aborted;
        }
        CleanupOutcome::Completed(self.run_unchecked(corrections, mode))
    }

    pub fn run_unchecked(&self, corrections: &[TitleCorrection], mode: WriteMode) -> CleanupReport {
        let mut report = CleanupReport {
            mode,
            totals: CleanupStats::default(),
            removed: BTreeMap::new(),
            failures: Vec::new(),
        };

        for entity in EntityType::ALL {
            match self.prune_type(entity, mode) {
                Ok(removed) if removed.is_empty() => {}
                Ok(removed) => {
                    report.totals.entities_cleaned += removed.len();
                    report.totals.fields_removed += removed.values().map(Vec::len).sum::<usize>();
                    tracing::info!("cleaned {} {entity} entities", removed.len());
                    report.removed.insert(entity, removed);
                }
                Err(error) => report.failures.push(failure(entity.as_str(), &error)),
            }
        }

        let mut by_entity: BTreeMap<EntityType, Vec<&TitleCorrection>> = BTreeMap::new();
        for correction in corrections {
            by_entity.entry(correction.entity).or_default().push(correction);
        }
        for (entity, corrections) in by_entity {
            match self.fix_titles(entity, &corrections, mode) {
                Ok(fixed) => report.totals.titles_fixed += fixed,
                Err(error) => report
                    .failures
                    .push(failure(&format!("{entity} schema"), &error)),
            }
        }

        tracing::info!(
            entities_cleaned = report.totals.entities_cleaned,
            titles_fixed = report.totals.titles_fixed,
            "cleanup complete"
        );
        report
    }

    /// Remove fields not declared in the type's schema.
    ///
    /// Every mapping document in the folder is pruned, including documents
    /// without an id. Types without a folder or without declared properties
    /// are skipped. The `id` field is never removed. Returns removed field
    /// names per record label (id, or file stem when there is none).
    ///
    /// # Errors
    ///
    /// Returns `MigrateError::Store` if a document cannot be read or written.
    pub fn prune_type(
        &self,
        entity: EntityType,
        mode: WriteMode,
    ) -> Result<BTreeMap<String, Vec<String>>, MigrateError> {
        let mut removed = BTreeMap::new();
        if !self.entities.folder(entity).is_dir() {
            return Ok(removed);
        }

        let allowed = self.schemas.field_names(entity)?;
        if allowed.is_empty() {
            return Ok(removed);
        }

        for mut record in self.entities.documents(entity)? {
            let extra = record.retain_fields(|field| allowed.contains(field));
            if extra.is_empty() {
                continue;
            }

            match mode {
                WriteMode::Live => {
                    self.entities.save(&record)?;
                    tracing::info!("{}: removed {extra:?}", record.path().display());
                }
                WriteMode::DryRun => {
                    tracing::info!("[dry run] {}: would remove {extra:?}", record.path().display());
                }
            }
            removed.insert(record.label().to_string(), extra);
        }

        Ok(removed)
    }

    /// Apply canonical titles to one schema; saves at most once.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError::Store` if the schema cannot be read or written.
    pub fn fix_titles(
        &self,
        entity: EntityType,
        corrections: &[&TitleCorrection],
        mode: WriteMode,
    ) -> Result<usize, MigrateError> {
        let Some(mut schema) = self.schemas.load(entity)? else {
            return Ok(0);
        };

        let mut fixed = 0;
        for correction in corrections {
            let Some(definition) = schema.property_mut(correction.field) else {
                continue;
            };
            let Value::Object(definition) = definition else {
                tracing::warn!(
                    "{entity}.{} is not an object definition; leaving title alone",
                    correction.field
                );
                continue;
            };

            let current = definition.get("title").and_then(Value::as_str).unwrap_or("");
            if current == correction.title {
                continue;
            }
            tracing::info!(
                "{entity}.{}: '{current}' -> '{}'",
                correction.field,
                correction.title
            );
            definition.insert(
                "title".to_string(),
                Value::String(correction.title.to_string()),
            );
            fixed += 1;
        }

        if fixed > 0 {
            match mode {
                WriteMode::Live => self.schemas.save(&schema)?,
                WriteMode::DryRun => {
                    tracing::info!("[dry run] would save schema {}", schema.path().display());
                }
            }
        }
        Ok(fixed)
    }
}

fn failure(unit: &str, error: &MigrateError) -> UnitFailure {
    let chain = error_chain(error);
    tracing::error!(error = %chain, "cleanup of {unit} failed");
    UnitFailure {
        unit: unit.to_string(),
        error: chain,
    }
}
