//! The outcome of planning one rule, before anything is written.
//!
//! A plan holds the final state of every document the rule touches. Live runs
//! and dry runs commit the same plan, so both report identical statistics.

use sdd_core::{EntityType, MigrationRule};
use sdd_store::{Record, SchemaDoc};
use serde::Serialize;

use crate::stats::MigrationStats;

/// A source reference whose target id has no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingRef {
    pub source_id: String,
    pub target_id: String,
}

/// A property-level schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum SchemaEdit {
    Added { entity: EntityType, field: String },
    Removed { entity: EntityType, field: String },
}

#[derive(Debug, Clone)]
pub struct RulePlan {
    pub rule: MigrationRule,
    /// Target schema with the new property, when it had to be added.
    pub target_schema: Option<SchemaDoc>,
    /// Source schema without the obsolete property. When source and target
    /// are the same type this document also carries the addition.
    pub source_schema: Option<SchemaDoc>,
    pub schema_edits: Vec<SchemaEdit>,
    /// Source records with the obsolete field removed.
    pub source_updates: Vec<Record>,
    /// Target records that changed, in order of first change.
    pub target_updates: Vec<Record>,
    pub refs_migrated: usize,
    pub dangling: Vec<DanglingRef>,
}

impl RulePlan {
    #[must_use]
    pub const fn new(rule: MigrationRule) -> Self {
        Self {
            rule,
            target_schema: None,
            source_schema: None,
            schema_edits: Vec::new(),
            source_updates: Vec::new(),
            target_updates: Vec::new(),
            refs_migrated: 0,
            dangling: Vec::new(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> MigrationStats {
        MigrationStats {
            schema_updates: self.schema_edits.len(),
            entities_updated: self.target_updates.len(),
            refs_migrated: self.refs_migrated,
            source_fields_removed: self.source_updates.len(),
            dangling_refs: self.dangling.len(),
        }
    }
}
