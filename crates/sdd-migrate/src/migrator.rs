//! Relationship migrator.
//!
//! [`Migrator::plan`] reads the current bundle state and computes every change
//! a rule implies. [`Migrator::commit`] then walks the plan in a fixed order
//! (target schema, source records, target records, source schema), either
//! writing or logging each step depending on the [`WriteMode`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use sdd_config::SddConfig;
use sdd_core::{Cardinality, EntityType, MigrationRule};
use sdd_store::{EntityStore, Record, SchemaDoc, SchemaStore};
use serde_json::Value;

use crate::error::MigrateError;
use crate::field::back_reference_field;
use crate::mode::WriteMode;
use crate::plan::{DanglingRef, RulePlan, SchemaEdit};
use crate::stats::MigrationStats;

/// What adding one back-reference did to a target record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Change {
    added: bool,
    changed: bool,
}

impl Change {
    const NONE: Self = Self {
        added: false,
        changed: false,
    };
    const ADDED: Self = Self {
        added: true,
        changed: true,
    };
}

/// Applies single migration rules against a bundle.
#[derive(Debug, Clone)]
pub struct Migrator {
    schemas: SchemaStore,
    entities: EntityStore,
}

impl Migrator {
    #[must_use]
    pub fn new(config: &SddConfig) -> Self {
        Self::from_stores(SchemaStore::new(config), EntityStore::new(config))
    }

    #[must_use]
    pub const fn from_stores(schemas: SchemaStore, entities: EntityStore) -> Self {
        Self { schemas, entities }
    }

    /// Plan and commit one rule.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError` on I/O failures or when a record field has an
    /// unusable shape. Planning errors leave the bundle untouched; commit
    /// errors leave earlier writes in place.
    pub fn migrate(
        &self,
        rule: &MigrationRule,
        mode: WriteMode,
    ) -> Result<MigrationStats, MigrateError> {
        tracing::info!(%mode, "migrating {rule}");
        let plan = self.plan(rule)?;
        let stats = self.commit(&plan, mode)?;
        tracing::info!(
            refs_migrated = stats.refs_migrated,
            entities_updated = stats.entities_updated,
            schema_updates = stats.schema_updates,
            "finished {rule}"
        );
        Ok(stats)
    }

    /// Compute every change `rule` implies without writing anything.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError` if a document cannot be loaded or a field holds
    /// something other than references.
    pub fn plan(&self, rule: &MigrationRule) -> Result<RulePlan, MigrateError> {
        let mut plan = RulePlan::new(rule.clone());

        if rule.existing {
            match self.schemas.load(rule.target)? {
                Some(schema) if !schema.has_property(&rule.new_field) => tracing::warn!(
                    "{} does not declare {}; pruning {}.{} anyway",
                    rule.target,
                    rule.new_field,
                    rule.source,
                    rule.source_field
                ),
                _ => tracing::info!(
                    "{}.{} already exists; skipping schema synthesis and data propagation",
                    rule.target,
                    rule.new_field
                ),
            }
        } else {
            self.plan_target_schema(rule, &mut plan)?;
            self.plan_records(rule, &mut plan)?;
        }

        self.plan_source_schema(rule, &mut plan)?;
        Ok(plan)
    }

    /// Write (or report) a plan.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError::Store` if a live write fails.
    pub fn commit(&self, plan: &RulePlan, mode: WriteMode) -> Result<MigrationStats, MigrateError> {
        let rule = &plan.rule;

        if let Some(schema) = &plan.target_schema {
            self.write_schema(schema, mode)?;
            tracing::info!("added {} to {} schema", rule.new_field, rule.target);
        }

        let mut written: HashSet<&Path> = HashSet::new();
        for record in &plan.source_updates {
            match mode {
                WriteMode::Live => {
                    self.entities.save(record)?;
                    tracing::debug!("removed {} from {}", rule.source_field, record.label());
                }
                WriteMode::DryRun => tracing::info!(
                    "[dry run] would remove {} from {}",
                    rule.source_field,
                    record.label()
                ),
            }
            written.insert(record.path());
        }

        for record in &plan.target_updates {
            if written.insert(record.path()) {
                self.write_record(record, mode)?;
            }
        }

        if let Some(schema) = &plan.source_schema {
            self.write_schema(schema, mode)?;
            if plan
                .schema_edits
                .iter()
                .any(|edit| matches!(edit, SchemaEdit::Removed { .. }))
            {
                tracing::info!("removed {} from {} schema", rule.source_field, rule.source);
            }
        }

        Ok(plan.stats())
    }

    fn write_schema(&self, schema: &SchemaDoc, mode: WriteMode) -> Result<(), MigrateError> {
        match mode {
            WriteMode::Live => {
                self.schemas.save(schema)?;
                tracing::info!("saved schema {}", schema.path().display());
            }
            WriteMode::DryRun => {
                tracing::info!("[dry run] would save schema {}", schema.path().display());
            }
        }
        Ok(())
    }

    fn write_record(&self, record: &Record, mode: WriteMode) -> Result<(), MigrateError> {
        match mode {
            WriteMode::Live => {
                self.entities.save(record)?;
                tracing::debug!("saved entity {}", record.path().display());
            }
            WriteMode::DryRun => {
                tracing::info!("[dry run] would save entity {}", record.path().display());
            }
        }
        Ok(())
    }

    fn plan_target_schema(
        &self,
        rule: &MigrationRule,
        plan: &mut RulePlan,
    ) -> Result<(), MigrateError> {
        match self.schemas.load(rule.target)? {
            Some(mut schema) if !schema.has_property(&rule.new_field) => {
                schema.insert_property(
                    &rule.new_field,
                    back_reference_field(rule.source, rule.cardinality, &rule.new_field),
                );
                plan.schema_edits.push(SchemaEdit::Added {
                    entity: rule.target,
                    field: rule.new_field.clone(),
                });
                plan.target_schema = Some(schema);
            }
            Some(_) => tracing::info!(
                "field {} already exists in {} schema",
                rule.new_field,
                rule.target
            ),
            None => tracing::debug!("no schema for {}; skipping augmentation", rule.target),
        }
        Ok(())
    }

    fn plan_source_schema(
        &self,
        rule: &MigrationRule,
        plan: &mut RulePlan,
    ) -> Result<(), MigrateError> {
        // Same type: keep editing the already augmented document.
        let merged = rule.source == rule.target && plan.target_schema.is_some();
        let schema = if merged {
            plan.target_schema.take()
        } else {
            self.schemas.load(rule.source)?
        };

        let Some(mut schema) = schema else {
            tracing::debug!("no schema for {}; skipping pruning", rule.source);
            return Ok(());
        };

        let removed = schema.remove_property(&rule.source_field).is_some();
        if removed {
            plan.schema_edits.push(SchemaEdit::Removed {
                entity: rule.source,
                field: rule.source_field.clone(),
            });
        }
        if removed || merged {
            plan.source_schema = Some(schema);
        }
        Ok(())
    }

    fn plan_records(&self, rule: &MigrationRule, plan: &mut RulePlan) -> Result<(), MigrateError> {
        let same_type = rule.source == rule.target;
        let mut sources = self.entities.load_all(rule.source)?;
        let mut targets = if same_type {
            BTreeMap::new()
        } else {
            self.entities.load_all(rule.target)?
        };

        let mut links: Vec<(String, Vec<String>)> = Vec::new();
        for (id, record) in &sources {
            if let Some(value) = record.get_json(&rule.source_field)? {
                let refs = reference_ids(rule.source, id, &rule.source_field, &value)?;
                links.push((id.clone(), refs));
            }
        }

        let pool = if same_type { &mut sources } else { &mut targets };
        let mut touched: Vec<String> = Vec::new();
        for (source_id, refs) in &links {
            for target_id in refs {
                let Some(target) = pool.get_mut(target_id) else {
                    tracing::warn!("target not found: {} {target_id} (from {source_id})", rule.target);
                    plan.dangling.push(DanglingRef {
                        source_id: source_id.clone(),
                        target_id: target_id.clone(),
                    });
                    continue;
                };

                let change = add_back_reference(target, rule, source_id)?;
                if change.added {
                    plan.refs_migrated += 1;
                }
                if change.changed && !touched.contains(target_id) {
                    touched.push(target_id.clone());
                }
            }
        }

        for (source_id, _) in &links {
            if let Some(record) = sources.get_mut(source_id) {
                record.remove(&rule.source_field);
            }
        }

        plan.source_updates = links
            .iter()
            .filter_map(|(id, _)| sources.get(id).cloned())
            .collect();

        let pool = if same_type { &sources } else { &targets };
        plan.target_updates = touched
            .iter()
            .filter_map(|id| pool.get(id).cloned())
            .collect();

        Ok(())
    }
}

/// Normalize a source field value to a list of referenced ids.
///
/// A bare string is a one-element list. Null and empty values hold no
/// references. Non-string list entries are skipped with a warning.
fn reference_ids(
    entity: EntityType,
    id: &str,
    field: &str,
    value: &Value,
) -> Result<Vec<String>, MigrateError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(single) if single.is_empty() => Ok(Vec::new()),
        Value::String(single) => Ok(vec![single.clone()]),
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(|item| match item {
                Value::String(target) if !target.is_empty() => Some(target.clone()),
                other => {
                    tracing::warn!("{entity} {id}: skipping non-id entry {other} in {field}");
                    None
                }
            })
            .collect()),
        other => Err(structural(
            entity,
            id,
            field,
            format!("holds {} instead of references", kind(other)),
        )),
    }
}

fn add_back_reference(
    target: &mut Record,
    rule: &MigrationRule,
    source_id: &str,
) -> Result<Change, MigrateError> {
    match rule.cardinality {
        Cardinality::Many => add_to_list(target, rule, source_id),
        Cardinality::Single => set_single(target, rule, source_id),
    }
}

fn add_to_list(
    target: &mut Record,
    rule: &MigrationRule,
    source_id: &str,
) -> Result<Change, MigrateError> {
    let field = rule.new_field.as_str();
    let (mut items, coerced) = match target.get_json(field)? {
        Some(Value::Array(items)) => (items, false),
        None | Some(Value::Null) => (Vec::new(), true),
        Some(Value::String(existing)) if existing.is_empty() => (Vec::new(), true),
        // A scalar left in a list field becomes a one-element list.
        Some(Value::String(existing)) => (vec![Value::String(existing)], true),
        Some(other) => {
            return Err(structural(
                rule.target,
                target.label(),
                field,
                format!("holds {} instead of a reference list", kind(&other)),
            ));
        }
    };

    let added = !items.iter().any(|item| item.as_str() == Some(source_id));
    if !added && !coerced {
        return Ok(Change::NONE);
    }
    if added {
        items.push(Value::String(source_id.to_string()));
    }
    target.set_json(field, &Value::Array(items))?;
    Ok(Change {
        added,
        changed: true,
    })
}

fn set_single(
    target: &mut Record,
    rule: &MigrationRule,
    source_id: &str,
) -> Result<Change, MigrateError> {
    let field = rule.new_field.as_str();
    match target.get_json(field)? {
        None | Some(Value::Null) => {}
        Some(Value::String(existing)) if existing.is_empty() => {}
        Some(Value::String(existing)) if existing == source_id => return Ok(Change::NONE),
        Some(Value::String(existing)) => {
            tracing::warn!(
                "{} {}: {field} already references {existing}; not replacing with {source_id}",
                rule.target,
                target.label()
            );
            return Ok(Change::NONE);
        }
        Some(other) => {
            return Err(structural(
                rule.target,
                target.label(),
                field,
                format!("holds {} instead of a single reference", kind(&other)),
            ));
        }
    }

    target.set_json(field, &Value::String(source_id.to_string()))?;
    Ok(Change::ADDED)
}

fn structural(entity: EntityType, id: &str, field: &str, reason: String) -> MigrateError {
    MigrateError::Structural {
        entity: entity.to_string(),
        id: id.to_string(),
        field: field.to_string(),
        reason,
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
