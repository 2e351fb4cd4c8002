//! Counters reported by migrations and the cleanup pass.

use std::ops::AddAssign;

use serde::Serialize;

/// Per-rule (and aggregated) migration counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationStats {
    /// Schema property additions and removals.
    pub schema_updates: usize,
    /// Target records that gained at least one back-reference.
    pub entities_updated: usize,
    /// Back-references added across all targets.
    pub refs_migrated: usize,
    /// Source records whose obsolete field was dropped.
    pub source_fields_removed: usize,
    /// References to ids with no matching target record.
    pub dangling_refs: usize,
}

impl AddAssign for MigrationStats {
    fn add_assign(&mut self, rhs: Self) {
        self.schema_updates += rhs.schema_updates;
        self.entities_updated += rhs.entities_updated;
        self.refs_migrated += rhs.refs_migrated;
        self.source_fields_removed += rhs.source_fields_removed;
        self.dangling_refs += rhs.dangling_refs;
    }
}

/// Cleanup pass counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupStats {
    /// Records that lost at least one undeclared field.
    pub entities_cleaned: usize,
    /// Undeclared fields removed across all records.
    pub fields_removed: usize,
    /// Relationship titles rewritten.
    pub titles_fixed: usize,
}
