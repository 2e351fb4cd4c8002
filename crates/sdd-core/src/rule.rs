//! Migration rules.
//!
//! A rule moves one relationship from the source side to the target side:
//! `source.source_field` (ids of targets) becomes `target.new_field` (ids of
//! sources). Rules are validated once, when a [`RuleSet`] is built.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::enums::{Cardinality, EntityType};
use crate::errors::RuleError;

/// Record key that identifies an entity; never migrated.
const RESERVED_FIELD: &str = "id";

/// One relationship migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRule {
    pub source: EntityType,
    pub source_field: String,
    pub target: EntityType,
    pub new_field: String,

    /// Shape of the synthesized target field.
    #[serde(default)]
    pub cardinality: Cardinality,

    /// The target already declares `new_field` for another purpose (e.g. an
    /// owner id). Only the obsolete source property is dropped.
    #[serde(default)]
    pub existing: bool,
}

impl MigrationRule {
    /// A many-valued rule with a synthesized target field.
    #[must_use]
    pub fn new(
        source: EntityType,
        source_field: impl Into<String>,
        target: EntityType,
        new_field: impl Into<String>,
    ) -> Self {
        Self {
            source,
            source_field: source_field.into(),
            target,
            new_field: new_field.into(),
            cardinality: Cardinality::Many,
            existing: false,
        }
    }

    #[must_use]
    pub const fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Mark the target field as pre-existing.
    #[must_use]
    pub const fn onto_existing_field(mut self) -> Self {
        self.existing = true;
        self
    }

    /// Check field names.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidFieldName` if either field is empty or not
    /// made of ASCII alphanumerics starting with a letter, and
    /// `RuleError::ReservedField` if either field is `id`.
    pub fn validate(&self) -> Result<(), RuleError> {
        for field in [&self.source_field, &self.new_field] {
            if field == RESERVED_FIELD {
                return Err(RuleError::ReservedField {
                    rule: self.to_string(),
                });
            }
            if !is_valid_field_name(field) {
                return Err(RuleError::InvalidFieldName {
                    rule: self.to_string(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for MigrationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source, self.source_field, self.target, self.new_field
        )
    }
}

fn is_valid_field_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// An ordered, validated list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<MigrationRule>,
}

/// On-disk layout of a rule file: a list of `[[rule]]` tables.
#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default, rename = "rule")]
    rules: Vec<MigrationRule>,
}

impl RuleSet {
    /// Validate every rule and reject duplicated source fields.
    ///
    /// # Errors
    ///
    /// Returns the first `RuleError` found, in list order.
    pub fn new(rules: Vec<MigrationRule>) -> Result<Self, RuleError> {
        {
            let mut seen = HashSet::new();
            for rule in &rules {
                rule.validate()?;
                if !seen.insert((rule.source, rule.source_field.as_str())) {
                    return Err(RuleError::Duplicate {
                        source_type: rule.source.to_string(),
                        field: rule.source_field.clone(),
                    });
                }
            }
        }
        Ok(Self { rules })
    }

    /// The built-in catalog, in batch order.
    ///
    /// # Errors
    ///
    /// Only if the catalog itself is malformed.
    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(crate::catalog::builtin_rules())
    }

    /// Parse a TOML rule file.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Parse` for malformed TOML or unknown type names,
    /// and validation errors as in [`RuleSet::new`].
    pub fn from_toml_str(content: &str) -> Result<Self, RuleError> {
        let file: RuleFile = toml::from_str(content)?;
        Self::new(file.rules)
    }

    /// Read and parse a TOML rule file from disk.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Io` if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[must_use]
    pub fn rules(&self) -> &[MigrationRule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a MigrationRule;
    type IntoIter = std::slice::Iter<'a, MigrationRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_names_both_sides() {
        let rule = MigrationRule::new(
            EntityType::Requirement,
            "realizesFeatureIds",
            EntityType::Feature,
            "realizedByRequirementIds",
        );
        assert_eq!(
            rule.to_string(),
            "Requirement.realizesFeatureIds -> Feature.realizedByRequirementIds"
        );
    }

    #[test]
    fn rejects_empty_and_punctuated_field_names() {
        let empty = MigrationRule::new(EntityType::Policy, "", EntityType::Component, "x");
        assert!(matches!(
            empty.validate(),
            Err(RuleError::InvalidFieldName { .. })
        ));

        let dotted = MigrationRule::new(EntityType::Policy, "a.b", EntityType::Component, "x");
        assert!(dotted.validate().is_err());

        let leading_digit = MigrationRule::new(EntityType::Policy, "ok", EntityType::Component, "1x");
        assert!(leading_digit.validate().is_err());
    }

    #[test]
    fn rejects_id_on_either_side() {
        let onto_id = MigrationRule::new(
            EntityType::Requirement,
            "realizesFeatureIds",
            EntityType::Feature,
            "id",
        );
        assert!(matches!(
            RuleSet::new(vec![onto_id]),
            Err(RuleError::ReservedField { .. })
        ));

        let from_id = MigrationRule::new(EntityType::Requirement, "id", EntityType::Feature, "x");
        assert!(matches!(
            from_id.validate(),
            Err(RuleError::ReservedField { .. })
        ));

        let from_toml = RuleSet::from_toml_str(
            r#"
            [[rule]]
            source = "Decision"
            source_field = "affectsFeatureIds"
            target = "Feature"
            new_field = "id"
        "#,
        );
        assert!(matches!(from_toml, Err(RuleError::ReservedField { .. })));
    }

    #[test]
    fn rejects_duplicate_source_fields() {
        let rule = MigrationRule::new(EntityType::Threat, "affects", EntityType::Component, "a");
        let other = MigrationRule::new(EntityType::Threat, "affects", EntityType::Protocol, "b");
        let err = RuleSet::new(vec![rule, other]).unwrap_err();
        assert!(matches!(err, RuleError::Duplicate { .. }));
    }

    #[test]
    fn same_field_name_on_different_sources_is_allowed() {
        let a = MigrationRule::new(EntityType::Actor, "usesComponents", EntityType::Component, "a");
        let b = MigrationRule::new(
            EntityType::Scenario,
            "usesComponents",
            EntityType::Component,
            "b",
        );
        assert_eq!(RuleSet::new(vec![a, b]).unwrap().len(), 2);
    }

    #[test]
    fn parses_rule_file_with_defaults() {
        let toml = r#"
            [[rule]]
            source = "Requirement"
            source_field = "realizesFeatureIds"
            target = "Feature"
            new_field = "realizedByRequirementIds"

            [[rule]]
            source = "Actor"
            source_field = "ownsRequirements"
            target = "Requirement"
            new_field = "ownerId"
            cardinality = "single"
            existing = true
        "#;

        let set = RuleSet::from_toml_str(toml).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].cardinality, Cardinality::Many);
        assert!(!set.rules()[0].existing);
        assert_eq!(set.rules()[1].cardinality, Cardinality::Single);
        assert!(set.rules()[1].existing);
    }

    #[test]
    fn rule_file_with_unknown_type_fails() {
        let toml = r#"
            [[rule]]
            source = "Widget"
            source_field = "x"
            target = "Feature"
            new_field = "y"
        "#;
        assert!(matches!(
            RuleSet::from_toml_str(toml),
            Err(RuleError::Parse(_))
        ));
    }

    #[test]
    fn empty_rule_file_is_an_empty_set() {
        assert!(RuleSet::from_toml_str("").unwrap().is_empty());
    }
}
