//! Rule validation error types.

use thiserror::Error;

/// Errors raised while loading or validating migration rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A type name did not match any known entity type.
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// A field name is empty or contains characters other than ASCII alphanumerics.
    #[error("Invalid field name '{field}' in rule {rule}")]
    InvalidFieldName { rule: String, field: String },

    /// A rule reads or writes the record `id` field.
    #[error("Rule {rule} uses the reserved field 'id'")]
    ReservedField { rule: String },

    /// Two rules migrate the same source field.
    #[error("Duplicate rule for {source_type}.{field}")]
    Duplicate { source_type: String, field: String },

    /// A rule file could not be read.
    #[error("Failed to read rule file: {0}")]
    Io(#[from] std::io::Error),

    /// A rule file is not valid TOML or does not match the rule layout.
    #[error("Failed to parse rule file: {0}")]
    Parse(#[from] toml::de::Error),
}
