//! Entity types and reference cardinality.
//!
//! Type names serialize in their canonical bundle spelling (`Feature`, `ADR`,
//! `TelemetrySchema`), which is also the schema file stem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RuleError;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// A bundle entity type. Each type owns exactly one data folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Actor,
    Feature,
    Requirement,
    Component,
    Scenario,
    Constraint,
    Protocol,
    #[serde(rename = "ADR")]
    Adr,
    Decision,
    Threat,
    Policy,
    Principle,
    TelemetrySchema,
    Fixture,
    Profile,
    Risk,
    OpenQuestion,
    HealthCheckSpec,
    TelemetryContract,
    ErrorCode,
    View,
    Viewpoint,
    DataSchema,
    Task,
}

impl EntityType {
    /// Every entity type, in folder-scan order.
    pub const ALL: [Self; 24] = [
        Self::Actor,
        Self::Feature,
        Self::Requirement,
        Self::Component,
        Self::Scenario,
        Self::Constraint,
        Self::Protocol,
        Self::Adr,
        Self::Decision,
        Self::Threat,
        Self::Policy,
        Self::Principle,
        Self::TelemetrySchema,
        Self::Fixture,
        Self::Profile,
        Self::Risk,
        Self::OpenQuestion,
        Self::HealthCheckSpec,
        Self::TelemetryContract,
        Self::ErrorCode,
        Self::View,
        Self::Viewpoint,
        Self::DataSchema,
        Self::Task,
    ];

    /// Canonical type name, as used for schema file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actor => "Actor",
            Self::Feature => "Feature",
            Self::Requirement => "Requirement",
            Self::Component => "Component",
            Self::Scenario => "Scenario",
            Self::Constraint => "Constraint",
            Self::Protocol => "Protocol",
            Self::Adr => "ADR",
            Self::Decision => "Decision",
            Self::Threat => "Threat",
            Self::Policy => "Policy",
            Self::Principle => "Principle",
            Self::TelemetrySchema => "TelemetrySchema",
            Self::Fixture => "Fixture",
            Self::Profile => "Profile",
            Self::Risk => "Risk",
            Self::OpenQuestion => "OpenQuestion",
            Self::HealthCheckSpec => "HealthCheckSpec",
            Self::TelemetryContract => "TelemetryContract",
            Self::ErrorCode => "ErrorCode",
            Self::View => "View",
            Self::Viewpoint => "Viewpoint",
            Self::DataSchema => "DataSchema",
            Self::Task => "Task",
        }
    }

    /// Data folder name (lowercase plural) under the entities directory.
    #[must_use]
    pub const fn folder(self) -> &'static str {
        match self {
            Self::Actor => "actors",
            Self::Feature => "features",
            Self::Requirement => "requirements",
            Self::Component => "components",
            Self::Scenario => "scenarios",
            Self::Constraint => "constraints",
            Self::Protocol => "protocols",
            Self::Adr => "adrs",
            Self::Decision => "decisions",
            Self::Threat => "threats",
            Self::Policy => "policies",
            Self::Principle => "principles",
            Self::TelemetrySchema => "telemetry-schemas",
            Self::Fixture => "fixtures",
            Self::Profile => "profiles",
            Self::Risk => "risks",
            Self::OpenQuestion => "questions",
            Self::HealthCheckSpec => "health-checks",
            Self::TelemetryContract => "telemetry-contracts",
            Self::ErrorCode => "error-codes",
            Self::View => "views",
            Self::Viewpoint => "viewpoints",
            Self::DataSchema => "schemas",
            Self::Task => "tasks",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str() == s)
            .ok_or_else(|| RuleError::UnknownEntityType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Cardinality
// ---------------------------------------------------------------------------

/// Whether a synthesized reference field holds one id or a set of ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Single,
    #[default]
    Many,
}

impl Cardinality {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Many => "many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
