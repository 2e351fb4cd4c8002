//! Built-in rule catalog and canonical relationship titles.
//!
//! The catalog is grouped in batches; order matters only for reporting since
//! each rule reloads state from disk.

use crate::enums::EntityType as T;
use crate::rule::MigrationRule;

/// Canonical verb-only title for a relationship field on a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleCorrection {
    pub entity: T,
    pub field: &'static str,
    pub title: &'static str,
}

const fn title(entity: T, field: &'static str, title: &'static str) -> TitleCorrection {
    TitleCorrection {
        entity,
        field,
        title,
    }
}

/// The relationship migrations applied by `sdd-relink migrate`.
#[must_use]
pub fn builtin_rules() -> Vec<MigrationRule> {
    vec![
        // Core governance
        MigrationRule::new(
            T::Requirement,
            "realizesFeatureIds",
            T::Feature,
            "realizedByRequirementIds",
        ),
        MigrationRule::new(
            T::Constraint,
            "constrainsRequirementIds",
            T::Requirement,
            "constrainedByConstraintIds",
        ),
        MigrationRule::new(
            T::Constraint,
            "constrainsScenarioIds",
            T::Scenario,
            "constrainedByConstraintIds",
        ),
        MigrationRule::new(
            T::Constraint,
            "constrainsComponentIds",
            T::Component,
            "constrainedByConstraintIds",
        ),
        MigrationRule::new(
            T::Decision,
            "affectsFeatureIds",
            T::Feature,
            "affectedByDecisionIds",
        ),
        // Threat model
        MigrationRule::new(
            T::Threat,
            "affectsComponents",
            T::Component,
            "affectedByThreatIds",
        ),
        MigrationRule::new(
            T::Threat,
            "affectsProtocols",
            T::Protocol,
            "affectedByThreatIds",
        ),
        MigrationRule::new(
            T::Policy,
            "appliesToProtocols",
            T::Protocol,
            "governedByPolicyIds",
        ),
        MigrationRule::new(
            T::Policy,
            "appliesToComponents",
            T::Component,
            "governedByPolicyIds",
        ),
        MigrationRule::new(
            T::Policy,
            "appliesToRequirements",
            T::Requirement,
            "governedByPolicyIds",
        ),
        // Principles and guidance
        MigrationRule::new(T::Principle, "guidesAdrs", T::Adr, "guidedByPrincipleIds"),
        MigrationRule::new(
            T::Principle,
            "guidesRequirements",
            T::Requirement,
            "guidedByPrincipleIds",
        ),
        // Implementation links
        MigrationRule::new(
            T::Component,
            "implementsRequirements",
            T::Requirement,
            "implementedByComponentIds",
        ),
        MigrationRule::new(
            T::Component,
            "implementsFeatureIds",
            T::Feature,
            "implementedByComponentIds",
        ),
        // Requirement.ownerId predates the migration.
        MigrationRule::new(T::Actor, "ownsRequirements", T::Requirement, "ownerId")
            .onto_existing_field(),
        MigrationRule::new(
            T::Actor,
            "usesComponents",
            T::Component,
            "usedByActorIds",
        ),
        // Operational
        MigrationRule::new(
            T::Scenario,
            "coversRequirements",
            T::Requirement,
            "coveredByScenarioIds",
        ),
        MigrationRule::new(
            T::Scenario,
            "usesComponents",
            T::Component,
            "usedInScenarioIds",
        ),
        MigrationRule::new(
            T::Scenario,
            "usesProtocols",
            T::Protocol,
            "usedInScenarioIds",
        ),
        MigrationRule::new(
            T::Scenario,
            "usesFixtures",
            T::Fixture,
            "usedInScenarioIds",
        ),
        MigrationRule::new(
            T::Fixture,
            "validatesRequirementIds",
            T::Requirement,
            "validatedByFixtureIds",
        ),
        MigrationRule::new(
            T::Profile,
            "requiresFeatures",
            T::Feature,
            "requiredByProfileIds",
        ),
        MigrationRule::new(
            T::Profile,
            "optionalFeatures",
            T::Feature,
            "optionalInProfileIds",
        ),
        MigrationRule::new(
            T::TelemetrySchema,
            "appliesToComponents",
            T::Component,
            "telemetrySchemaIds",
        ),
        MigrationRule::new(
            T::TelemetrySchema,
            "appliesToProtocols",
            T::Protocol,
            "telemetrySchemaIds",
        ),
        MigrationRule::new(
            T::TelemetrySchema,
            "appliesToScenarios",
            T::Scenario,
            "telemetrySchemaIds",
        ),
    ]
}

/// Verb-only titles applied by `sdd-relink cleanup`.
pub const TITLE_CORRECTIONS: &[TitleCorrection] = &[
    title(T::Feature, "realizedByRequirementIds", "realized by"),
    title(T::Feature, "affectedByDecisionIds", "affected by"),
    title(T::Feature, "implementedByComponentIds", "implemented by"),
    title(T::Feature, "requiredByProfileIds", "required by"),
    title(T::Feature, "optionalInProfileIds", "optional in"),
    title(T::Requirement, "constrainedByConstraintIds", "constrained by"),
    title(T::Requirement, "coveredByScenarioIds", "covered by"),
    title(T::Requirement, "governedByPolicyIds", "governed by"),
    title(T::Requirement, "guidedByPrincipleIds", "guided by"),
    title(T::Requirement, "implementedByComponentIds", "implemented by"),
    title(T::Requirement, "validatedByFixtureIds", "validated by"),
    title(T::Component, "constrainedByConstraintIds", "constrained by"),
    title(T::Component, "affectedByThreatIds", "affected by"),
    title(T::Component, "governedByPolicyIds", "governed by"),
    title(T::Component, "usedByActorIds", "used by"),
    title(T::Component, "usedInScenarioIds", "used in"),
    title(T::Component, "telemetrySchemaIds", "observed by"),
    title(T::Scenario, "constrainedByConstraintIds", "constrained by"),
    title(T::Scenario, "telemetrySchemaIds", "observed by"),
    title(T::Protocol, "affectedByThreatIds", "affected by"),
    title(T::Protocol, "governedByPolicyIds", "governed by"),
    title(T::Protocol, "usedInScenarioIds", "used in"),
    title(T::Protocol, "telemetrySchemaIds", "observed by"),
    title(T::Adr, "guidedByPrincipleIds", "guided by"),
    title(T::Fixture, "usedInScenarioIds", "used in"),
];
