mod common;

use common::Bundle;
use pretty_assertions::assert_eq;
use sdd_core::{EntityType, MigrationRule, RuleError, RuleSet};
use sdd_migrate::{AssumeYes, MigrationStats, RunOutcome, WriteMode};
use serde_json::json;

fn two_rules() -> RuleSet {
    RuleSet::new(vec![
        MigrationRule::new(
            EntityType::Requirement,
            "realizesFeatureIds",
            EntityType::Feature,
            "realizedByRequirementIds",
        ),
        MigrationRule::new(
            EntityType::Decision,
            "affectsFeatureIds",
            EntityType::Feature,
            "affectedByDecisionIds",
        ),
    ])
    .unwrap()
}

fn bundle() -> Bundle {
    let bundle = Bundle::new();
    bundle
        .schema(EntityType::Feature, &["id"])
        .schema(EntityType::Requirement, &["id", "realizesFeatureIds"])
        .schema(EntityType::Decision, &["id", "affectsFeatureIds"])
        .record(EntityType::Feature, "F1", "")
        .record(EntityType::Requirement, "R1", "realizesFeatureIds: [F1]\n")
        .record(EntityType::Decision, "D1", "affectsFeatureIds: [F1]\n");
    bundle
}

fn completed(outcome: RunOutcome) -> sdd_migrate::RunReport {
    match outcome {
        RunOutcome::Completed(report) => report,
        RunOutcome::Aborted => panic!("run was aborted"),
    }
}

#[test]
fn rules_accumulate_on_shared_target() {
    let bundle = bundle();
    let report = completed(bundle.driver().run(&two_rules(), WriteMode::Live, &mut AssumeYes));

    assert_eq!(report.failures(), 0);
    assert_eq!(report.rules.len(), 2);
    assert_eq!(
        bundle.load_record(EntityType::Feature, "F1"),
        json!({
            "id": "F1",
            "realizedByRequirementIds": ["R1"],
            "affectedByDecisionIds": ["D1"],
        })
    );
}

#[test]
fn totals_are_the_sum_of_rule_stats() {
    let bundle = bundle();
    let report = completed(bundle.driver().run(&two_rules(), WriteMode::Live, &mut AssumeYes));

    let mut sum = MigrationStats::default();
    for rule in &report.rules {
        sum += rule.stats.unwrap();
    }
    assert_eq!(report.totals, sum);
    assert_eq!(report.totals.refs_migrated, 2);
    assert_eq!(report.totals.schema_updates, 4);
}

#[test]
fn failing_rule_does_not_stop_the_rest() {
    let bundle = bundle();
    bundle.record(
        EntityType::Requirement,
        "R1",
        "realizesFeatureIds:\n  F1: yes\n",
    );

    let report = completed(bundle.driver().run(&two_rules(), WriteMode::Live, &mut AssumeYes));

    assert_eq!(report.failures(), 1);
    let failed = &report.rules[0];
    assert!(failed.stats.is_none());
    assert!(failed.error.as_deref().unwrap().contains("R1"));
    assert_eq!(report.rules[1].stats.unwrap().refs_migrated, 1);
    assert_eq!(
        bundle.field(EntityType::Feature, "F1", "affectedByDecisionIds"),
        Some(json!(["D1"]))
    );
    assert_eq!(report.totals, report.rules[1].stats.unwrap());
}

#[test]
fn declined_confirmation_changes_nothing() {
    let bundle = bundle();
    let before = bundle.snapshot();

    let mut prompts = Vec::new();
    let mut decline = |prompt: &str| {
        prompts.push(prompt.to_string());
        false
    };
    let outcome = bundle
        .driver()
        .run(&two_rules(), WriteMode::Live, &mut decline);

    assert_eq!(outcome, RunOutcome::Aborted);
    assert_eq!(prompts.len(), 1);
    assert_eq!(bundle.snapshot(), before);
}

#[test]
fn dry_run_never_prompts() {
    let bundle = bundle();
    let before = bundle.snapshot();

    let mut asked = false;
    let mut confirm = |_: &str| {
        asked = true;
        false
    };
    let report = completed(
        bundle
            .driver()
            .run(&two_rules(), WriteMode::DryRun, &mut confirm),
    );

    assert!(!asked);
    assert_eq!(report.mode, WriteMode::DryRun);
    assert_eq!(report.totals.refs_migrated, 2);
    assert_eq!(bundle.snapshot(), before);
}

#[test]
fn rule_onto_id_is_refused_before_touching_the_bundle() {
    let bundle = bundle();
    let before = bundle.snapshot();

    let rules = RuleSet::new(vec![MigrationRule::new(
        EntityType::Requirement,
        "realizesFeatureIds",
        EntityType::Feature,
        "id",
    )]);

    assert!(matches!(rules, Err(RuleError::ReservedField { .. })));
    assert_eq!(bundle.snapshot(), before);
}

#[test]
fn builtin_catalog_runs_on_empty_bundle() {
    let bundle = Bundle::new();
    let rules = RuleSet::builtin().unwrap();

    let report = bundle.driver().run_unchecked(&rules, WriteMode::Live);

    assert_eq!(report.rules.len(), 26);
    assert_eq!(report.failures(), 0);
    assert_eq!(report.totals, MigrationStats::default());
}

#[test]
fn report_serializes_with_status_tag() {
    let bundle = bundle();
    let outcome = bundle
        .driver()
        .run(&two_rules(), WriteMode::DryRun, &mut AssumeYes);

    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["status"], "completed");
    assert_eq!(value["mode"], "dry_run");
    assert_eq!(
        value["rules"][0]["rule"],
        "Requirement.realizesFeatureIds -> Feature.realizedByRequirementIds"
    );
}
