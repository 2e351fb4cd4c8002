mod common;

use std::fs;

use common::Bundle;
use pretty_assertions::assert_eq;
use sdd_core::EntityType;
use sdd_core::catalog::{TITLE_CORRECTIONS, TitleCorrection};
use sdd_migrate::{CleanupOutcome, WriteMode};
use serde_json::json;

const FEATURE_TITLE: TitleCorrection = TitleCorrection {
    entity: EntityType::Feature,
    field: "realizedByRequirementIds",
    title: "realized by",
};

fn stale_bundle() -> Bundle {
    let bundle = Bundle::new();
    bundle
        .schema(EntityType::Feature, &["id", "title"])
        .record(
            EntityType::Feature,
            "F1",
            "title: Login\nlegacyOwner: bob\nrealizesIds: [X]\n",
        )
        .record(EntityType::Feature, "F2", "title: Logout\n");
    bundle
}

#[test]
fn prunes_fields_the_schema_does_not_declare() {
    let bundle = stale_bundle();
    let report = bundle.cleanup().run_unchecked(&[], WriteMode::Live);

    assert_eq!(report.totals.entities_cleaned, 1);
    assert_eq!(report.totals.fields_removed, 2);
    assert_eq!(
        report.removed[&EntityType::Feature]["F1"],
        vec!["legacyOwner", "realizesIds"]
    );
    assert_eq!(
        bundle.load_record(EntityType::Feature, "F1"),
        json!({"id": "F1", "title": "Login"})
    );
    assert!(report.failures.is_empty());
}

#[test]
fn id_survives_even_when_undeclared() {
    let bundle = Bundle::new();
    bundle
        .schema(EntityType::Feature, &["title"])
        .record(EntityType::Feature, "F1", "title: Login\n");
    let before = bundle.snapshot();

    let report = bundle.cleanup().run_unchecked(&[], WriteMode::Live);

    assert_eq!(report.totals.entities_cleaned, 0);
    assert_eq!(bundle.snapshot(), before);
}

#[test]
fn documents_without_id_are_pruned_too() {
    let bundle = stale_bundle();
    let draft = bundle.config().entities_root().join("features").join("draft.yaml");
    fs::write(&draft, "title: Draft\nlegacyOwner: alice\n").unwrap();

    let report = bundle.cleanup().run_unchecked(&[], WriteMode::Live);

    assert_eq!(report.totals.entities_cleaned, 2);
    assert_eq!(report.removed[&EntityType::Feature]["draft"], vec!["legacyOwner"]);
    assert_eq!(fs::read_to_string(&draft).unwrap(), "title: Draft\n");
}

#[test]
fn types_without_schema_properties_are_left_alone() {
    let bundle = Bundle::new();
    bundle
        .raw_schema(EntityType::Feature, "{\n  \"title\": \"Feature\"\n}\n")
        .record(EntityType::Feature, "F1", "anything: goes\n");
    let before = bundle.snapshot();

    let report = bundle.cleanup().run_unchecked(&[], WriteMode::Live);

    assert_eq!(report.totals.entities_cleaned, 0);
    assert_eq!(bundle.snapshot(), before);
}

#[test]
fn rewrites_stale_titles_once() {
    let bundle = Bundle::new();
    bundle.raw_schema(
        EntityType::Feature,
        r#"{
  "properties": {
    "id": { "type": "string" },
    "realizedByRequirementIds": {
      "type": "array",
      "title": "realized by requirement"
    }
  }
}
"#,
    );

    let cleanup = bundle.cleanup();
    let first = cleanup.run_unchecked(&[FEATURE_TITLE], WriteMode::Live);
    assert_eq!(first.totals.titles_fixed, 1);
    assert_eq!(
        bundle.property(EntityType::Feature, "realizedByRequirementIds"),
        Some(json!({"type": "array", "title": "realized by"}))
    );

    let after_first = bundle.snapshot();
    let second = cleanup.run_unchecked(&[FEATURE_TITLE], WriteMode::Live);
    assert_eq!(second.totals.titles_fixed, 0);
    assert_eq!(bundle.snapshot(), after_first);
}

#[test]
fn missing_title_properties_are_skipped() {
    let bundle = Bundle::new();
    bundle.schema(EntityType::Feature, &["id"]);

    let report = bundle
        .cleanup()
        .run_unchecked(TITLE_CORRECTIONS, WriteMode::Live);

    assert_eq!(report.totals.titles_fixed, 0);
    assert!(report.failures.is_empty());
}

#[test]
fn dry_run_reports_without_writing() {
    let bundle = stale_bundle();
    bundle.raw_schema(
        EntityType::Feature,
        r#"{
  "properties": {
    "id": { "type": "string" },
    "title": { "type": "string" },
    "realizedByRequirementIds": { "title": "realized by requirement" }
  }
}
"#,
    );
    let before = bundle.snapshot();

    let report = bundle
        .cleanup()
        .run_unchecked(&[FEATURE_TITLE], WriteMode::DryRun);

    assert_eq!(report.totals.entities_cleaned, 1);
    assert_eq!(report.totals.titles_fixed, 1);
    assert_eq!(bundle.snapshot(), before);
}

#[test]
fn broken_schema_fails_only_its_own_type() {
    let bundle = stale_bundle();
    bundle
        .raw_schema(EntityType::Requirement, "{ not json")
        .record(EntityType::Requirement, "R1", "stale: true\n");

    let report = bundle.cleanup().run_unchecked(&[], WriteMode::Live);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].unit, "Requirement");
    assert_eq!(report.totals.entities_cleaned, 1);
    assert!(
        !fs::read_to_string(bundle.record_path(EntityType::Feature, "F1"))
            .unwrap()
            .contains("legacyOwner")
    );
}

#[test]
fn declined_confirmation_aborts() {
    let bundle = stale_bundle();
    let before = bundle.snapshot();

    let outcome = bundle
        .cleanup()
        .run(TITLE_CORRECTIONS, WriteMode::Live, &mut |_: &str| false);

    assert_eq!(outcome, CleanupOutcome::Aborted);
    assert_eq!(bundle.snapshot(), before);
}
