use sdd_core::{Cardinality, RuleSet};
use sdd_migrate::{CleanupOutcome, CleanupReport, RunOutcome, RunReport};
use serde::Serialize;

use crate::cli::OutputFormat;

pub mod table;

use table::{Table, TableOptions};

const ABORTED: &str = "aborted: confirmation declined, no files were changed";

/// Render a migration run.
pub fn render_run(outcome: &RunOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match (format, outcome) {
        (OutputFormat::Json, _) => json(outcome),
        (OutputFormat::Text, RunOutcome::Aborted) => Ok(ABORTED.to_string()),
        (OutputFormat::Text, RunOutcome::Completed(report)) => {
            Ok(run_text(report, TableOptions::detect()))
        }
    }
}

/// Render a cleanup pass.
pub fn render_cleanup(outcome: &CleanupOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match (format, outcome) {
        (OutputFormat::Json, _) => json(outcome),
        (OutputFormat::Text, CleanupOutcome::Aborted) => Ok(ABORTED.to_string()),
        (OutputFormat::Text, CleanupOutcome::Completed(report)) => {
            Ok(cleanup_text(report, TableOptions::detect()))
        }
    }
}

/// Render the effective rule list.
pub fn render_rules(rules: &RuleSet, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => json(&rules.rules()),
        OutputFormat::Text => Ok(rules_text(rules, TableOptions::detect())),
    }
}

pub fn print_run(outcome: &RunOutcome, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_run(outcome, format)?);
    Ok(())
}

pub fn print_cleanup(outcome: &CleanupOutcome, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_cleanup(outcome, format)?);
    Ok(())
}

pub fn print_rules(rules: &RuleSet, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_rules(rules, format)?);
    Ok(())
}

fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn run_text(report: &RunReport, options: TableOptions) -> String {
    let mut table = Table::new(["rule", "refs", "targets", "sources", "schema", "dangling", "status"]);
    for rule in &report.rules {
        match &rule.stats {
            Some(stats) => table.row([
                rule.rule.clone(),
                stats.refs_migrated.to_string(),
                stats.entities_updated.to_string(),
                stats.source_fields_removed.to_string(),
                stats.schema_updates.to_string(),
                stats.dangling_refs.to_string(),
                "ok".to_string(),
            ]),
            None => table.row([
                rule.rule.clone(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
                "failed".to_string(),
            ]),
        };
    }

    let totals = report.totals;
    let mut out = vec![
        format!("mode: {}", report.mode),
        String::new(),
        table.render(options),
        String::new(),
        format!(
            "total: {} refs migrated onto {} targets, {} source fields removed, {} schema updates, {} dangling",
            totals.refs_migrated,
            totals.entities_updated,
            totals.source_fields_removed,
            totals.schema_updates,
            totals.dangling_refs
        ),
    ];

    let failed: Vec<_> = report.rules.iter().filter(|rule| rule.failed()).collect();
    if !failed.is_empty() {
        out.push(format!("{} rules failed:", failed.len()));
        for rule in failed {
            out.push(format!(
                "  {}: {}",
                rule.rule,
                rule.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }
    out.join("\n")
}

fn cleanup_text(report: &CleanupReport, options: TableOptions) -> String {
    let mut out = vec![format!("mode: {}", report.mode), String::new()];

    let mut table = Table::new(["type", "id", "removed fields"]);
    for (entity, records) in &report.removed {
        for (id, fields) in records {
            table.row([entity.to_string(), id.clone(), fields.join(", ")]);
        }
    }
    if table.is_empty() {
        out.push("no undeclared fields found".to_string());
    } else {
        out.push(table.render(options));
    }

    let totals = report.totals;
    out.push(String::new());
    out.push(format!(
        "total: {} entities cleaned, {} fields removed, {} titles fixed",
        totals.entities_cleaned, totals.fields_removed, totals.titles_fixed
    ));

    if !report.failures.is_empty() {
        out.push(format!("{} units failed:", report.failures.len()));
        for failure in &report.failures {
            out.push(format!("  {}: {}", failure.unit, failure.error));
        }
    }
    out.join("\n")
}

fn rules_text(rules: &RuleSet, options: TableOptions) -> String {
    let mut table = Table::new(["#", "source", "field", "target", "new field", "shape"]);
    for (index, rule) in rules.rules().iter().enumerate() {
        let shape = match (rule.existing, rule.cardinality) {
            (true, _) => "existing",
            (false, Cardinality::Many) => "many",
            (false, Cardinality::Single) => "single",
        };
        table.row([
            (index + 1).to_string(),
            rule.source.to_string(),
            rule.source_field.clone(),
            rule.target.to_string(),
            rule.new_field.clone(),
            shape.to_string(),
        ]);
    }
    format!("{}\n\n{} rules", table.render(options), rules.len())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sdd_core::{EntityType, MigrationRule};
    use sdd_migrate::{MigrationStats, RuleReport, WriteMode};

    use super::*;

    fn plain() -> TableOptions {
        TableOptions::default()
    }

    fn report() -> RunReport {
        let stats = MigrationStats {
            schema_updates: 2,
            entities_updated: 2,
            refs_migrated: 3,
            source_fields_removed: 2,
            dangling_refs: 1,
        };
        RunReport {
            mode: WriteMode::DryRun,
            totals: stats,
            rules: vec![
                RuleReport {
                    rule: "Requirement.realizesFeatureIds -> Feature.realizedByRequirementIds"
                        .to_string(),
                    stats: Some(stats),
                    error: None,
                },
                RuleReport {
                    rule: "Decision.affectsFeatureIds -> Feature.affectedByDecisionIds"
                        .to_string(),
                    stats: None,
                    error: Some("Decision D1: field 'affectsFeatureIds' holds a mapping".to_string()),
                },
            ],
        }
    }

    #[test]
    fn run_text_lists_rules_totals_and_failures() {
        let out = run_text(&report(), plain());

        assert!(out.starts_with("mode: dry_run\n"));
        assert!(out.contains("3 refs migrated onto 2 targets"));
        assert!(out.contains("1 rules failed:"));
        assert!(out.contains("holds a mapping"));
        let failed_row = out
            .lines()
            .find(|line| line.starts_with("Decision.affectsFeatureIds"))
            .unwrap();
        assert!(failed_row.ends_with("failed"));
    }

    #[test]
    fn run_json_carries_status_tag() {
        let out = render_run(&RunOutcome::Completed(report()), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["status"], "completed");
        assert_eq!(parsed["totals"]["refs_migrated"], 3);
        assert!(parsed["rules"][1]["error"].is_string());
        assert!(parsed["rules"][1].get("stats").is_none());
    }

    #[test]
    fn aborted_run_renders_plainly() {
        assert_eq!(render_run(&RunOutcome::Aborted, OutputFormat::Text).unwrap(), ABORTED);
        let out = render_run(&RunOutcome::Aborted, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!({"status": "aborted"}));
    }

    #[test]
    fn rules_text_marks_existing_field_rules() {
        let rules = RuleSet::new(vec![
            MigrationRule::new(
                EntityType::Actor,
                "ownsRequirements",
                EntityType::Requirement,
                "ownerId",
            )
            .onto_existing_field(),
        ])
        .unwrap();

        let out = rules_text(&rules, plain());
        let row = out.lines().nth(2).unwrap();
        assert!(row.starts_with("1  Actor"));
        assert!(row.ends_with("existing"));
        assert!(out.ends_with("1 rules"));
    }

    #[test]
    fn rules_json_is_a_list() {
        let out = render_rules(&RuleSet::builtin().unwrap(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(26));
        assert_eq!(parsed[0]["cardinality"], "many");
    }
}
