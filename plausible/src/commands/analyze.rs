// plausible/src/commands/analyze.rs
//
// USE CASE: Analyze the snapshot, write the report, show what still needs review.

use anyhow::Context;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::path::PathBuf;

use plausible_core::domain::quality::{AnalysisReport, IssueFilter, IssueKind, Severity};
use plausible_core::infrastructure::fs::write_report;

use super::{Project, truncate};
use crate::cli::OutputFormat;

pub struct AnalyzeOptions {
    pub records: Option<PathBuf>,
    pub format: OutputFormat,
    pub all: bool,
    pub filter: IssueFilter,
    pub limit: usize,
    pub fail_on: Option<Severity>,
}

pub async fn execute(project_dir: PathBuf, options: AnalyzeOptions) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let table_mode = options.format == OutputFormat::Table;

    if table_mode {
        println!("⚙️  Loading configuration...");
    }
    let project = Project::load(&project_dir)?.with_records(options.records);
    if table_mode {
        println!(
            "   Project: {} (v{})",
            project.config.name, project.config.version
        );
    }

    let report = project.analyze()?;
    let report_path = write_report(&project.paths.target, &report)
        .with_context(|| format!("Failed to write report into {:?}", project.paths.target))?;

    // Filters first, then hide what reviewers already dismissed
    let filtered = AnalysisReport {
        record_reports: report.filter(&options.filter),
        ..report.clone()
    };
    let (shown, dismissed) = if options.all {
        (filtered, 0)
    } else {
        let view = project
            .review_service()?
            .resolution_index()
            .await?
            .split(&filtered);
        let dismissed = view.resolved_issue_count();
        let shown = AnalysisReport {
            record_reports: view.active,
            ..filtered
        };
        (shown, dismissed)
    };

    match options.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&shown.record_reports)?);
        }
        OutputFormat::Table => {
            print_summary(&report, dismissed);
            print_records(&shown, options.limit);
            if let Some(field) = options.filter.field.as_deref() {
                print_field(&shown, field);
            }
            print_critical(&shown);
            println!("\n📄 Report written to {}", report_path.display());
            println!("✨ Analysis finished in {:.2?}", start.elapsed());
        }
    }

    if let Some(threshold) = options.fail_on {
        let failing = shown
            .record_reports
            .iter()
            .flat_map(|r| &r.issues)
            .filter(|i| i.severity >= threshold)
            .count();
        if failing > 0 {
            anyhow::bail!("{failing} open issue(s) at or above '{threshold}'");
        }
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport, dismissed: usize) {
    let s = &report.summary;
    println!(
        "\n📊 {} records, {} with issues, {} issues total",
        s.total_records, s.records_with_issues, s.total_issues
    );
    println!(
        "   🔴 critical: {}  🟠 high: {}  🟡 medium: {}  ⚪ low: {}",
        s.by_severity.critical, s.by_severity.high, s.by_severity.medium, s.by_severity.low
    );
    let kinds: Vec<String> = IssueKind::ALL
        .iter()
        .filter_map(|k| s.by_type.get(k).map(|n| format!("{k}: {n}")))
        .collect();
    if !kinds.is_empty() {
        println!("   {}", kinds.join(", "));
    }
    if dismissed > 0 {
        println!("   ✅ {dismissed} issue(s) hidden as dismissed (use --all to show)");
    }
}

fn print_records(report: &AnalysisReport, limit: usize) {
    let total = report.record_reports.len();
    if total == 0 {
        println!("\n✨ Nothing to review.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Record", "Location", "C", "H", "M", "L", "Worst issue"]);

    let worst = report.worst_records(limit);
    for (rank, record) in worst.iter().enumerate() {
        let counts = record.severity_counts();
        let worst_issue = record
            .issues
            .iter()
            .max_by_key(|i| i.severity)
            .map(|i| format!("[{}] {}: {}", i.severity, i.field, truncate(&i.message, 60)))
            .unwrap_or_default();
        table.add_row(vec![
            (rank + 1).to_string(),
            record.record_id.clone(),
            record.location_label(),
            counts.critical.to_string(),
            counts.high.to_string(),
            counts.medium.to_string(),
            counts.low.to_string(),
            worst_issue,
        ]);
    }

    println!("\n{table}");
    if total > worst.len() {
        println!("   ... and {} more record(s)", total - worst.len());
    }
}

fn print_field(report: &AnalysisReport, field: &str) {
    let issues = report.issues_by_field(field);
    if issues.is_empty() {
        return;
    }

    println!("\n🧭 Issues on {field} ({}):", issues.len());
    for located in issues {
        println!(
            "   [{}] {}: {}",
            located.issue.severity,
            located.location_label(),
            located.issue.message
        );
    }
}

fn print_critical(report: &AnalysisReport) {
    let critical = report.critical_issues();
    if critical.is_empty() {
        return;
    }

    println!("\n🔥 Critical issues ({}):", critical.len());
    for located in critical {
        println!("   ➜ {}: {}", located.location_label(), located.issue.message);
        println!("     🔍 \"{}\"", located.verification_query());
    }
}
