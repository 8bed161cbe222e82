// plausible/src/commands/dismiss.rs
//
// USE CASE: A reviewer confirms a flagged value is correct.

use anyhow::Context;
use std::path::PathBuf;

use plausible_core::application::DismissOutcome;
use plausible_core::domain::quality::IssueKind;

use super::Project;

pub struct DismissRequest {
    pub record: String,
    pub field: String,
    pub kind: IssueKind,
    pub comment: String,
    pub reviewer: String,
}

pub async fn execute(project_dir: PathBuf, request: DismissRequest) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;

    // Re-analyze so the ledger snapshots the issue as it currently reads
    let report = project.analyze()?;
    let record = report
        .record_reports
        .iter()
        .find(|r| r.record_id == request.record)
        .with_context(|| format!("Record '{}' has no open issues", request.record))?;
    let issue = record
        .issues
        .iter()
        .find(|i| i.field == request.field && i.kind == request.kind)
        .with_context(|| {
            format!(
                "No '{}' issue on field '{}' for record '{}'",
                request.kind, request.field, request.record
            )
        })?;

    let service = project.review_service()?;
    match service
        .dismiss(record, issue, &request.comment, &request.reviewer)
        .await?
    {
        DismissOutcome::Dismissed(row) => {
            println!(
                "✅ Dismissal #{} recorded: {} / {} ({})",
                row.id, record.location_label(), row.field_name, row.issue_kind
            );
        }
        DismissOutcome::AlreadyResolved => {
            println!("ℹ️  Already dismissed by another reviewer. Nothing to do.");
        }
    }
    Ok(())
}
