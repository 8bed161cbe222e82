// plausible/src/commands/revoke.rs
//
// USE CASE: Undo a dismissal. The ledger keeps the row, stamped as revoked.

use std::path::PathBuf;

use super::Project;

pub async fn execute(project_dir: PathBuf, id: i64) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;
    let row = project.review_service()?.revoke(id).await?;
    println!(
        "↩️  Dismissal #{} revoked: {} / {} ({}) is open again",
        row.id, row.record_id, row.field_name, row.issue_kind
    );
    Ok(())
}
