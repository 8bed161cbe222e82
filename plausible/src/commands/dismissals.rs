// plausible/src/commands/dismissals.rs

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::path::PathBuf;

use super::{Project, truncate};

pub async fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let project = Project::load(&project_dir)?;
    let rows = project.review_service()?.active_dismissals().await?;

    if rows.is_empty() {
        println!("📋 No active dismissals.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Record", "Field", "Kind", "Reviewer", "Decided", "Comment"]);
    for row in &rows {
        table.add_row(vec![
            row.id.to_string(),
            row.record_id.clone(),
            row.field_name.clone(),
            row.issue_kind.to_string(),
            row.reviewer_id.clone(),
            row.decided_at.format("%Y-%m-%d %H:%M").to_string(),
            truncate(&row.comment, 50),
        ]);
    }

    println!("📋 {} active dismissal(s)\n{table}", rows.len());
    Ok(())
}
