// plausible/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use plausible_core::domain::quality::{IssueKind, Severity};

#[derive(Parser)]
#[command(name = "plausible")]
#[command(about = "Flags implausible, inconsistent and anomalous location records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔎 Analyzes the record snapshot and writes the verification report
    Analyze {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Records file, overriding `records-path`
        #[arg(long)]
        records: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also show issues a reviewer already dismissed
        #[arg(long)]
        all: bool,

        /// Only issues of this severity
        #[arg(long)]
        severity: Option<Severity>,

        /// Only issues of this kind (e.g. "out_of_range")
        #[arg(long)]
        kind: Option<IssueKind>,

        /// Only issues on this field
        #[arg(long)]
        field: Option<String>,

        /// Case-insensitive record name search
        #[arg(long)]
        search: Option<String>,

        /// Number of records in the table
        #[arg(long, default_value = "20")]
        limit: usize,

        /// Exit with an error if a shown issue is at least this severe
        #[arg(long)]
        fail_on: Option<Severity>,
    },

    /// ✅ Dismisses one issue after human review
    Dismiss {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Record id
        #[arg(long)]
        record: String,

        #[arg(long)]
        field: String,

        #[arg(long)]
        kind: IssueKind,

        /// Why the flagged value is actually correct
        #[arg(long)]
        comment: String,

        #[arg(long, env = "PLAUSIBLE_REVIEWER")]
        reviewer: String,
    },

    /// ↩️  Revokes a dismissal so the issue shows up again
    Revoke {
        /// Dismissal id (see `plausible dismissals`)
        id: i64,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 📋 Lists active dismissals
    Dismissals {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_analyze_defaults() -> Result<()> {
        let args = Cli::parse_from(["plausible", "analyze"]);
        match args.command {
            Commands::Analyze {
                project_dir,
                records,
                format,
                all,
                limit,
                fail_on,
                ..
            } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert_eq!(records, None);
                assert_eq!(format, OutputFormat::Table);
                assert!(!all);
                assert_eq!(limit, 20);
                assert_eq!(fail_on, None);
                Ok(())
            }
            _ => bail!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_analyze_filters() -> Result<()> {
        let args = Cli::parse_from([
            "plausible",
            "analyze",
            "--format",
            "json",
            "--severity",
            "critical",
            "--kind",
            "relational",
            "--fail-on",
            "high",
        ]);
        match args.command {
            Commands::Analyze {
                format,
                severity,
                kind,
                fail_on,
                ..
            } => {
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(severity, Some(Severity::Critical));
                assert_eq!(kind, Some(IssueKind::Relational));
                assert_eq!(fail_on, Some(Severity::High));
                Ok(())
            }
            _ => bail!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_kind() {
        let res = Cli::try_parse_from([
            "plausible",
            "dismiss",
            "--record",
            "t1",
            "--field",
            "rent_1bed",
            "--kind",
            "typo",
            "--comment",
            "ok",
            "--reviewer",
            "alice",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_parse_revoke() -> Result<()> {
        let args = Cli::parse_from(["plausible", "revoke", "7", "--project-dir", "/tmp"]);
        match args.command {
            Commands::Revoke { id, project_dir } => {
                assert_eq!(id, 7);
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                Ok(())
            }
            _ => bail!("Expected Revoke command"),
        }
    }
}
