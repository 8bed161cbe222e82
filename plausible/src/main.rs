// plausible/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::analyze::AnalyzeOptions;
use commands::dismiss::DismissRequest;
use plausible_core::PlausibleError;
use plausible_core::domain::DomainError;
use plausible_core::domain::quality::IssueFilter;
use plausible_core::infrastructure::error::InfrastructureError;

#[tokio::main]
async fn main() {
    // RUST_LOG=debug plausible analyze ... to see the per-record details
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        report_error(&err);
        // Exit with error code for CI/CD
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze {
            project_dir,
            records,
            format,
            all,
            severity,
            kind,
            field,
            search,
            limit,
            fail_on,
        } => {
            let options = AnalyzeOptions {
                records,
                format,
                all,
                filter: IssueFilter {
                    severity,
                    kind,
                    field,
                    search,
                },
                limit,
                fail_on,
            };
            commands::analyze::execute(project_dir, options).await
        }

        Commands::Dismiss {
            project_dir,
            record,
            field,
            kind,
            comment,
            reviewer,
        } => {
            let request = DismissRequest {
                record,
                field,
                kind,
                comment,
                reviewer,
            };
            commands::dismiss::execute(project_dir, request).await
        }

        Commands::Revoke { id, project_dir } => commands::revoke::execute(project_dir, id).await,

        Commands::Dismissals { project_dir } => commands::dismissals::execute(project_dir).await,
    }
}

/// Prints the context chain, then the miette rendering of the first
/// library error found in it (code + help).
fn report_error(err: &anyhow::Error) {
    eprintln!("❌ {err:#}");

    let diagnostic = err.chain().find_map(as_diagnostic);

    if let Some(diagnostic) = diagnostic {
        let mut rendered = String::new();
        if GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .render_report(&mut rendered, diagnostic)
            .is_ok()
        {
            eprintln!("{rendered}");
        }
    }
}

fn as_diagnostic<'a>(cause: &'a (dyn std::error::Error + 'static)) -> Option<&'a dyn Diagnostic> {
    if let Some(e) = cause.downcast_ref::<PlausibleError>() {
        return Some(e);
    }
    if let Some(e) = cause.downcast_ref::<InfrastructureError>() {
        return Some(e);
    }
    cause.downcast_ref::<DomainError>().map(|e| e as &dyn Diagnostic)
}
