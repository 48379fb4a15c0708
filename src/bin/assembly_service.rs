use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use assembly_scaffold::error::ScaffoldError;
use assembly_scaffold::fetch::{HttpLablogFetcher, OfflineFetcher};
use assembly_scaffold::plan::RunConfig;
use assembly_scaffold::planner::{ScaffoldPlanner, ScaffoldReport};

#[derive(Parser)]
#[command(name = "assembly-service")]
#[command(about = "Prepare the lablogs for an assembly service in BU-ISCIII")]
#[command(version)]
struct Cli {
    #[arg(
        long = "offline-mode",
        help = "Create the lablogs from the embedded templates (might not be updated)"
    )]
    offline: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if report
            .downcast_ref::<ScaffoldError>()
            .is_some_and(ScaffoldError::is_fetch_error)
        {
            eprintln!("remove the partial tree and retry, or rerun with --offline-mode");
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RunConfig::today(cli.offline);

    let cwd = std::env::current_dir().into_diagnostic()?;
    let root = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|path| miette::miette!("working directory is not UTF-8: {}", path.display()))?;

    let report = if config.offline {
        ScaffoldPlanner::new(root, OfflineFetcher).run(&config)?
    } else {
        let fetcher = HttpLablogFetcher::new()?;
        ScaffoldPlanner::new(root, fetcher).run(&config)?
    };

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &ScaffoldReport) {
    tracing::debug!(
        directories = report.directories.len(),
        lablogs = report.lablogs.len(),
        analysis_dir = %report.analysis_dir,
        "scaffold complete"
    );
    println!("Folders are now ready for the assembly service!");
}
