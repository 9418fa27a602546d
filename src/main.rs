// Entry point: generate one client's portal, or every client's with `--all`.
//
// - `client_portal <folder>` renders `<folder>/reports.json` into
//   `<folder>/index.html`.
// - `client_portal --all` does the same for each subfolder of `--root` that
//   has a `reports.json`, then prints a summary table.
mod batch;
mod cli;
mod error;
mod loader;
mod output;
mod portal;
mod types;
mod util;

use clap::Parser;
use cli::Cli;
use error::PortalError;
use portal::{RenderOptions, TextPolicy};
use std::process::ExitCode;
use util::{Clock, FixedClock, SystemClock};

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_single(cli: &Cli, clock: &dyn Clock, opts: &RenderOptions) -> Result<(), PortalError> {
    let Some(folder) = cli.client_folder.as_deref() else {
        return Ok(());
    };
    let folder = cli.resolve_folder(folder);
    if !folder.exists() {
        return Err(PortalError::FolderNotFound(folder));
    }
    let (path, _) = batch::generate_client(&folder, clock, opts)?;
    println!("✅ Generated: {}", path.display());
    Ok(())
}

fn run_all(cli: &Cli, clock: &dyn Clock, opts: &RenderOptions) -> Result<bool, PortalError> {
    if !cli.root.is_dir() {
        return Err(PortalError::FolderNotFound(cli.root.clone()));
    }
    let outcomes = batch::generate_all(&cli.root, clock, opts)?;
    for outcome in &outcomes {
        match &outcome.status {
            batch::ClientStatus::Generated { path, .. } => println!("✅ Generated: {}", path.display()),
            batch::ClientStatus::Failed(err) => {
                eprintln!("❌ {}: {}", outcome.folder.display(), err)
            }
            batch::ClientStatus::Skipped => {}
        }
    }
    output::print_summary(&outcomes);
    Ok(outcomes.iter().all(|o| !o.is_failure()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let opts = RenderOptions {
        escape: if cli.escape_html { TextPolicy::Escaped } else { TextPolicy::Raw },
    };

    let clock: Box<dyn Clock> = match cli.as_of {
        Some(date) => match FixedClock::on(date) {
            Some(fixed) => Box::new(fixed),
            None => {
                eprintln!("Error: {} has no local midnight", date);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(SystemClock),
    };

    let result = if cli.all {
        run_all(&cli, clock.as_ref(), &opts)
    } else {
        run_single(&cli, clock.as_ref(), &opts).map(|_| true)
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
