use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gather_packages::cli::orchestration::{run_gather, GatherArgs};
use gather_packages::registry::NpmRegistry;
use gather_packages::{config, git, ui};

#[derive(clap::Parser)]
#[command(
    name = "gather-packages",
    version,
    about = "Stage unpublished package archives and pick the release dist-tag"
)]
struct Args {
    /// Pipeline artifact staging directory
    artifact_staging_dir: PathBuf,

    /// Sources directory containing the built archives
    sources_directory: PathBuf,

    /// Branch being built (e.g. master, release/2.x)
    branch_name: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Read the branch from the sources checkout when none is given")]
    detect_branch: bool,

    #[arg(long, help = "Preview what would happen without copying or tagging")]
    dry_run: bool,

    #[arg(short, long, help = "Log registry queries")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let branch = match args.branch_name {
        Some(branch) => Some(branch),
        None if args.detect_branch => match git::current_branch(&args.sources_directory) {
            Ok(branch) => branch,
            Err(e) => {
                ui::display_error(&format!("Cannot detect branch: {}", e));
                std::process::exit(1);
            }
        },
        None => None,
    };

    let registry = NpmRegistry::new(config.registry.command.clone())
        .with_working_dir(args.sources_directory.clone());

    let gather_args = GatherArgs {
        artifact_staging_dir: args.artifact_staging_dir,
        sources_directory: args.sources_directory,
        branch,
        dry_run: args.dry_run,
    };

    match run_gather(&gather_args, &config, &registry) {
        Ok(report) => {
            ui::display_report(&report, gather_args.dry_run);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
