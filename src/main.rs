use anyhow::Context;
use clap::Parser;
use esker_normalizer::cli::{Args, print_summary};
use esker_normalizer::constants::{EXIT_FILES_FAILED, EXIT_SETUP_FAILURE};
use esker_normalizer::logging::setup_logging;
use esker_normalizer::{BatchProcessor, RunStats};
use std::process;
use tracing::{debug, error};

fn main() {
    let args = Args::parse();

    let code = match run(&args) {
        Ok(stats) if stats.all_succeeded() => 0,
        Ok(_) => EXIT_FILES_FAILED,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            EXIT_SETUP_FAILURE
        }
    };

    process::exit(code);
}

/// Set up config and logging, then process every file in the input folder.
///
/// The run log guard lives until this returns so every event is flushed
/// before the process exits.
fn run(args: &Args) -> anyhow::Result<RunStats> {
    let config = args.load_config().context("Failed to load configuration")?;
    let run_log = setup_logging(
        args.get_log_level(),
        args.get_file_log_level(),
        args.quiet,
        &config.log_dir,
    )
    .context("Failed to set up logging")?;
    debug!("Command line arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    let processor = BatchProcessor::new(config, args.run_date())
        .context("Failed to prepare processor")?
        .with_dry_run(args.dry_run)
        .with_progress(args.show_progress());

    let stats = processor.run().inspect_err(|e| error!("Run aborted: {}", e))?;

    if !args.quiet {
        print_summary(&stats, &run_log.path);
    }

    Ok(stats)
}
