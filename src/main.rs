//! better-env command-line entry point

use better_env::{
    cli::{report_error, BetterEnvCli, CliExecutor},
    logging::{init_logging, LogConfig},
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    let cli = BetterEnvCli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose().merge_env()
    } else {
        LogConfig::from_env()
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let working_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: cannot determine current directory: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!(cwd = %working_dir.display(), "Starting bnv v{}", env!("CARGO_PKG_VERSION"));

    let search_ceiling = std::env::var_os("BNV_SEARCH_CEILING").map(PathBuf::from);
    let mut executor = CliExecutor::new(std::io::stdout().lock(), cli.json, working_dir)
        .with_search_ceiling(search_ceiling);
    let outcome = executor.execute(cli.command);
    drop(executor);

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {:#}", e);
            if let Err(io_err) =
                report_error(&mut std::io::stdout(), &mut std::io::stderr(), cli.json, &e)
            {
                eprintln!("Error: {} ({})", e, io_err);
            }
            ExitCode::FAILURE
        }
    }
}
