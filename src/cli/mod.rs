//! Command-line interface for better-env
//!
//! `bnv init` creates the manifest, `bnv list` prints the declared names and
//! `bnv check` lints them.

use crate::{
    config::{
        find_config_file_within, parse_file, ConfigInitializer, ConfigValidator, InitOptions,
        ValidationSeverity, CONFIG_FILE_NAME,
    },
    BetterEnvError, Result,
};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// better-env command-line interface
#[derive(Parser, Debug)]
#[command(name = "bnv")]
#[command(about = "better-env: manage the environment variables a project expects")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct BetterEnvCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a .better-env file in the current project
    Init(InitArgs),

    /// Print the variable names declared in .better-env
    List(ManifestArgs),

    /// Report declarations that are not valid variable names
    Check(ManifestArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to place .better-env
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Overwrite if the file already exists
    #[arg(short, long)]
    pub force: bool,
}

impl From<InitArgs> for InitOptions {
    fn from(args: InitArgs) -> Self {
        InitOptions::new(args.path).with_force(args.force)
    }
}

#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Project directory holding .better-env (searched upwards from the
    /// current directory when omitted)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

/// CLI command executor
pub struct CliExecutor<W: Write> {
    out: W,
    json_output: bool,
    working_dir: PathBuf,
    search_ceiling: Option<PathBuf>,
}

impl<W: Write> CliExecutor<W> {
    pub fn new(out: W, json_output: bool, working_dir: PathBuf) -> Self {
        Self {
            out,
            json_output,
            working_dir,
            search_ceiling: None,
        }
    }

    /// Stop the upward manifest search once `ceiling` has been checked.
    pub fn with_search_ceiling(mut self, ceiling: Option<PathBuf>) -> Self {
        self.search_ceiling = ceiling;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Init(args) => self.execute_init(args),
            Commands::List(args) => self.execute_list(args),
            Commands::Check(args) => self.execute_check(args),
        }
    }

    fn execute_init(&mut self, args: InitArgs) -> Result<()> {
        let mut options = InitOptions::from(args);
        options.target_dir = self.working_dir.join(&options.target_dir);
        let initializer = ConfigInitializer::new(options);
        debug!(options = ?initializer.options(), "Running init");

        let written = initializer
            .initialize()
            .map_err(BetterEnvError::from)?;

        if self.json_output {
            let body = serde_json::json!({ "created": written });
            writeln!(self.out, "{}", serde_json::to_string_pretty(&body)?)?;
        } else {
            writeln!(self.out, "Created empty {} file.", CONFIG_FILE_NAME)?;
        }
        Ok(())
    }

    fn execute_list(&mut self, args: ManifestArgs) -> Result<()> {
        let file = self.resolve_manifest(args.path.as_deref())?;
        let declarations = parse_file(&file).map_err(BetterEnvError::from)?;
        info!(path = %file.display(), count = declarations.len(), "Listing declarations");

        if self.json_output {
            let body = serde_json::json!({ "file": file, "variables": declarations });
            writeln!(self.out, "{}", serde_json::to_string_pretty(&body)?)?;
        } else {
            for name in &declarations {
                writeln!(self.out, "{}", name)?;
            }
        }
        Ok(())
    }

    fn execute_check(&mut self, args: ManifestArgs) -> Result<()> {
        let file = self.resolve_manifest(args.path.as_deref())?;
        let declarations = parse_file(&file).map_err(BetterEnvError::from)?;

        let validator = ConfigValidator::new()?;
        let results = validator.validate_declarations(&declarations);
        let errors = results
            .iter()
            .filter(|r| r.severity() == ValidationSeverity::Error)
            .count();

        if self.json_output {
            let body = serde_json::json!({
                "file": file,
                "errors": errors,
                "findings": results,
                "rules": validator.rules(),
            });
            writeln!(self.out, "{}", serde_json::to_string_pretty(&body)?)?;
        } else if results.is_empty() {
            writeln!(
                self.out,
                "{}: {} declaration(s), no problems found",
                file.display(),
                declarations.len()
            )?;
        } else {
            for result in &results {
                let label = match result.severity() {
                    ValidationSeverity::Error => "error",
                    ValidationSeverity::Warning => "warning",
                    ValidationSeverity::Info => "info",
                };
                writeln!(
                    self.out,
                    "{}: {} [{}] {}",
                    file.display(),
                    label,
                    result.rule.name,
                    result.message
                )?;
            }
        }

        if errors > 0 {
            return Err(BetterEnvError::ValidationFailed { count: errors }.into());
        }
        Ok(())
    }

    fn resolve_manifest(&self, project_dir: Option<&Path>) -> Result<PathBuf> {
        match project_dir {
            Some(dir) => Ok(self.working_dir.join(dir).join(CONFIG_FILE_NAME)),
            None => find_config_file_within(&self.working_dir, self.search_ceiling.as_deref())
                .ok_or_else(|| {
                    BetterEnvError::ConfigNotFound {
                        start: self.working_dir.clone(),
                    }
                    .into()
                }),
        }
    }
}

/// Report a failed command. In JSON mode stdout must stay a single document:
/// `check` has already written its findings, so only other failures get an
/// error object.
pub fn report_error<O: Write, E: Write>(
    out: &mut O,
    err_out: &mut E,
    json_output: bool,
    error: &anyhow::Error,
) -> std::io::Result<()> {
    let already_reported = matches!(
        error.downcast_ref::<BetterEnvError>(),
        Some(BetterEnvError::ValidationFailed { .. })
    );

    if json_output {
        if !already_reported {
            let error_json = serde_json::json!({
                "error": true,
                "message": error.to_string()
            });
            writeln!(out, "{}", error_json)?;
        }
    } else {
        writeln!(err_out, "Error: {}", error)?;
    }
    Ok(())
}
