//! Command-line interface for esdump
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//!
//! All export tunables come from the configuration file; the command
//! line only selects the file and the logging verbosity.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;

/// Index export tool - dump every index of a document store to files
#[derive(Parser, Debug)]
#[command(
    name = "esdump",
    version,
    about = "Export every index of a document store to JSON files",
    long_about = "Exports the full contents of every index held by a remote document \
store to local JSON files, one file per index, using scroll pagination and a bounded \
pool of concurrent workers."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Self::load_config(&args)?;

        Ok(Self { args, config })
    }

    /// Build a CLI interface from pre-parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load and validate configuration
    ///
    /// A configuration that fails validation is fatal; the run aborts
    /// before any work is scheduled.
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config = Config::load(args.config_file.as_deref())?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed command-line arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the configuration file, if one was given
    pub fn config_path(&self) -> Option<&Path> {
        self.args.config_file.as_deref()
    }

    /// Print the startup banner unless in quiet mode
    pub fn print_banner(&self) {
        if self.args.quiet {
            return;
        }

        println!("esdump {}", env!("CARGO_PKG_VERSION"));
        println!(
            "Exporting from {} into {}",
            self.config.endpoint(),
            self.config.export_root().display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = CliArgs::parse_from(["esdump"]);
        assert!(args.config_file.is_none());
        assert!(!args.quiet);
        assert!(!args.verbose);
        assert!(!args.very_verbose);
    }

    #[test]
    fn test_args_config_path() {
        let args = CliArgs::parse_from(["esdump", "-c", "/etc/esdump.toml", "-v"]);
        assert_eq!(args.config_file, Some(PathBuf::from("/etc/esdump.toml")));
        assert!(args.verbose);
    }

    #[test]
    fn test_missing_explicit_config_is_fatal() {
        let args = CliArgs::parse_from(["esdump", "-c", "/nonexistent/esdump.toml"]);
        assert!(CliInterface::from_args(args).is_err());
    }
}
