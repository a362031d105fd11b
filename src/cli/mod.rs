//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Gitport using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Gitport - Repository export orchestrator
#[derive(Parser, Debug)]
#[command(name = "gitport")]
#[command(version, about, long_about = None)]
#[command(author = "Gitport Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "gitport.toml", env = "GITPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GITPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the repositories of a space to the remote host
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["gitport", "export", "--space", "7"]);
        assert_eq!(cli.config, "gitport.toml");
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.space, 7);
                assert!(args.repo.is_empty());
                assert!(!args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_export_repo_filter() {
        let cli = Cli::parse_from(["gitport", "export", "-s", "7", "--repo", "42,43", "-y"]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.repo, vec![42, 43]);
                assert!(args.yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_export_requires_space() {
        assert!(Cli::try_parse_from(["gitport", "export"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["gitport", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["gitport", "--log-level", "debug", "init"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
