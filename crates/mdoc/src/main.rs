//! mdoc CLI - documentation site toolchain.
//!
//! Provides commands for:
//! - `check`: Lint articles, navigation and redirects
//! - `nav`: Print the navigation tree
//! - `resolve`: Resolve paths through the redirect table
//! - `split`: Write one file per article
//! - `clidoc`: Generate CLI reference pages from a help dump
//! - `serve`: Start the preview server

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use commands::{CheckArgs, ClidocArgs, CommonArgs, NavArgs, ResolveArgs, ServeArgs, SplitArgs};
use error::CliError;
use output::Output;

/// mdoc - documentation site toolchain.
#[derive(Parser)]
#[command(name = "mdoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check links, anchors, navigation and redirects.
    Check(CheckArgs),
    /// Print the navigation tree.
    Nav(NavArgs),
    /// Resolve paths through the redirect table.
    Resolve(ResolveArgs),
    /// Write each article to its own file.
    Split(SplitArgs),
    /// Generate CLI reference pages from a help dump.
    Clidoc(ClidocArgs),
    /// Start the preview server.
    Serve(ServeArgs),
}

impl Commands {
    fn common(&self) -> &CommonArgs {
        match self {
            Self::Check(args) => &args.common,
            Self::Nav(args) => &args.common,
            Self::Resolve(args) => &args.common,
            Self::Split(args) => &args.common,
            Self::Clidoc(args) => &args.common,
            Self::Serve(args) => &args.common,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(cli.command.common().verbose, rust_log.as_deref());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
        Commands::Split(args) => args.execute(),
        Commands::Clidoc(args) => args.execute(),
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// `--verbose` enables INFO level, otherwise `RUST_LOG` with WARN as default.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(rust_log.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_common_args_on_every_command() {
        let cli = Cli::parse_from(["mdoc", "nav", "-v", "-s", "docs", "--format", "json"]);
        let common = cli.command.common();
        assert!(common.verbose);
        assert_eq!(common.source_dir.as_deref(), Some(std::path::Path::new("docs")));
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(false, None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(false, Some("")).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_filter_verbose_and_rust_log() {
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(false, Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn test_clidoc_requires_one_input() {
        assert!(Cli::try_parse_from(["mdoc", "clidoc", "--out", "cli"]).is_err());
        assert!(
            Cli::try_parse_from(["mdoc", "clidoc", "--stdin", "--source", "a.json"]).is_err()
        );
        assert!(Cli::try_parse_from(["mdoc", "clidoc", "--stdin"]).is_ok());
    }
}
