//! `mdoc clidoc` command implementation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use mdoc_clidoc::{CommandNode, FileStatus, Generator, Outcome, parse_nodes, read_nodes};
use mdoc_config::CliSettings;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Exit code of `--check` when pages are out of date.
const EXIT_STALE: u8 = 3;

/// Arguments for the clidoc command.
#[derive(Args)]
#[command(group(clap::ArgGroup::new("input").required(true).args(["source", "stdin"])))]
pub(crate) struct ClidocArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// JSON help dump to read.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Read the JSON help dump from stdin.
    #[arg(long)]
    stdin: bool,

    /// Output directory for the generated pages (overrides config).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Report pages that would change without writing them.
    #[arg(long)]
    check: bool,
}

impl ClidocArgs {
    /// Execute the clidoc command.
    ///
    /// # Errors
    ///
    /// Returns an error if the dump cannot be read or parsed, or a page
    /// cannot be written.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();
        let config = self.common.load_config(CliSettings::default())?;

        let nodes = self.read_input()?;
        let output_dir = self
            .out
            .unwrap_or_else(|| config.clidoc_resolved.output_dir.clone());

        let outcome = Generator::new(output_dir)
            .with_skip_groups(config.clidoc_resolved.skip_groups.clone())
            .with_check(self.check)
            .run(&nodes)?;

        report(&output, &outcome, self.check);

        if self.check && outcome.would_change() > 0 {
            return Ok(ExitCode::from(EXIT_STALE));
        }
        Ok(ExitCode::SUCCESS)
    }

    fn read_input(&self) -> Result<Vec<CommandNode>, CliError> {
        if let Some(source) = &self.source {
            return Ok(read_nodes(source)?);
        }
        let json = std::io::read_to_string(std::io::stdin())?;
        Ok(parse_nodes(&json)?)
    }
}

fn report(output: &Output, outcome: &Outcome, check: bool) {
    for (path, status) in &outcome.files {
        let verb = match (status, check) {
            (FileStatus::Created, false) => "created",
            (FileStatus::Created, true) => "would create",
            (FileStatus::Updated, false) => "updated",
            (FileStatus::Updated, true) => "would update",
            (FileStatus::Unchanged, _) => continue,
        };
        output.detail(&format!("  {verb} {}", path.display()));
    }

    let summary = format!(
        "{} command(s): {} created, {} updated, {} unchanged",
        outcome.commands, outcome.created, outcome.updated, outcome.unchanged
    );
    if check && outcome.would_change() > 0 {
        output.warning(&summary);
    } else {
        output.success(&summary);
    }
}
