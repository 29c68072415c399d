//! `mdoc resolve` command implementation.

use std::process::ExitCode;

use clap::Args;
use mdoc_config::CliSettings;
use mdoc_index::Resolution;

use super::{CommonArgs, load_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Request paths to resolve.
    #[arg(required = true)]
    paths: Vec<String>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// Prints one line per path on stdout. Paths that are not found or end
    /// in a redirect loop make the command fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the config, corpus or index cannot be loaded.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();
        let config = self.common.load_config(CliSettings::default())?;
        let (corpus, index) = load_site(&config)?;

        let mut failed = false;
        for path in &self.paths {
            match index.redirects.resolve(path, |p| corpus.is_page_url(p)) {
                Ok(resolution) => {
                    failed |= matches!(resolution, Resolution::NotFound { .. });
                    #[allow(clippy::print_stdout)]
                    {
                        println!("{}", describe(path, &resolution));
                    }
                }
                Err(err) => {
                    failed = true;
                    output.error(&format!("{path}: {err}"));
                }
            }
        }

        Ok(if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}

/// One-line description of a resolution.
fn describe(request: &str, resolution: &Resolution) -> String {
    match resolution {
        Resolution::Page { path } => format!("{request}\tpage\t{path}"),
        Resolution::Redirect { target, hops } => {
            format!("{request}\tredirect\t{target}\t{hops}")
        }
        Resolution::NotFound { path } => format!("{request}\tnot_found\t{path}"),
    }
}
