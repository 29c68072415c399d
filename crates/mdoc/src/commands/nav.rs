//! `mdoc nav` command implementation.

use std::process::ExitCode;

use clap::{Args, ValueEnum};
use mdoc_config::CliSettings;
use mdoc_index::{NavItem, SiteIndex};
use serde::Serialize;

use super::CommonArgs;
use crate::error::CliError;

/// Navigation output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum NavFormat {
    /// Indented outline, one entry per line.
    #[default]
    Outline,
    /// JSON tree.
    Json,
}

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    format: NavFormat,
}

#[derive(Serialize)]
struct NavigationTree {
    items: Vec<NavItem>,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or index page cannot be loaded.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let config = self.common.load_config(CliSettings::default())?;
        let index = SiteIndex::load(
            &config.docs_resolved.index_path(),
            config.redirects.max_hops,
        )?;

        let rendered = match self.format {
            NavFormat::Outline => index.navigation.render_outline(),
            NavFormat::Json => {
                let tree = NavigationTree {
                    items: index.navigation.items(),
                };
                serde_json::to_string_pretty(&tree)? + "\n"
            }
        };

        #[allow(clippy::print_stdout)]
        {
            print!("{rendered}");
        }
        Ok(ExitCode::SUCCESS)
    }
}
