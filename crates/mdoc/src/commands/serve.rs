//! `mdoc serve` command implementation.

use std::process::ExitCode;

use clap::Args;
use mdoc_config::CliSettings;
use mdoc_server::{run_server, server_config_from_config};

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();

        let config = self.common.load_config(CliSettings {
            host: self.host,
            port: self.port,
            ..CliSettings::default()
        })?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Source directory: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Index page: {}",
            config.docs_resolved.index_path().display()
        ));

        run_server(server_config_from_config(&config)).await?;

        Ok(ExitCode::SUCCESS)
    }
}
