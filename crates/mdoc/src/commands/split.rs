//! `mdoc split` command implementation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use mdoc_config::CliSettings;
use mdoc_pages::Corpus;

use super::{CommonArgs, corpus_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the split command.
#[derive(Args)]
pub(crate) struct SplitArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory to write the articles to.
    #[arg(long)]
    out: PathBuf,
}

impl SplitArgs {
    /// Execute the split command.
    ///
    /// # Errors
    ///
    /// Returns an error if the corpus cannot be loaded or written.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();
        let config = self.common.load_config(CliSettings::default())?;
        let corpus = Corpus::load(&corpus_config(&config))?;

        let written = corpus.write_split(&self.out)?;

        output.success(&format!(
            "Wrote {} article(s) to {}",
            written.len(),
            self.out.display()
        ));
        Ok(ExitCode::SUCCESS)
    }
}
