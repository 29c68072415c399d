//! `mdoc check` command implementation.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, ValueEnum};
use mdoc_config::{CliSettings, Config};
use mdoc_lint::{Code, ExternalOptions, LintOptions, Linter, Report, Severity};
use mdoc_pages::file_path_to_url;

use super::{CommonArgs, load_site};
use crate::error::CliError;
use crate::output::Output;

/// Report format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum CheckFormat {
    /// Colored lines on stderr.
    #[default]
    Human,
    /// JSON report on stdout.
    Json,
}

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fail on warnings as well as errors.
    #[arg(long)]
    strict: bool,

    /// Probe external links (overrides config).
    #[arg(long)]
    external: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t)]
    format: CheckFormat,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config, corpus or index cannot be loaded, or a
    /// disabled check name is unknown.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();
        let config = self.common.load_config(CliSettings {
            check_external: self.external.then_some(true),
            ..CliSettings::default()
        })?;
        let options = lint_options(&config)?;
        let (corpus, index) = load_site(&config)?;

        let report = Linter::new(&corpus, &index, options).run();

        match self.format {
            CheckFormat::Human => print_human(&output, &report),
            CheckFormat::Json => {
                #[allow(clippy::print_stdout)]
                {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }

        Ok(if report.is_clean(self.strict) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

/// Lint settings from the loaded config.
fn lint_options(config: &Config) -> Result<LintOptions, CliError> {
    let disable = config
        .lint
        .disable
        .iter()
        .map(|name| name.parse::<Code>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::Validation(format!("lint.disable: {e}")))?;

    let external = config.links.check_external.then(|| ExternalOptions {
        timeout: Duration::from_secs(config.links.external_timeout_secs),
        ignore: config.links.ignore.clone(),
    });

    Ok(LintOptions {
        orphans: config.lint.orphans,
        index_slug: file_path_to_url(Path::new(&config.docs_resolved.index_file), ""),
        disable,
        external,
    })
}

fn print_human(output: &Output, report: &Report) {
    for diagnostic in report.diagnostics() {
        let line = diagnostic.to_string();
        match diagnostic.severity {
            Severity::Error => output.error(&line),
            Severity::Warning => output.warning(&line),
        }
    }

    let summary = report.summary();
    let line = format!(
        "{} error(s), {} warning(s)",
        summary.errors, summary.warnings
    );
    if summary.errors > 0 {
        output.error(&line);
    } else if summary.warnings > 0 {
        output.warning(&line);
    } else {
        output.success("No problems found");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lint_options_from_config() {
        let mut config = Config::default();
        config.lint.disable = vec!["orphan-page".to_owned()];
        config.links.check_external = true;
        config.links.external_timeout_secs = 3;

        let options = lint_options(&config).unwrap();

        assert_eq!(options.disable, vec![Code::OrphanPage]);
        assert_eq!(options.index_slug, "");
        assert_eq!(
            options.external.map(|e| e.timeout),
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn test_unknown_disabled_code_is_rejected() {
        let mut config = Config::default();
        config.lint.disable = vec!["no-such-check".to_owned()];

        let err = lint_options(&config).unwrap_err();

        assert!(err.to_string().contains("no-such-check"));
    }
}
