//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod clidoc;
pub(crate) mod nav;
pub(crate) mod resolve;
pub(crate) mod serve;
pub(crate) mod split;

use std::path::PathBuf;

use clap::Args;
use mdoc_config::{CliSettings, Config};
use mdoc_index::SiteIndex;
use mdoc_pages::{Corpus, CorpusConfig};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use clidoc::ClidocArgs;
pub(crate) use nav::NavArgs;
pub(crate) use resolve::ResolveArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use split::SplitArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover mdoc.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    pub source_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Load config, applying the source directory and any command overrides.
    pub(crate) fn load_config(&self, settings: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            source_dir: self.source_dir.clone(),
            ..settings
        };
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded config");
        }
        Ok(config)
    }
}

/// Corpus settings from the loaded config.
pub(crate) fn corpus_config(config: &Config) -> CorpusConfig {
    let docs = &config.docs_resolved;
    CorpusConfig {
        source_dir: docs.source_dir.clone(),
        base_path: docs.base_path.clone(),
        topic_prefix: config.links.topic_prefix.clone(),
        article_delimiter: docs.article_delimiter.clone(),
        exclude: docs.exclude.clone(),
    }
}

/// Load the corpus and the index page tables.
pub(crate) fn load_site(config: &Config) -> Result<(Corpus, SiteIndex), CliError> {
    let corpus = Corpus::load(&corpus_config(config))?;
    let index = SiteIndex::load(&config.docs_resolved.index_path(), config.redirects.max_hops)?;
    Ok((corpus, index))
}

