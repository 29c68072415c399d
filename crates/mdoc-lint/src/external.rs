//! External link probing.

use std::collections::BTreeMap;
use std::time::Duration;

use glob::Pattern;
use mdoc_pages::{Corpus, LinkKind};
use rayon::prelude::*;
use ureq::Agent;

use crate::diagnostic::{Code, Diagnostic, Location};

/// Settings for external link checks.
#[derive(Debug, Clone)]
pub struct ExternalOptions {
    /// Timeout for each request.
    pub timeout: Duration,
    /// Globs of URLs that are never probed.
    pub ignore: Vec<String>,
}

impl Default for ExternalOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            ignore: Vec::new(),
        }
    }
}

/// Create HTTP agent with the specified timeout.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

pub(crate) fn check_external(corpus: &Corpus, options: &ExternalOptions) -> Vec<Diagnostic> {
    let ignore: Vec<Pattern> = options
        .ignore
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "Skipping invalid ignore pattern");
                None
            }
        })
        .collect();

    let mut occurrences: BTreeMap<&str, Vec<Location>> = BTreeMap::new();
    for article in corpus.articles() {
        for link in &article.links {
            let LinkKind::External(url) = &link.kind else {
                continue;
            };
            let url = url.split('#').next().unwrap_or_default();
            let lower = url.to_ascii_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                continue;
            }
            if ignore.iter().any(|p| p.matches(url)) {
                continue;
            }
            occurrences.entry(url).or_default().push(Location::File {
                path: article.rel_path.clone(),
                line: link.line,
            });
        }
    }

    tracing::info!(urls = occurrences.len(), "Probing external links");
    let agent = create_agent(options.timeout);
    let urls: Vec<&str> = occurrences.keys().copied().collect();
    let failures: Vec<(&str, String)> = urls
        .par_iter()
        .filter_map(|&url| probe(&agent, url).err().map(|reason| (url, reason)))
        .collect();

    let mut diagnostics = Vec::new();
    for (url, reason) in failures {
        tracing::debug!(url, reason = %reason, "External link failed");
        for location in occurrences.get(url).into_iter().flatten() {
            diagnostics.push(Diagnostic::new(
                Code::ExternalLink,
                location.clone(),
                format!("{url}: {reason}"),
            ));
        }
    }
    diagnostics
}

/// HEAD the URL, retrying with GET when HEAD is not allowed.
fn probe(agent: &Agent, url: &str) -> Result<(), String> {
    let response = agent.head(url).call().map_err(|e| e.to_string())?;
    let mut status = response.status().as_u16();
    if status == 405 {
        let response = agent.get(url).call().map_err(|e| e.to_string())?;
        status = response.status().as_u16();
    }
    if status >= 400 {
        return Err(format!("HTTP {status}"));
    }
    Ok(())
}
