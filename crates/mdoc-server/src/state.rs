//! Application state.
//!
//! Loaded once at startup and shared by all request handlers.

use std::collections::HashMap;

use mdoc_index::SiteIndex;
use mdoc_pages::{Article, Corpus};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Loaded articles.
    pub(crate) corpus: Corpus,
    /// Navigation and redirect tables.
    pub(crate) index: SiteIndex,
    /// Prefix of topic links, e.g. `/t/`.
    pub(crate) topic_prefix: String,
    /// Last slug segment to full slug, for topic links.
    topics: HashMap<String, String>,
}

impl AppState {
    pub(crate) fn new(corpus: Corpus, index: SiteIndex, topic_prefix: String) -> Self {
        let mut topics = HashMap::new();
        for slug in corpus.slugs() {
            let last = slug.rsplit('/').next().unwrap_or(slug);
            if !last.is_empty() {
                topics
                    .entry(last.to_owned())
                    .or_insert_with(|| slug.to_owned());
            }
        }
        Self {
            corpus,
            index,
            topic_prefix,
            topics,
        }
    }

    /// Article a topic slug refers to.
    pub(crate) fn topic_article(&self, topic: &str) -> Option<&Article> {
        self.topics
            .get(topic)
            .and_then(|slug| self.corpus.get(slug))
    }
}
