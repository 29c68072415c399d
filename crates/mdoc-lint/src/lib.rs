//! Content checks for an mdoc corpus.
//!
//! [`Linter`] runs every check over a loaded [`Corpus`] and its
//! [`SiteIndex`] and collects the findings into a sorted [`Report`]:
//!
//! - links and anchors inside articles, duplicate headings;
//! - navigation table rows without pages, level jumps, repeated paths;
//! - articles missing from the navigation;
//! - redirect table conflicts, self-redirects, loops, chains and dangling
//!   destinations;
//! - optionally, external URLs that fail to answer.

mod content;
mod diagnostic;
mod external;
mod redirects;
mod structure;

use std::collections::HashMap;

use mdoc_index::SiteIndex;
use mdoc_pages::{Article, Corpus};
use rayon::prelude::*;

pub use diagnostic::{Code, Diagnostic, Location, Report, Severity, Summary, UnknownCode};
pub use external::ExternalOptions;

/// Settings for a lint run.
#[derive(Debug, Clone)]
pub struct LintOptions {
    /// Report articles missing from the navigation.
    pub orphans: bool,
    /// Slug of the index page, never reported as an orphan.
    pub index_slug: String,
    /// Codes to suppress.
    pub disable: Vec<Code>,
    /// Probe external links when set.
    pub external: Option<ExternalOptions>,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            orphans: true,
            index_slug: String::new(),
            disable: Vec::new(),
            external: None,
        }
    }
}

/// Runs all checks over a corpus and its index.
pub struct Linter<'a> {
    pub(crate) corpus: &'a Corpus,
    pub(crate) index: &'a SiteIndex,
    pub(crate) options: LintOptions,
    /// Last slug segment to article, for topic links.
    topics: HashMap<&'a str, &'a str>,
}

impl<'a> Linter<'a> {
    /// Create a linter.
    #[must_use]
    pub fn new(corpus: &'a Corpus, index: &'a SiteIndex, options: LintOptions) -> Self {
        let mut topics = HashMap::new();
        for slug in corpus.slugs() {
            let last = slug.rsplit('/').next().unwrap_or(slug);
            if !last.is_empty() {
                topics.entry(last).or_insert(slug);
            }
        }
        Self {
            corpus,
            index,
            options,
            topics,
        }
    }

    /// Article a topic slug refers to.
    pub(crate) fn topic_article(&self, topic: &str) -> Option<&'a Article> {
        self.topics
            .get(topic)
            .and_then(|slug| self.corpus.get(slug))
    }

    /// Run every enabled check.
    #[must_use]
    pub fn run(&self) -> Report {
        let mut diagnostics: Vec<Diagnostic> = self
            .corpus
            .articles()
            .par_iter()
            .flat_map_iter(|article| content::check_article(self, article))
            .collect();

        diagnostics.extend(structure::check_navigation(self));
        diagnostics.extend(structure::check_orphans(self));
        diagnostics.extend(redirects::check_redirects(self));
        if let Some(external) = &self.options.external {
            diagnostics.extend(external::check_external(self.corpus, external));
        }

        diagnostics.retain(|d| !self.options.disable.contains(&d.code));

        let report = Report::new(diagnostics);
        let summary = report.summary();
        tracing::info!(
            errors = summary.errors,
            warnings = summary.warnings,
            "Lint finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use mdoc_pages::CorpusConfig;
    use pretty_assertions::assert_eq;

    const INDEX: &str = "\
# MAAS documentation

[Install](/docs/install-maas) and [old](/docs/old-install).

| Level | Path | Navlink |
| -- | -- | -- |
| 1 | | Tutorials |
| 2 | install-maas | [Install MAAS](/t/install-maas/5128) |
| 4 | configure-dhcp | [Configure DHCP](/t/configure-dhcp/5132) |
| 2 | missing-page | [Missing](/t/missing-page/1) |
| 2 | install-maas | [Install again](/t/install-maas/5128) |

| Path | Location |
| -- | -- |
| /docs/old-install | /docs/install-maas |
| /docs/older-install | /docs/old-install |
| /docs/old-install | /docs/configure-dhcp |
| /docs/self | /docs/self/ |
| /docs/loop-a | /docs/loop-b |
| /docs/loop-b | /docs/loop-a |
| /docs/gone | /docs/nowhere |
| /docs/dhcp-old | /docs/legacy#dhcp |
| /docs/dhcp-old | /docs/legacy#dhcp |
| /docs/legacy | /docs/install-maas |
";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn load(dir: &Path) -> (Corpus, SiteIndex) {
        let corpus = Corpus::load(&CorpusConfig {
            source_dir: dir.to_path_buf(),
            base_path: "/docs".to_owned(),
            topic_prefix: "/t/".to_owned(),
            article_delimiter: "<!-- split -->".to_owned(),
            exclude: Vec::new(),
        })
        .unwrap();
        let index = SiteIndex::load(&dir.join("index.md"), 10).unwrap();
        (corpus, index)
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", INDEX);
        write(
            dir.path(),
            "install-maas.md",
            "# Install MAAS\n\n## Requirements\n\nSee [DHCP](configure-dhcp.md#dhcp-setup).\n\n## Requirements\n\n[top](#install-maas) [bad](#nope)\n[topic](/t/configure-dhcp/5132) [missing topic](/t/no-such/9)\n",
        );
        write(
            dir.path(),
            "configure-dhcp.md",
            "# Configure DHCP\n\n## DHCP setup\n\n[gone](/docs/nowhere)\n",
        );
        write(dir.path(), "legacy.md", "# Legacy\n");
        write(dir.path(), "orphan.md", "# Orphan\n");
        dir
    }

    fn codes_at(report: &Report, location: &Location) -> Vec<Code> {
        report
            .diagnostics()
            .iter()
            .filter(|d| &d.location == location)
            .map(|d| d.code)
            .collect()
    }

    fn file(path: &str, line: usize) -> Location {
        Location::File {
            path: path.to_owned(),
            line,
        }
    }

    #[test]
    fn test_article_checks() {
        let dir = fixture();
        let (corpus, index) = load(dir.path());

        let report = Linter::new(&corpus, &index, LintOptions::default()).run();

        assert_eq!(codes_at(&report, &file("install-maas.md", 7)), vec![Code::DuplicateHeading]);
        assert_eq!(codes_at(&report, &file("install-maas.md", 9)), vec![Code::BrokenAnchor]);
        assert_eq!(codes_at(&report, &file("install-maas.md", 10)), vec![Code::BrokenLink]);
        assert_eq!(codes_at(&report, &file("configure-dhcp.md", 5)), vec![Code::BrokenLink]);
        assert!(codes_at(&report, &file("install-maas.md", 5)).is_empty());
    }

    #[test]
    fn test_redirected_link_names_destination() {
        let dir = fixture();
        let (corpus, index) = load(dir.path());

        let report = Linter::new(&corpus, &index, LintOptions::default()).run();

        let redirected: Vec<&Diagnostic> = report
            .diagnostics()
            .iter()
            .filter(|d| d.code == Code::RedirectedLink)
            .collect();
        assert_eq!(redirected.len(), 1);
        assert_eq!(redirected[0].location, file("index.md", 3));
        assert_eq!(
            redirected[0].message,
            "link to /docs/old-install redirects to /docs/install-maas"
        );
    }

    #[test]
    fn test_navigation_checks() {
        let dir = fixture();
        let (corpus, index) = load(dir.path());

        let report = Linter::new(&corpus, &index, LintOptions::default()).run();

        assert_eq!(codes_at(&report, &Location::Nav { line: 9 }), vec![Code::NavLevelJump]);
        assert_eq!(codes_at(&report, &Location::Nav { line: 10 }), vec![Code::NavMissingPage]);
        assert_eq!(codes_at(&report, &Location::Nav { line: 11 }), vec![Code::NavDuplicatePath]);
    }

    #[test]
    fn test_orphans() {
        let dir = fixture();
        let (corpus, index) = load(dir.path());

        let report = Linter::new(&corpus, &index, LintOptions::default()).run();
        assert_eq!(codes_at(&report, &file("orphan.md", 1)), vec![Code::OrphanPage]);
        assert!(codes_at(&report, &file("index.md", 1)).is_empty());

        let options = LintOptions {
            orphans: false,
            ..LintOptions::default()
        };
        let report = Linter::new(&corpus, &index, options).run();
        assert!(codes_at(&report, &file("orphan.md", 1)).is_empty());
    }

    #[test]
    fn test_redirect_checks() {
        let dir = fixture();
        let (corpus, index) = load(dir.path());

        let report = Linter::new(&corpus, &index, LintOptions::default()).run();

        let at = |line| codes_at(&report, &Location::Redirect { line });
        assert!(at(15).is_empty());
        assert_eq!(at(16), vec![Code::RedirectChain]);
        assert_eq!(at(17), vec![Code::RedirectConflict]);
        assert_eq!(at(18), vec![Code::RedirectSelf]);
        assert_eq!(at(19), vec![Code::RedirectLoop]);
        assert_eq!(at(20), vec![Code::RedirectLoop]);
        assert_eq!(at(21), vec![Code::RedirectDangling]);
        assert_eq!(at(22), vec![Code::RedirectChain]);
        assert_eq!(at(23), vec![Code::RedirectDuplicate]);
        assert_eq!(at(24), vec![Code::RedirectShadowsPage]);
    }

    #[test]
    fn test_disable_codes() {
        let dir = fixture();
        let (corpus, index) = load(dir.path());
        let options = LintOptions {
            disable: vec![Code::RedirectLoop, Code::OrphanPage],
            ..LintOptions::default()
        };

        let report = Linter::new(&corpus, &index, options).run();

        assert!(
            report
                .diagnostics()
                .iter()
                .all(|d| d.code != Code::RedirectLoop && d.code != Code::OrphanPage)
        );
        assert!(report.has_errors());
    }

    #[test]
    fn test_clean_corpus() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "index.md",
            "# Home\n\n| Level | Path | Navlink |\n|--|--|--|\n| 1 | guide | [Guide](/t/guide/1) |\n",
        );
        write(dir.path(), "guide.md", "# Guide\n\n[home](/docs) [self](#guide)\n");
        let (corpus, index) = load(dir.path());

        let report = Linter::new(&corpus, &index, LintOptions::default()).run();

        assert!(report.diagnostics().is_empty(), "{:?}", report.diagnostics());
        assert!(report.is_clean(true));
    }
}
