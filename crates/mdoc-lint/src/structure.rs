//! Navigation table checks and orphan detection.

use mdoc_index::NavIssue;

use crate::Linter;
use crate::diagnostic::{Code, Diagnostic, Location};

pub(crate) fn check_navigation(linter: &Linter<'_>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for entry in linter.index.nav_table.entries() {
        if !entry.path.is_empty() && !linter.corpus.contains(&entry.path) {
            diagnostics.push(Diagnostic::new(
                Code::NavMissingPage,
                Location::Nav { line: entry.line },
                format!("navigation path '{}' has no page", entry.path),
            ));
        }
    }

    for issue in linter.index.nav_table.issues() {
        diagnostics.push(match issue {
            NavIssue::LevelJump {
                path,
                line,
                from,
                to,
            } => Diagnostic::new(
                Code::NavLevelJump,
                Location::Nav { line },
                format!("'{path}' jumps from level {from} to level {to}"),
            ),
            NavIssue::DuplicatePath {
                path,
                line,
                first_line,
            } => Diagnostic::new(
                Code::NavDuplicatePath,
                Location::Nav { line },
                format!("'{path}' is already listed on line {first_line}"),
            ),
        });
    }

    diagnostics
}

pub(crate) fn check_orphans(linter: &Linter<'_>) -> Vec<Diagnostic> {
    if !linter.options.orphans {
        return Vec::new();
    }

    let navigation = &linter.index.navigation;
    let redirects = &linter.index.redirects;

    linter
        .corpus
        .slugs()
        .filter(|slug| *slug != linter.options.index_slug)
        .filter(|slug| !navigation.contains(slug))
        .filter(|slug| !redirects.is_source(&linter.corpus.url_for(slug)))
        .filter_map(|slug| linter.corpus.get(slug))
        .map(|article| {
            Diagnostic::new(
                Code::OrphanPage,
                Location::File {
                    path: article.rel_path.clone(),
                    line: article.line_offset + 1,
                },
                format!("page '{}' is not in the navigation", article.slug),
            )
        })
        .collect()
}
