//! Redirect table consistency checks.

use mdoc_index::{Resolution, is_external, normalize_path, split_fragment};

use crate::Linter;
use crate::diagnostic::{Code, Diagnostic, Location};

pub(crate) fn check_redirects(linter: &Linter<'_>) -> Vec<Diagnostic> {
    let redirects = &linter.index.redirects;
    let corpus = linter.corpus;
    let mut diagnostics = Vec::new();

    for clash in redirects.conflicts() {
        diagnostics.push(Diagnostic::new(
            Code::RedirectConflict,
            Location::Redirect {
                line: clash.repeat.line,
            },
            format!(
                "'{}' already redirects to '{}' on line {}; '{}' is ignored",
                clash.repeat.from, clash.first.to, clash.first.line, clash.repeat.to
            ),
        ));
    }

    for clash in redirects.duplicates() {
        diagnostics.push(Diagnostic::new(
            Code::RedirectDuplicate,
            Location::Redirect {
                line: clash.repeat.line,
            },
            format!(
                "'{}' -> '{}' repeats line {}",
                clash.repeat.from, clash.repeat.to, clash.first.line
            ),
        ));
    }

    for rule in redirects.effective_rules() {
        let at = Location::Redirect { line: rule.line };
        let source = rule.source_key();
        let (dest_path, _) = split_fragment(&rule.to);

        if !is_external(dest_path) && normalize_path(dest_path) == source {
            diagnostics.push(Diagnostic::new(
                Code::RedirectSelf,
                at,
                format!("'{source}' redirects to itself"),
            ));
            continue;
        }

        if corpus.is_page_url(&source) {
            diagnostics.push(Diagnostic::new(
                Code::RedirectShadowsPage,
                at.clone(),
                format!("'{source}' is also a page and the redirect hides it"),
            ));
        }

        match redirects.resolve(&source, |p| corpus.is_page_url(p)) {
            Err(e) => {
                diagnostics.push(Diagnostic::new(Code::RedirectLoop, at, e.to_string()));
            }
            Ok(Resolution::Redirect { target, hops }) => {
                if hops > 1 {
                    diagnostics.push(Diagnostic::new(
                        Code::RedirectChain,
                        at.clone(),
                        format!("'{source}' reaches '{target}' after {hops} hops"),
                    ));
                }
                let (target_path, _) = split_fragment(&target);
                if !is_external(target_path) && !corpus.is_page_url(target_path) {
                    diagnostics.push(Diagnostic::new(
                        Code::RedirectDangling,
                        at,
                        format!("'{source}' ends at '{target}', which is not a page"),
                    ));
                }
            }
            Ok(Resolution::Page { .. } | Resolution::NotFound { .. }) => {}
        }
    }

    diagnostics
}
