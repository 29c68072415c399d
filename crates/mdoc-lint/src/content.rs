//! Per-article checks: links, anchors, duplicate headings.

use std::collections::HashMap;

use mdoc_index::Resolution;
use mdoc_pages::{Article, Link, LinkKind};

use crate::Linter;
use crate::diagnostic::{Code, Diagnostic, Location};

pub(crate) fn check_article(linter: &Linter<'_>, article: &Article) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    check_headings(article, &mut diagnostics);
    for link in &article.links {
        if let Some(d) = check_link(linter, article, link) {
            diagnostics.push(d);
        }
    }
    diagnostics
}

fn location(article: &Article, line: usize) -> Location {
    Location::File {
        path: article.rel_path.clone(),
        line,
    }
}

fn check_headings(article: &Article, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for heading in &article.headings {
        if heading.slug.is_empty() {
            continue;
        }
        if let Some(&first_line) = seen.get(heading.slug.as_str()) {
            diagnostics.push(Diagnostic::new(
                Code::DuplicateHeading,
                location(article, heading.line),
                format!(
                    "heading '{}' has the same anchor as the heading on line {first_line}",
                    heading.text
                ),
            ));
        } else {
            seen.insert(&heading.slug, heading.line);
        }
    }
}

fn check_link(linter: &Linter<'_>, article: &Article, link: &Link) -> Option<Diagnostic> {
    let at = || location(article, link.line);

    match &link.kind {
        LinkKind::Anchor(fragment) => (!article.has_anchor(fragment)).then(|| {
            Diagnostic::new(
                Code::BrokenAnchor,
                at(),
                format!("anchor #{fragment} not found in this article"),
            )
        }),
        LinkKind::Internal { path, fragment } => {
            let url = if path.starts_with('/') {
                path.clone()
            } else {
                linter.corpus.url_for(path)
            };
            if linter.index.redirects.is_source(&url) {
                return redirected(linter, &url, at());
            }
            match linter
                .corpus
                .slug_for_url(&url)
                .and_then(|slug| linter.corpus.get(slug))
            {
                Some(target) => check_fragment(target, fragment.as_deref(), &url, at()),
                None => Some(Diagnostic::new(
                    Code::BrokenLink,
                    at(),
                    format!("link target {url} does not exist"),
                )),
            }
        }
        LinkKind::Topic { slug, fragment } => {
            let raw = link.target.split(['#', '?']).next().unwrap_or_default();
            if linter.index.redirects.is_source(raw) {
                return redirected(linter, raw, at());
            }
            match linter.topic_article(slug) {
                Some(target) => check_fragment(target, fragment.as_deref(), raw, at()),
                None => Some(Diagnostic::new(
                    Code::BrokenLink,
                    at(),
                    format!("topic link {raw} matches no page"),
                )),
            }
        }
        LinkKind::External(_) | LinkKind::Other => None,
    }
}

fn check_fragment(
    target: &Article,
    fragment: Option<&str>,
    url: &str,
    location: Location,
) -> Option<Diagnostic> {
    let fragment = fragment?;
    (!target.has_anchor(fragment)).then(|| {
        Diagnostic::new(
            Code::BrokenAnchor,
            location,
            format!("anchor #{fragment} not found in {url}"),
        )
    })
}

fn redirected(linter: &Linter<'_>, url: &str, location: Location) -> Option<Diagnostic> {
    match linter
        .index
        .redirects
        .resolve(url, |p| linter.corpus.is_page_url(p))
    {
        Ok(Resolution::Redirect { target, .. }) => Some(Diagnostic::new(
            Code::RedirectedLink,
            location,
            format!("link to {url} redirects to {target}"),
        )),
        Ok(Resolution::Page { .. } | Resolution::NotFound { .. }) => None,
        Err(e) => Some(Diagnostic::new(
            Code::BrokenLink,
            location,
            format!("link to {url} cannot be resolved: {e}"),
        )),
    }
}
