//! Link target classification.

use percent_encoding::percent_decode_str;

/// File extensions that mark a link as an asset rather than a page.
const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "pdf", "zip", "gz", "tgz", "tar", "txt",
    "yaml", "yml", "json", "sh", "py", "css", "js", "mp4", "webm",
];

/// What a link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// Page on this site.
    ///
    /// `path` is a page slug when the link is relative or falls under the
    /// base path; other absolute paths keep their leading `/`.
    Internal {
        /// Page slug or absolute site path.
        path: String,
        /// Decoded fragment.
        fragment: Option<String>,
    },
    /// Fragment within the same article.
    Anchor(String),
    /// `http(s)://` or `mailto:` URL.
    External(String),
    /// Discourse-style topic link (`/t/{slug}/{id}`).
    Topic {
        /// Topic slug.
        slug: String,
        /// Decoded fragment.
        fragment: Option<String>,
    },
    /// Images, assets, other schemes and empty targets.
    Other,
}

/// Site layout needed to classify links.
#[derive(Debug, Clone, Copy)]
pub struct LinkContext<'a> {
    /// Public prefix of page URLs (`/docs`, or `/` for the site root).
    pub base_path: &'a str,
    /// Prefix of topic links (`/t/`).
    pub topic_prefix: &'a str,
}

impl Default for LinkContext<'_> {
    fn default() -> Self {
        Self {
            base_path: "/docs",
            topic_prefix: "/t/",
        }
    }
}

/// Classify `target` as found in an article living in `article_dir`.
#[must_use]
pub fn classify(target: &str, article_dir: &str, ctx: &LinkContext<'_>) -> LinkKind {
    let target = target.trim();
    if target.is_empty() {
        return LinkKind::Other;
    }

    let lower = target.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:")
    {
        return LinkKind::External(target.to_owned());
    }
    if has_scheme(target) {
        return LinkKind::Other;
    }

    let (path, fragment) = match target.split_once('#') {
        Some((p, f)) => (p, (!f.is_empty()).then(|| decode(f))),
        None => (target, None),
    };
    let path = path.split_once('?').map_or(path, |(p, _)| p);

    if path.is_empty() {
        return fragment.map_or(LinkKind::Other, LinkKind::Anchor);
    }

    let path = decode(path);

    if let Some(rest) = path.strip_prefix(ctx.topic_prefix) {
        let slug = rest.split('/').next().unwrap_or_default();
        if slug.is_empty() {
            return LinkKind::Other;
        }
        return LinkKind::Topic {
            slug: slug.to_owned(),
            fragment,
        };
    }

    if is_asset(&path) {
        return LinkKind::Other;
    }

    let path = if path.starts_with('/') {
        match strip_base(&path, ctx.base_path) {
            Some(rest) => clean_segments(rest),
            None => format!("/{}", clean_segments(&path)),
        }
    } else {
        clean_segments(&format!("{article_dir}/{path}"))
    };

    LinkKind::Internal { path, fragment }
}

fn has_scheme(target: &str) -> bool {
    let end = target.find(['/', '#', '?']).unwrap_or(target.len());
    target[..end].split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

fn is_asset(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    last.rsplit_once('.').is_some_and(|(_, ext)| {
        ASSET_EXTENSIONS
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext))
    })
}

fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

/// Resolve `.` and `..`, drop `.md` and a trailing `index`, join with `/`.
fn clean_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if let Some(last) = segments.last_mut() {
        let name: &str = *last;
        *last = name.strip_suffix(".md").unwrap_or(name);
    }
    if segments.last() == Some(&"index") {
        segments.pop();
    }

    segments.join("/")
}
