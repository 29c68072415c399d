//! URL path normalization shared by the redirect table and its callers.

/// Whether a redirect destination points off-site.
#[must_use]
pub fn is_external(target: &str) -> bool {
    let t = target.trim_start();
    t.starts_with("http://") || t.starts_with("https://")
}

/// Split `path#fragment` into its parts. Empty fragments count as absent.
#[must_use]
pub fn split_fragment(path: &str) -> (&str, Option<&str>) {
    match path.split_once('#') {
        Some((p, f)) if !f.is_empty() => (p, Some(f)),
        Some((p, _)) => (p, None),
        None => (path, None),
    }
}

/// Re-attach a fragment to a path.
#[must_use]
pub fn join_fragment(path: &str, fragment: Option<&str>) -> String {
    match fragment {
        Some(f) => format!("{path}#{f}"),
        None => path.to_owned(),
    }
}

/// Normalize a site path for table lookups.
///
/// Trims whitespace, drops any query string, ensures a single leading
/// slash, collapses repeated slashes and removes a trailing slash except
/// for the root. External URLs are only trimmed.
///
/// The input must not carry a fragment; use [`split_fragment`] first.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    if is_external(path) {
        return path.to_owned();
    }

    let path = path.split_once('?').map_or(path, |(p, _)| p);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/docs/install/"), "/docs/install");
        assert_eq!(normalize_path("docs/install"), "/docs/install");
        assert_eq!(normalize_path("  /docs//install "), "/docs/install");
        assert_eq!(normalize_path("/docs/install?x=1"), "/docs/install");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_normalize_path_external_untouched() {
        assert_eq!(
            normalize_path(" https://maas.io/docs/ "),
            "https://maas.io/docs/"
        );
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("/a#b"), ("/a", Some("b")));
        assert_eq!(split_fragment("/a#"), ("/a", None));
        assert_eq!(split_fragment("/a"), ("/a", None));
    }

    #[test]
    fn test_join_fragment() {
        assert_eq!(join_fragment("/a", Some("top")), "/a#top");
        assert_eq!(join_fragment("/a", None), "/a");
    }
}
