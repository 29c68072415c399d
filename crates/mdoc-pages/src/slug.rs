//! Heading slugs and unique anchor ids.

use std::collections::HashMap;

/// Convert text to a URL-safe slug.
///
/// ASCII alphanumerics are lowercased; runs of whitespace, `-` and `_`
/// become a single dash; everything else is dropped.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Hands out unique anchor ids within one article.
///
/// The first `x` stays `x`; repeats become `x-1`, `x-2` and so on.
#[derive(Debug, Default)]
pub(crate) struct AnchorIds {
    counts: HashMap<String, usize>,
}

impl AnchorIds {
    pub fn next(&mut self, slug: &str) -> String {
        let base = if slug.is_empty() { "section" } else { slug };
        let count = self.counts.entry(base.to_owned()).or_insert(0);
        let id = if *count == 0 {
            base.to_owned()
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Install MAAS 3.4  "), "install-maas-34");
        assert_eq!(slugify("snake_case and--dashes"), "snake-case-and-dashes");
        assert_eq!(slugify("What's new?"), "whats-new");
        assert_eq!(slugify("-- leading"), "leading");
        assert_eq!(slugify("Ünïcode"), "ncode");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_anchor_ids_unique() {
        let mut ids = AnchorIds::default();
        assert_eq!(ids.next("setup"), "setup");
        assert_eq!(ids.next("setup"), "setup-1");
        assert_eq!(ids.next("other"), "other");
        assert_eq!(ids.next("setup"), "setup-2");
        assert_eq!(ids.next(""), "section");
    }
}
