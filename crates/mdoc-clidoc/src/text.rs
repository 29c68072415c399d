//! Prose clean-up applied to introspected help text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PERIOD_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\s{2,}").unwrap());

static TRIPLE_PRODUCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\*(\d+)\*(\d+)").unwrap());

static ARITHMETIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*+\-=/]\s*\d+\s*[*+\-=/]").unwrap());

static OPTIONAL_TRIPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOptional\s+\w+\.\s+Optional\.\s+Optional\s+").unwrap());

static OPTIONAL_TRIPLE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOptional\s+\w+\.\s+Optional\.\s+Optional\b").unwrap());

static OPTIONAL_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOptional\s+\w+\.\s+Optional\.").unwrap());

static OPTIONAL_REPEAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOptional\.\s+Optional\.").unwrap());

static ALSO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\balso\s+also\b").unwrap());

static AND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\band\s+and\b").unwrap());

static SHORT_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:the|a|an|is|are|was|were)\b").unwrap());

static QUOTED_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([a-zA-Z0-9\-]+)""#).unwrap());

static QUOTED_NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(\d+-\w+)""#).unwrap());

static VERY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bvery\s+").unwrap());

static NEWLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

static SENTENCE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\s+").unwrap());

static FRAGMENT_LEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:mode|and|or|the|a|an|to|for|with|in|on|at)\s+").unwrap()
});

static SPHINX_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^:([a-z0-9_\-]+):").unwrap());

/// Collapse runs of whitespace after a period to one space.
pub(crate) fn normalize_period_spacing(text: &str) -> String {
    PERIOD_SPACING_RE.replace_all(text, ". ").into_owned()
}

/// Replace `...` with `…` unless a word character follows.
pub(crate) fn fix_ellipsis(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("...") {
        let after = &rest[pos + 3..];
        let followed_by_word = after
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        out.push_str(&rest[..pos]);
        out.push_str(if followed_by_word { "..." } else { "\u{2026}" });
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Remove accidentally repeated words.
///
/// Text that looks like arithmetic is left alone after spacing out
/// `a*b*c` products.
pub(crate) fn fix_lexical_illusions(text: &str) -> String {
    let text = TRIPLE_PRODUCT_RE.replace_all(text, "$1 * $2 * $3");
    if ARITHMETIC_RE.is_match(&text) {
        return text.into_owned();
    }

    let text = OPTIONAL_TRIPLE_RE.replace_all(&text, |caps: &Captures<'_>| {
        caps[0].replace(" Optional. Optional ", " ")
    });
    let text = OPTIONAL_TRIPLE_END_RE.replace_all(&text, |caps: &Captures<'_>| {
        caps[0].replace(" Optional. Optional", "")
    });
    let text = OPTIONAL_PAIR_RE.replace_all(&text, |caps: &Captures<'_>| {
        caps[0].replace(" Optional.", "")
    });
    let text = OPTIONAL_REPEAT_RE.replace_all(&text, "Optional.");
    let text = ALSO_RE.replace_all(&text, "also");
    let text = AND_RE.replace_all(&text, "and");
    collapse_repeated_short_words(&text)
}

/// `the the` -> `the`, for a handful of short words, case-insensitively.
fn collapse_repeated_short_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(m) = SHORT_WORD_RE.find_at(text, pos) {
        let word = m.as_str();
        let rest = &text[m.end()..];
        let gap = rest.len() - rest.trim_start().len();
        let next = &rest[gap..];

        let repeated = gap > 0
            && next.is_char_boundary(word.len().min(next.len()))
            && next.len() >= word.len()
            && next[..word.len()].eq_ignore_ascii_case(word)
            && !next[word.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_');

        if repeated {
            out.push_str(&text[copied..m.start()]);
            out.push_str(word);
            copied = m.end() + gap + word.len();
            pos = copied;
        } else {
            pos = m.end();
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Straight double quotes around a single token become curly quotes.
///
/// Skipped for text with inline code, unless it is a `<br>`-joined cell.
pub(crate) fn fix_curly_quotes(text: &str) -> String {
    if !text.contains("<br>") && text.contains('`') {
        return text.to_owned();
    }
    let text = QUOTED_WORD_RE.replace_all(text, "\u{201C}$1\u{201D}");
    QUOTED_NUMBERED_RE
        .replace_all(&text, "\u{201C}$1\u{201D}")
        .into_owned()
}

/// Drop the word "very".
pub(crate) fn fix_weasel_words(text: &str) -> String {
    VERY_RE.replace_all(text, "").into_owned()
}

/// Apply every prose fix in order.
pub(crate) fn apply_all_text_fixes(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = normalize_period_spacing(text);
    let text = fix_ellipsis(&text);
    let text = fix_lexical_illusions(&text);
    let text = fix_curly_quotes(&text);
    fix_weasel_words(&text)
}

/// Escape pipes for table cells.
pub(crate) fn escape_md(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Flatten text into a single table cell: newlines become `<br>`.
pub(crate) fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = NEWLINE_RE.replace_all(text.trim(), "<br>");
    apply_all_text_fixes(&escape_md(&text))
}

/// Bold Sphinx-style `:name:` directives at line starts.
pub(crate) fn bold_sphinx_directives(text: &str) -> String {
    SPHINX_DIRECTIVE_RE
        .replace_all(text, "**:$1:**")
        .into_owned()
}

/// Bold the leader of list items like `- Name: details`.
pub(crate) fn bold_list_leaders(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.lines()
        .map(|line| {
            let stripped = line.trim_start();
            let indent = &line[..line.len() - stripped.len()];
            match stripped.strip_prefix("- ").and_then(|s| s.split_once(':')) {
                Some((head, rest)) => format!("{indent}- **{}**:{rest}", head.trim()),
                None => line.to_owned(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop repeated sentences and fragments of earlier sentences.
pub(crate) fn remove_duplicate_sentences(text: &str) -> String {
    let mut seen = HashSet::new();
    let mut cleaned: Vec<&str> = Vec::new();

    for (index, sentence) in SENTENCE_SPLIT_RE.split(text).enumerate() {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        let lower = sentence.to_lowercase();
        if !seen.contains(&lower) && !is_sentence_fragment(sentence, &cleaned, index) {
            seen.insert(lower);
            cleaned.push(sentence);
        }
    }

    if cleaned.is_empty() {
        return text.to_owned();
    }
    let mut result = cleaned.join(". ");
    if !result.ends_with('.') {
        result.push('.');
    }
    result.trim().to_owned()
}

fn is_sentence_fragment(sentence: &str, previous: &[&str], index: usize) -> bool {
    let lower = sentence.to_lowercase();
    for prev in previous {
        let prev_lower = prev.to_lowercase();
        if (prev_lower.contains(&lower) || lower.contains(&prev_lower))
            && lower.len().abs_diff(prev_lower.len()) > 10
        {
            return true;
        }
    }
    index > 0
        && !sentence.chars().next().is_some_and(char::is_uppercase)
        && FRAGMENT_LEAD_RE.is_match(&lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_period_spacing() {
        assert_eq!(normalize_period_spacing("One.  Two.   Three."), "One. Two. Three.");
        assert_eq!(normalize_period_spacing("One. Two."), "One. Two.");
    }

    #[test]
    fn test_fix_ellipsis() {
        assert_eq!(fix_ellipsis("Wait..."), "Wait\u{2026}");
        assert_eq!(fix_ellipsis("data ... more"), "data \u{2026} more");
        assert_eq!(fix_ellipsis("a...b"), "a...b");
        assert_eq!(fix_ellipsis("no dots"), "no dots");
    }

    #[test]
    fn test_fix_lexical_illusions() {
        assert_eq!(fix_lexical_illusions("Use the the tool."), "Use the tool.");
        assert_eq!(fix_lexical_illusions("It is IS fine."), "It is fine.");
        assert_eq!(fix_lexical_illusions("a the the b"), "a the b");
        assert_eq!(fix_lexical_illusions("This also also works"), "This also works");
        assert_eq!(fix_lexical_illusions("cats and and dogs"), "cats and dogs");
        assert_eq!(fix_lexical_illusions("theme them"), "theme them");
        assert_eq!(fix_lexical_illusions("an another"), "an another");
    }

    #[test]
    fn test_fix_lexical_illusions_optional() {
        assert_eq!(
            fix_lexical_illusions("Optional. Optional. The zone."),
            "Optional. The zone."
        );
        assert_eq!(
            fix_lexical_illusions("Optional String. Optional. Name"),
            "Optional String. Name"
        );
    }

    #[test]
    fn test_fix_lexical_illusions_skips_arithmetic() {
        assert_eq!(fix_lexical_illusions("size 2*3*4 the the"), "size 2 * 3 * 4 the the");
    }

    #[test]
    fn test_fix_curly_quotes() {
        assert_eq!(fix_curly_quotes(r#"Set "auto" mode"#), "Set \u{201C}auto\u{201D} mode");
        assert_eq!(fix_curly_quotes(r#"Use `x` and "auto""#), r#"Use `x` and "auto""#);
        assert_eq!(
            fix_curly_quotes(r#"`x`<br>"auto""#),
            "`x`<br>\u{201C}auto\u{201D}"
        );
        assert_eq!(fix_curly_quotes(r#""two words""#), r#""two words""#);
    }

    #[test]
    fn test_fix_weasel_words() {
        assert_eq!(fix_weasel_words("A very Very fast tool"), "A fast tool");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text("  First line\nsecond | part\r\nthird  "),
            "First line<br>second \\| part<br>third"
        );
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_bold_list_leaders() {
        let text = "Intro: text\n- Name: the name\n  - Nested: value\n- plain item";
        assert_eq!(
            bold_list_leaders(text),
            "Intro: text\n- **Name**: the name\n  - **Nested**: value\n- plain item"
        );
    }

    #[test]
    fn test_bold_sphinx_directives() {
        assert_eq!(bold_sphinx_directives(":note: hi"), "**:note:** hi");
        assert_eq!(
            bold_sphinx_directives("text :inline:\n:seealso: x"),
            "text :inline:\n**:seealso:** x"
        );
        assert_eq!(bold_sphinx_directives(":param name: x"), ":param name: x");
    }

    #[test]
    fn test_remove_duplicate_sentences() {
        assert_eq!(
            remove_duplicate_sentences("Show help. Show help. Exit"),
            "Show help. Exit."
        );
        assert_eq!(
            remove_duplicate_sentences("Enable debug mode for the server. debug mode"),
            "Enable debug mode for the server."
        );
        assert_eq!(
            remove_duplicate_sentences("Set the zone. and more text here"),
            "Set the zone."
        );
        assert_eq!(remove_duplicate_sentences(""), "");
    }
}
