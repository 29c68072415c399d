//! Usage lines, positional arguments and option rows.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::{OptionRow, Section};
use crate::text::{apply_all_text_fixes, bold_list_leaders, remove_duplicate_sentences};

/// Commands that run without a profile.
pub(crate) const TOP_LEVEL: &[&str] = &[
    "login",
    "logout",
    "list",
    "refresh",
    "configauth",
    "apikey",
    "changepassword",
    "config-tls",
    "config-vault",
    "createadmin",
    "msm",
    "status",
    "init",
    "config",
    "migrate",
];

/// Descriptions for common positional argument names.
pub(crate) const POSITIONAL_ARG_DESCRIPTIONS: &[(&str, &str)] = &[
    ("system_id", "The system ID of the machine/device (e.g., `abc123`)"),
    ("id", "The ID of the resource (e.g., `1`, `abc123`)"),
    ("name", "The name of the resource (e.g., `my-machine`, `my-zone`)"),
    (
        "data ...",
        "Additional settings you can add (e.g., `architecture=amd64 hostname=my-machine`)",
    ),
];

const USAGE_MARKERS: &[&str] = &[
    " positional arguments:",
    " options:",
    " optional arguments:",
    " Keywords",
    " Command-line options",
];

const CREDENTIALS_NOTE: &str = "If credentials are not provided";

const CREDENTIALS_NOTE_FULL: &str = "If credentials are not provided on the command-line, they will be prompted for interactively.";

static USAGE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*usage\s*:?\s*").unwrap());

static BRACKETED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

static SPACED_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<opt>\S(?:.*?\S)?)\s{2,}(?P<desc>.+)$").unwrap());

static FLAG_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<opt>-?\w+(?:,\s*--\w+)?)\s{2,}(?P<desc>.+)$").unwrap());

static FLAG_LEAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[--[\w-]+").unwrap());

fn is_top_level(word: &str) -> bool {
    TOP_LEVEL.contains(&word)
}

/// Description for a positional argument.
pub(crate) fn positional_description(arg: &str) -> String {
    POSITIONAL_ARG_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == arg)
        .map_or_else(|| format!("The {arg} parameter"), |(_, desc)| (*desc).to_owned())
}

/// Clean a raw usage string for a code block.
///
/// Empty usage becomes `maas {path} [-h]`. For commands that need a
/// profile the second word is replaced with `$PROFILE`.
pub(crate) fn format_usage(usage: &str, command_path: &str) -> String {
    if usage.is_empty() {
        let path = command_path.split_whitespace().collect::<Vec<_>>().join(" ");
        return format!("maas {path} [-h]");
    }

    let mut usage = USAGE_PREFIX_RE.replace(usage, "").into_owned();
    for marker in USAGE_MARKERS {
        if let Some(idx) = usage.find(marker) {
            usage.truncate(idx);
            usage.truncate(usage.trim_end().len());
        }
    }

    if command_path.split_whitespace().next().is_some_and(is_top_level) {
        return usage;
    }

    let mut words: Vec<&str> = usage.split_whitespace().collect();
    if words.len() > 1 && words[0] == "maas" {
        words[1] = "$PROFILE";
        return words.join(" ");
    }
    usage
}

/// Positional argument names from a formatted usage line.
pub(crate) fn extract_positional_args(usage: &str, command_path: &str) -> Vec<String> {
    if usage.is_empty() {
        return Vec::new();
    }
    let path: Vec<&str> = command_path.split_whitespace().collect();
    if let [only] = path.as_slice()
        && is_top_level(only)
    {
        return Vec::new();
    }

    let scrubbed = BRACKETED_RE.replace_all(usage, "");
    let words: Vec<&str> = scrubbed.split_whitespace().collect();
    let mut tokens = words.as_slice();
    if let Some(rest) = tokens.strip_prefix(&["maas"]) {
        tokens = rest;
    }
    if let Some(rest) = tokens.strip_prefix(&["$PROFILE"]) {
        tokens = rest;
    }

    let mut skip = 0;
    for word in &path {
        if tokens.get(skip) == Some(word) {
            skip += 1;
        }
    }

    tokens[skip..]
        .iter()
        .filter(|t| !matches!(**t, "..." | "COMMAND" | "|") && !t.contains(['{', '}']))
        .map(|t| t.trim_matches([',', '|']).to_owned())
        .collect()
}

/// Split an option row whose effect was glued onto the option text.
fn extract_option_text(option: &str, effect: &str) -> (String, String) {
    if effect.is_empty()
        && !option.is_empty()
        && let Some(caps) = SPACED_OPTION_RE.captures(option)
    {
        return (caps["opt"].to_owned(), caps["desc"].trim().to_owned());
    }
    if (effect.is_empty() || effect.starts_with("Running") || effect.starts_with("Usage"))
        && let Some(caps) = FLAG_OPTION_RE.captures(option)
    {
        return (caps["opt"].to_owned(), caps["desc"].trim().to_owned());
    }
    (option.to_owned(), effect.to_owned())
}

/// Clean option rows.
///
/// Returns the rows to render and notes that belong in the additional
/// information section instead of a table cell.
pub(crate) fn normalize_options(options: &[OptionRow]) -> (Vec<OptionRow>, Vec<String>) {
    let mut rows = Vec::new();
    let mut notes = Vec::new();

    for row in options {
        let (option, mut effect) = extract_option_text(row.option.trim_end(), row.effect.trim());

        if let Some((head, _)) = effect.split_once('|') {
            effect = head.trim().to_owned();
        }
        if effect.starts_with("Running ") || effect.starts_with("usage") {
            effect.clear();
        }
        if let Some(idx) = effect.find(CREDENTIALS_NOTE) {
            notes.push(CREDENTIALS_NOTE_FULL.to_owned());
            effect.truncate(idx);
            effect.truncate(effect.trim_end().len());
        }
        if !effect.is_empty() {
            effect = remove_duplicate_sentences(&apply_all_text_fixes(&effect));
        }

        if !option.is_empty() {
            rows.push(OptionRow { option, effect });
        }
    }

    (rows, notes)
}

/// Concatenated help text that cannot be rendered sensibly.
pub(crate) fn is_malformed_content(content: &str) -> bool {
    if FLAG_LEAD_RE.is_match(content.trim()) {
        return true;
    }
    content.len() > 500 && ![". ", ".\n", "<br>", "\n\n"].iter().any(|m| content.contains(m))
}

/// Fix prose in additional sections and drop malformed or empty ones.
pub(crate) fn clean_additional_sections(sections: Vec<Section>) -> Vec<Section> {
    sections
        .into_iter()
        .filter(|section| {
            !(section.title == "additional_info" && is_malformed_content(&section.content))
        })
        .filter_map(|mut section| {
            section.content = bold_list_leaders(&apply_all_text_fixes(&section.content));
            (!section.content.trim().is_empty()).then_some(section)
        })
        .collect()
}

/// An explicit "positional arguments" section is present.
pub(crate) fn has_positional_section(sections: &[Section]) -> bool {
    sections
        .iter()
        .any(|s| s.title.trim().eq_ignore_ascii_case("positional arguments"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(option: &str, effect: &str) -> OptionRow {
        OptionRow {
            option: option.to_owned(),
            effect: effect.to_owned(),
        }
    }

    #[test]
    fn test_format_usage() {
        assert_eq!(format_usage("", "machines read"), "maas machines read [-h]");
        assert_eq!(
            format_usage("usage: maas admin machine read [-h] system_id", "machine read"),
            "maas $PROFILE machine read [-h] system_id"
        );
        assert_eq!(
            format_usage(
                "usage: maas login [-h] profile-name url options: -h, --help",
                "login"
            ),
            "maas login [-h] profile-name url"
        );
        assert_eq!(
            format_usage("usage maas admin tags read Keywords here", "tags read"),
            "maas $PROFILE tags read"
        );
    }

    #[test]
    fn test_extract_positional_args() {
        assert_eq!(
            extract_positional_args("maas $PROFILE machine read [-h] system_id", "machine read"),
            vec!["system_id"]
        );
        assert_eq!(
            extract_positional_args(
                "maas $PROFILE machine update [--help] system_id, data ... {a,b} COMMAND",
                "machine update"
            ),
            vec!["system_id", "data"]
        );
        assert!(extract_positional_args("maas login [-h] profile url", "login").is_empty());
        assert!(extract_positional_args("", "machine read").is_empty());
    }

    #[test]
    fn test_positional_description() {
        assert_eq!(positional_description("id"), "The ID of the resource (e.g., `1`, `abc123`)");
        assert_eq!(positional_description("fabric_id"), "The fabric_id parameter");
    }

    #[test]
    fn test_normalize_options_splits_glued_rows() {
        let (rows, notes) = normalize_options(&[
            row("-h, --help   show this help message and exit", ""),
            row("--debug", "Display more information. Display more information"),
            row("-k, --insecure", "Running in insecure mode"),
            row("", "orphan effect"),
        ]);

        assert_eq!(
            rows,
            vec![
                row("-h, --help", "show this help message and exit."),
                row("--debug", "Display more information."),
                row("-k, --insecure", ""),
            ]
        );
        assert!(notes.is_empty());
    }

    #[test]
    fn test_normalize_options_moves_credentials_note() {
        let (rows, notes) = normalize_options(&[row(
            "credentials",
            "OAuth credentials. If credentials are not provided they are asked for.",
        )]);

        assert_eq!(rows, vec![row("credentials", "OAuth credentials.")]);
        assert_eq!(notes, vec![CREDENTIALS_NOTE_FULL.to_owned()]);
    }

    #[test]
    fn test_normalize_options_cuts_at_pipe() {
        let (rows, _) = normalize_options(&[row("--mode", "Mode to use | extra junk")]);
        assert_eq!(rows[0].effect, "Mode to use.");
    }

    #[test]
    fn test_is_malformed_content() {
        assert!(is_malformed_content("[--debug] [--force] ..."));
        assert!(is_malformed_content(&"word ".repeat(120)));
        assert!(!is_malformed_content("Short note. Fine."));
    }

    #[test]
    fn test_clean_additional_sections() {
        let sections = vec![
            Section {
                title: "additional_info".to_owned(),
                content: "[--flag] junk".to_owned(),
            },
            Section {
                title: "Examples".to_owned(),
                content: "- Name: the the name".to_owned(),
            },
            Section {
                title: "Empty".to_owned(),
                content: "   ".to_owned(),
            },
        ];

        assert_eq!(
            clean_additional_sections(sections),
            vec![Section {
                title: "Examples".to_owned(),
                content: "- **Name**: the name".to_owned(),
            }]
        );
    }
}
