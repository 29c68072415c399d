//! Sphinx-style `:param:` / `:type:` epilog parsing.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::text::{
    apply_all_text_fixes, bold_sphinx_directives, escape_md, normalize_period_spacing,
};

static PARAM_PREFIX_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(:param\s+\w+:\s+(?:Optional|Required))\.\s{2,}").unwrap()
});

static LEADING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:Optional|Required)\.\s+").unwrap());

static LEADING_OPTIONAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Optional\s+").unwrap());

const PARAM_PREFIX: &str = ":param ";
const TYPE_PREFIX: &str = ":type ";

/// One keyword parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordParam {
    pub name: String,
    /// Description, formatted for a table cell.
    pub desc: String,
    /// Type, pipe-escaped.
    pub type_name: String,
}

/// Parsed keyword epilog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords {
    /// Text outside `:param:`/`:type:` lines, formatted for a cell.
    pub lead: String,
    /// Parameters in first-mention order.
    pub params: Vec<KeywordParam>,
}

impl Keywords {
    pub fn is_empty(&self) -> bool {
        self.lead.is_empty() && self.params.is_empty()
    }
}

/// Parse a Sphinx-style epilog into a lead paragraph and parameter rows.
///
/// A `:param name: desc` line takes every following line up to the next
/// `:param`/`:type` line as continuation. `:type name: t` sets the type.
pub fn parse_keywords_text(text: &str) -> Keywords {
    if text.is_empty() {
        return Keywords::default();
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut lead_lines: Vec<&str> = Vec::new();
    let mut params: HashMap<String, KeywordParam> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut parsed_names: HashSet<String> = HashSet::new();
    let mut current: Option<String> = None;

    let mut entry = |params: &mut HashMap<String, KeywordParam>, name: &str| {
        if !params.contains_key(name) {
            order.push(name.to_owned());
        }
        params
            .entry(name.to_owned())
            .or_insert_with(|| KeywordParam {
                name: name.to_owned(),
                ..KeywordParam::default()
            })
            .name
            .clone()
    };

    let mut i = 0;
    while i < lines.len() {
        let raw = lines[i];
        let line = raw.trim();

        if line.starts_with(PARAM_PREFIX) {
            if let Some((name, desc)) = split_directive(line, PARAM_PREFIX) {
                parsed_names.insert(name.to_owned());
                let key = entry(&mut params, name);

                let mut desc_lines = vec![desc];
                let mut j = i + 1;
                while j < lines.len() {
                    let next = lines[j].trim();
                    if next.starts_with(PARAM_PREFIX) || next.starts_with(TYPE_PREFIX) {
                        break;
                    }
                    desc_lines.push(next);
                    j += 1;
                }
                if let Some(param) = params.get_mut(&key) {
                    param.desc = normalize_period_spacing(desc_lines.join("\n").trim());
                }
                current = Some(key);
                i = j;
                continue;
            }
            lead_lines.push(raw);
        } else if line.starts_with(TYPE_PREFIX) {
            if let Some((name, type_name)) = split_directive(line, TYPE_PREFIX) {
                let key = entry(&mut params, name);
                if let Some(param) = params.get_mut(&key) {
                    type_name.clone_into(&mut param.type_name);
                }
            } else {
                lead_lines.push(raw);
            }
        } else {
            match current.as_ref().and_then(|c| params.get_mut(c)) {
                Some(param) if raw.starts_with(char::is_whitespace) => {
                    let joined = format!("{}\n{}", param.desc, raw.trim_end());
                    param.desc = normalize_period_spacing(joined.trim());
                }
                _ => lead_lines.push(raw),
            }
        }
        i += 1;
    }

    let lead = clean_lead(&lead_lines, &parsed_names);
    let params = order
        .into_iter()
        .filter_map(|name| params.remove(&name))
        .map(|mut param| {
            let desc = remove_optional_prefix(param.desc.trim());
            param.desc = format_keyword_text(&apply_all_text_fixes(&desc));
            param.type_name = escape_md(&param.type_name).trim().to_owned();
            param
        })
        .collect();

    Keywords { lead, params }
}

/// Split `:param name: value` after `prefix` into trimmed name and value.
fn split_directive<'a>(line: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let (name, value) = line.strip_prefix(prefix)?.split_once(':')?;
    Some((name.trim(), value.trim()))
}

fn clean_lead(lines: &[&str], parsed_names: &HashSet<String>) -> String {
    let kept: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| {
            let trimmed = line.trim();
            let parsed = split_directive(trimmed, PARAM_PREFIX)
                .or_else(|| split_directive(trimmed, TYPE_PREFIX));
            !parsed.is_some_and(|(name, _)| parsed_names.contains(name))
        })
        .collect();
    let lead = kept.join("\n");
    let lead = PARAM_PREFIX_SPACING_RE.replace_all(lead.trim(), "$1. ");
    format_keyword_text(&apply_all_text_fixes(&lead))
}

/// Strip leading `Optional.`/`Required.` markers and a bare `Optional`.
pub(crate) fn remove_optional_prefix(text: &str) -> String {
    let mut text = text.to_owned();
    while let Some(m) = LEADING_MARKER_RE.find(&text) {
        text.replace_range(..m.end(), "");
    }
    LEADING_OPTIONAL_RE.replace(&text, "").into_owned()
}

/// Escape pipes, bold directives, fix prose and join lines with `<br>`.
fn format_keyword_text(text: &str) -> String {
    let text = bold_sphinx_directives(&escape_md(text));
    let text = apply_all_text_fixes(&text);
    text.lines().collect::<Vec<_>>().join("<br>")
}
