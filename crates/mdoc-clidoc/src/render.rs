//! Markdown for a single command.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::keywords::{Keywords, parse_keywords_text};
use crate::node::{CommandNode, OptionRow, Section};
use crate::text::normalize_text;
use crate::usage::{
    clean_additional_sections, extract_positional_args, format_usage, has_positional_section,
    normalize_options, positional_description,
};

static TOKEN_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*(\s+[a-z_][a-z0-9_]*)+$").unwrap());

const HELP_FOR_PREFIX: &str = "cli help for:";

/// Render one command section.
///
/// The result has no trailing newline; callers join sections with a
/// blank line.
pub fn render_command(node: &CommandNode, command_path: &str) -> String {
    let overview_lines: Vec<&str> = node
        .overview
        .lines()
        .filter(|line| !line.trim().to_lowercase().starts_with(HELP_FOR_PREFIX))
        .collect();
    let mut overview = normalize_text(&overview_lines.join("\n"));
    if overview.ends_with("<br>") && should_blank_overview(&overview) {
        overview.clear();
    }

    let mut usage = format_usage(&node.usage, command_path);
    if let Some(first) = overview_lines.first().map(|line| line.trim())
        && !first.is_empty()
        && let Some(head) = usage.strip_suffix(first)
    {
        usage = head.trim_end().to_owned();
    }

    let mut sections = node.additional_sections.clone();
    let explicit_positionals = has_positional_section(&sections);
    let mut positional = if explicit_positionals {
        Vec::new()
    } else {
        extract_positional_args(&usage, command_path)
    };
    if !explicit_positionals && positional.is_empty() && !overview.is_empty() {
        let flat = overview.replace("<br>", " ");
        if TOKEN_ONLY_RE.is_match(&flat) && command_path.split_whitespace().count() >= 2 {
            positional = flat.split_whitespace().map(str::to_owned).collect();
            overview.clear();
        }
    }

    let (options, notes) = normalize_options(&node.options);
    if !notes.is_empty() {
        sections.push(Section {
            title: "additional_info".to_owned(),
            content: notes.join("\n"),
        });
    }
    let sections = clean_additional_sections(sections);

    let keywords = parse_keywords_text(&node.keywords_text);

    let mut blocks: Vec<String> = vec![format!("## {command_path}")];
    if !overview.is_empty() {
        blocks.push(overview);
    }
    blocks.push(format!("```bash\n{usage}\n```"));
    if !positional.is_empty() {
        blocks.push(positional_table(&positional));
    }
    if !keywords.is_empty() {
        blocks.push(keywords_block(&keywords));
    }
    if !options.is_empty() {
        blocks.push(options_table(&options));
    }
    for section in &sections {
        blocks.push(format!(
            "#### {}\n{}",
            section_heading(&section.title),
            section.content.trim_end()
        ));
    }
    if node.accepts_json {
        blocks.push("This command accepts JSON.".to_owned());
    }
    if node.returns_json {
        blocks.push("This command returns JSON.".to_owned());
    }

    blocks.join("\n\n")
}

/// Overview that is a bare run of words without a sentence.
fn should_blank_overview(overview: &str) -> bool {
    let flat = overview.replace("<br>", " ");
    let flat = flat.trim();
    !flat.is_empty() && !flat.contains('.') && flat.contains(' ')
}

fn section_heading(title: &str) -> &str {
    match title {
        "additional_info" => "Additional information",
        other => other,
    }
}

fn positional_table(args: &[String]) -> String {
    let mut out = String::from("#### Positional arguments\n| Argument | Effect |\n|----------|--------|");
    for arg in args {
        let _ = write!(out, "\n| {arg} | {} |", positional_description(arg));
    }
    out
}

fn keywords_block(keywords: &Keywords) -> String {
    let mut out = String::from("#### Keywords");
    if !keywords.lead.is_empty() {
        let _ = write!(out, "\n{}", keywords.lead);
    }
    if !keywords.params.is_empty() {
        if !keywords.lead.is_empty() {
            out.push('\n');
        }
        out.push_str("\n| Keyword | Type | Description |\n|---|---|---|");
        for param in &keywords.params {
            let _ = write!(
                out,
                "\n| {} | {} | {} |",
                param.name, param.type_name, param.desc
            );
        }
    }
    out
}

fn options_table(options: &[OptionRow]) -> String {
    let mut out = String::from("#### Command-line options\n| Option | Effect |\n|---|---|");
    for row in options {
        let _ = write!(out, "\n| {} | {} |", row.option.trim(), row.effect.trim());
    }
    out
}
