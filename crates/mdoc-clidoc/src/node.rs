//! Command introspection nodes.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ClidocError;

/// One CLI command as reported by the introspector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandNode {
    /// Full command line, e.g. `maas admin machines read`.
    pub key: String,
    /// Raw argparse usage text.
    pub usage: String,
    /// Option rows.
    pub options: Vec<OptionRow>,
    /// Command description.
    pub overview: String,
    /// Sphinx-style `:param:`/`:type:` epilog.
    pub keywords_text: String,
    /// Command takes a JSON body.
    pub accepts_json: bool,
    /// Command prints JSON.
    pub returns_json: bool,
    /// Extra titled sections.
    pub additional_sections: Vec<Section>,
}

/// Option row of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OptionRow {
    pub option: String,
    pub effect: String,
}

/// Titled block of extra help text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// Parse a JSON array of nodes.
///
/// Nodes without a key are dropped; when keys repeat the last node wins.
/// The result is sorted by key.
pub fn parse_nodes(json: &str) -> Result<Vec<CommandNode>, ClidocError> {
    let nodes: Vec<CommandNode> = serde_json::from_str(json)?;
    Ok(dedup_nodes(nodes))
}

pub(crate) fn dedup_nodes(nodes: Vec<CommandNode>) -> Vec<CommandNode> {
    let mut by_key = BTreeMap::new();
    for node in nodes {
        if node.key.is_empty() {
            continue;
        }
        by_key.insert(node.key.clone(), node);
    }
    by_key.into_values().collect()
}
