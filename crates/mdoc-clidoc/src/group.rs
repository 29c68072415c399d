//! Grouping commands into reference pages and finding their files.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::ClidocError;

const CURATED_SINGULARS: &[(&str, &str)] = &[
    ("machines", "machine"),
    ("nodes", "node"),
    ("subnets", "subnet"),
    ("fabrics", "fabric"),
    ("vlans", "vlan"),
    ("spaces", "space"),
    ("tags", "tag"),
    ("users", "user"),
    ("zones", "zone"),
    ("resource-pools", "resource-pool"),
    ("interfaces", "interface"),
    ("ipranges", "iprange"),
    ("ipaddresses", "ipaddress"),
    ("files", "file"),
    ("partitions", "partition"),
    ("block-devices", "block-device"),
    ("raid", "raid"),
    ("bcaches", "bcache"),
    ("vm-hosts", "vm-host"),
    ("vm-clusters", "vm-cluster"),
    ("boot-resources", "boot-resource"),
    ("boot-sources", "boot-source"),
    ("devices", "device"),
    ("node-devices", "node-device"),
    ("discoveries", "discovery"),
    ("dnsresources", "dnsresource"),
    ("static-routes", "static-route"),
    ("package-repositories", "package-repository"),
    ("vmfs-datastores", "vmfs-datastore"),
    ("volume-groups", "volume-group"),
    ("rack-controllers", "rack-controller"),
    ("region-controllers", "region-controller"),
    ("maas", "maas"),
];

/// Page names whose existing files use the plural form.
const PLURAL_FILE_NAMES: &[(&str, &str)] = &[
    ("commissioning-script", "commissioning-scripts"),
    ("event", "events"),
    ("ipaddress", "ipaddresses"),
    ("node-result", "node-results"),
    ("vmfs-datastore", "vmfs-datastores"),
];

/// Singular form of a CLI resource word.
pub fn singularize(resource: &str) -> &str {
    if let Some((_, singular)) = CURATED_SINGULARS.iter().find(|(plural, _)| *plural == resource) {
        return *singular;
    }
    if resource.contains('-')
        && let Some(stem) = resource.strip_suffix('s')
    {
        return stem;
    }
    if resource.len() > 3
        && let Some(stem) = resource.strip_suffix("es")
    {
        return stem;
    }
    if resource.len() > 2
        && let Some(stem) = resource.strip_suffix('s')
    {
        return stem;
    }
    resource
}

/// Page group and command path for a command key.
///
/// `maas <profile> <resource> <action>...` groups by the singular
/// resource with the path starting at the resource. A three-word key
/// groups by its second word. Anything else groups by the key without a
/// leading `maas`.
pub fn group_for_key(key: &str) -> (String, String) {
    let words: Vec<&str> = key.split_whitespace().collect();
    match words.as_slice() {
        ["maas", _, resource, _, ..] => (singularize(resource).to_owned(), words[2..].join(" ")),
        ["maas", top, _] => ((*top).to_owned(), words[1..].join(" ")),
        _ => {
            let fallback = match words.as_slice() {
                ["maas", rest @ ..] => rest.join(" "),
                _ => String::new(),
            };
            let name = if fallback.is_empty() {
                key.to_owned()
            } else {
                fallback
            };
            (name.clone(), name)
        }
    }
}

/// File base name for a group.
pub(crate) fn file_base(group: &str) -> String {
    group.replace(' ', "-").to_lowercase()
}

fn plural_file_name(base: &str) -> Option<&'static str> {
    PLURAL_FILE_NAMES
        .iter()
        .find(|(singular, _)| *singular == base)
        .map(|(_, plural)| *plural)
}

/// Existing reference pages under the output directory, sorted.
pub(crate) fn list_pages(output_dir: &Path) -> Result<Vec<PathBuf>, ClidocError> {
    if !output_dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = format!("{}/**/*.md", Pattern::escape(&output_dir.to_string_lossy()));
    let mut pages: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(Result::ok).collect();
    pages.sort();
    Ok(pages)
}

/// Existing page for `base`: `{name}-{N}.md` or `{name}-tba.md` anywhere
/// in `pages`, trying the plural alias after the base itself.
pub(crate) fn find_existing_page<'a>(base: &str, pages: &'a [PathBuf]) -> Option<&'a Path> {
    let names = std::iter::once(base).chain(plural_file_name(base));
    for name in names {
        for page in pages {
            let Some(file_name) = page.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(suffix) = file_name
                .strip_suffix(".md")
                .and_then(|stem| stem.strip_prefix(name))
                .and_then(|rest| rest.strip_prefix('-'))
            else {
                continue;
            };
            if suffix == "tba" || (!suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
            {
                return Some(page.as_path());
            }
        }
    }
    None
}
