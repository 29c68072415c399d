//! Navigation table and the table-of-contents tree built from it.
//!
//! The table is a flat list of `(level, path, navlink)` rows. The tree is
//! stored the same way: entries in a `Vec` with parent/children relationships
//! tracked by indices, which gives:
//! - O(1) path lookups via `path_index`
//! - O(d) breadcrumb building where d is the entry depth

use std::collections::HashMap;
use std::fmt::Write;

use serde::Serialize;

use crate::error::IndexError;
use crate::table::{PipeTable, find_tables};

/// Header of the navigation table.
const NAV_HEADER: [&str; 3] = ["level", "path", "navlink"];

/// One row of the navigation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// Nesting level (0 or 1 for top-level entries, depending on the table).
    pub level: u32,
    /// Page slug without leading or trailing slashes. Empty for group headings.
    pub path: String,
    /// Display title from the navlink cell.
    pub title: String,
    /// Link target from the navlink cell, if any.
    pub target: Option<String>,
    /// 1-based line number in the index page.
    pub line: usize,
}

/// Structural problem found in the navigation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavIssue {
    /// Level increased by more than one between consecutive entries.
    LevelJump {
        /// Entry path.
        path: String,
        /// Entry line.
        line: usize,
        /// Level of the previous entry.
        from: u32,
        /// Level of this entry.
        to: u32,
    },
    /// Path listed more than once.
    DuplicatePath {
        /// Repeated path.
        path: String,
        /// Line of the repeat.
        line: usize,
        /// Line of the first occurrence.
        first_line: usize,
    },
}

/// Parsed navigation table, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavTable {
    entries: Vec<NavEntry>,
}

impl NavTable {
    /// Parse the navigation table out of an index page.
    ///
    /// Returns an empty table if the page has no `Level | Path | Navlink` table.
    pub fn parse(markdown: &str) -> Result<Self, IndexError> {
        let Some(table) = find_tables(markdown)
            .into_iter()
            .find(|t| t.has_header(&NAV_HEADER))
        else {
            return Ok(Self::default());
        };
        Self::from_table(&table)
    }

    /// Build a table from already-parsed entries.
    #[must_use]
    pub fn from_entries(entries: Vec<NavEntry>) -> Self {
        Self { entries }
    }

    fn from_table(table: &PipeTable) -> Result<Self, IndexError> {
        let mut entries = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            if row.cells.len() < NAV_HEADER.len() {
                return Err(IndexError::ShortRow {
                    line: row.line,
                    expected: NAV_HEADER.len(),
                    found: row.cells.len(),
                });
            }
            let level = row.cells[0]
                .parse::<u32>()
                .map_err(|_| IndexError::InvalidLevel {
                    line: row.line,
                    value: row.cells[0].clone(),
                })?;
            let (title, target) = parse_navlink(&row.cells[2]);
            entries.push(NavEntry {
                level,
                path: row.cells[1].trim_matches('/').to_owned(),
                title,
                target,
                line: row.line,
            });
        }
        Ok(Self { entries })
    }

    /// Entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Structural issues: level jumps and duplicate paths.
    #[must_use]
    pub fn issues(&self) -> Vec<NavIssue> {
        let mut issues = Vec::new();
        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        let mut previous: Option<u32> = None;

        for entry in &self.entries {
            if let Some(prev) = previous
                && entry.level.saturating_sub(prev) > 1
            {
                issues.push(NavIssue::LevelJump {
                    path: entry.path.clone(),
                    line: entry.line,
                    from: prev,
                    to: entry.level,
                });
            }
            previous = Some(entry.level);

            if entry.path.is_empty() {
                continue;
            }
            if let Some(&first_line) = first_seen.get(entry.path.as_str()) {
                issues.push(NavIssue::DuplicatePath {
                    path: entry.path.clone(),
                    line: entry.line,
                    first_line,
                });
            } else {
                first_seen.insert(&entry.path, entry.line);
            }
        }

        issues
    }
}

/// Split a navlink cell into title and optional target.
///
/// `[Title](/t/slug/1)` yields both parts; anything else is a bare title.
fn parse_navlink(cell: &str) -> (String, Option<String>) {
    let cell = cell.trim();
    if let Some(inner) = cell.strip_prefix('[')
        && let Some(body) = inner.strip_suffix(')')
        && let Some((title, target)) = body.rsplit_once("](")
    {
        let target = target.trim();
        let target = (!target.is_empty()).then(|| target.to_owned());
        return (title.trim().to_owned(), target);
    }
    (cell.to_owned(), None)
}

/// Navigation item with children for UI trees and JSON output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Page slug (empty for group headings).
    pub path: String,
    /// Original navlink target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Child navigation items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Display title.
    pub title: String,
    /// Page slug.
    pub path: String,
}

/// Table-of-contents tree built from a [`NavTable`].
#[derive(Debug, Default)]
pub struct Navigation {
    entries: Vec<NavEntry>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    path_index: HashMap<String, usize>,
}

impl Navigation {
    /// Build the tree.
    ///
    /// An entry's parent is the nearest preceding entry with a strictly lower
    /// level; entries without one are roots.
    #[must_use]
    pub fn build(table: &NavTable) -> Self {
        let entries = table.entries.clone();
        let mut children = vec![Vec::new(); entries.len()];
        let mut parents = vec![None; entries.len()];
        let mut roots = Vec::new();
        let mut path_index = HashMap::new();
        let mut stack: Vec<usize> = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            while stack
                .last()
                .is_some_and(|&top| entries[top].level >= entry.level)
            {
                stack.pop();
            }

            match stack.last() {
                Some(&parent) => {
                    parents[idx] = Some(parent);
                    children[parent].push(idx);
                }
                None => roots.push(idx),
            }
            stack.push(idx);

            if !entry.path.is_empty() {
                path_index.entry(entry.path.clone()).or_insert(idx);
            }
        }

        Self {
            entries,
            children,
            parents,
            roots,
            path_index,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the navigation has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a path (first occurrence).
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&NavEntry> {
        self.path_index
            .get(path.trim_matches('/'))
            .map(|&i| &self.entries[i])
    }

    /// Whether the path appears in the navigation.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// All non-empty paths in table order, including repeats.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(|e| e.path.as_str())
            .filter(|p| !p.is_empty())
    }

    /// Full tree of navigation items.
    #[must_use]
    pub fn items(&self) -> Vec<NavItem> {
        self.roots.iter().map(|&i| self.build_item(i)).collect()
    }

    fn build_item(&self, idx: usize) -> NavItem {
        let entry = &self.entries[idx];
        NavItem {
            title: entry.title.clone(),
            path: entry.path.clone(),
            target: entry.target.clone(),
            children: self.children[idx]
                .iter()
                .map(|&c| self.build_item(c))
                .collect(),
        }
    }

    /// Ancestors of a path, root first, excluding the entry itself.
    ///
    /// Unknown paths have no breadcrumbs.
    #[must_use]
    pub fn breadcrumbs(&self, path: &str) -> Vec<Breadcrumb> {
        let Some(&idx) = self.path_index.get(path.trim_matches('/')) else {
            return Vec::new();
        };

        let mut crumbs = Vec::new();
        let mut current = self.parents[idx];
        while let Some(i) = current {
            let entry = &self.entries[i];
            crumbs.push(Breadcrumb {
                title: entry.title.clone(),
                path: entry.path.clone(),
            });
            current = self.parents[i];
        }
        crumbs.reverse();
        crumbs
    }

    /// Indented text outline, two spaces per depth.
    #[must_use]
    pub fn render_outline(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.write_outline(&mut out, root, 0);
        }
        out
    }

    fn write_outline(&self, out: &mut String, idx: usize, depth: usize) {
        let entry = &self.entries[idx];
        let indent = "  ".repeat(depth);
        if entry.path.is_empty() {
            let _ = writeln!(out, "{indent}{}", entry.title);
        } else {
            let _ = writeln!(out, "{indent}{} ({})", entry.title, entry.path);
        }
        for &child in &self.children[idx] {
            self.write_outline(out, child, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INDEX: &str = "\
# Navigation

[details=Navigation]
| Level | Path | Navlink |
| -- | -- | -- |
| 1 | | [MAAS documentation](/t/maas-documentation/25) |
| 1 | tutorials | [Tutorials](/t/tutorials/6) |
| 2 | try-out-maas | [Try out MAAS](/t/try-out-maas/12) |
| 1 | how-to | How-to guides |
| 2 | install-maas | [Install MAAS](/t/install-maas/5128) |
| 3 | upgrade-maas | [Upgrade MAAS](/t/upgrade-maas/5436) |
| 2 | configure-dhcp | [Configure DHCP](/t/configure-dhcp/5132) |
[/details]
";

    fn navigation() -> Navigation {
        Navigation::build(&NavTable::parse(INDEX).unwrap())
    }

    #[test]
    fn test_parse_entries() {
        let table = NavTable::parse(INDEX).unwrap();
        let entries = table.entries();

        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].path, "");
        assert_eq!(entries[0].title, "MAAS documentation");
        assert_eq!(
            entries[0].target.as_deref(),
            Some("/t/maas-documentation/25")
        );
        assert_eq!(entries[3].title, "How-to guides");
        assert_eq!(entries[3].target, None);
        assert_eq!(entries[4].level, 2);
        assert_eq!(entries[4].line, 10);
    }

    #[test]
    fn test_parse_missing_table_is_empty() {
        let table = NavTable::parse("# Just text\n").unwrap();
        assert!(table.entries().is_empty());
    }

    #[test]
    fn test_parse_invalid_level() {
        let md = "| Level | Path | Navlink |\n|--|--|--|\n| one | a | A |\n";
        let err = NavTable::parse(md).unwrap_err();
        assert!(matches!(err, IndexError::InvalidLevel { line: 3, .. }));
        assert!(err.to_string().contains("'one'"));
    }

    #[test]
    fn test_parse_short_row() {
        let md = "| Level | Path | Navlink |\n|--|--|--|\n| 1 | a |\n";
        let err = NavTable::parse(md).unwrap_err();
        assert!(matches!(
            err,
            IndexError::ShortRow {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_navlink_variants() {
        assert_eq!(
            parse_navlink("[Install](/t/install/1)"),
            ("Install".to_owned(), Some("/t/install/1".to_owned()))
        );
        assert_eq!(parse_navlink("[Empty]()"), ("Empty".to_owned(), None));
        assert_eq!(parse_navlink("Plain"), ("Plain".to_owned(), None));
        assert_eq!(
            parse_navlink("[Using [brackets]](/docs/x)"),
            ("Using [brackets]".to_owned(), Some("/docs/x".to_owned()))
        );
    }

    #[test]
    fn test_build_tree_structure() {
        let nav = navigation();
        let items = nav.items();

        assert_eq!(items.len(), 3);
        assert_eq!(items[1].title, "Tutorials");
        assert_eq!(items[1].children.len(), 1);
        assert_eq!(items[2].children.len(), 2);
        assert_eq!(items[2].children[0].path, "install-maas");
        assert_eq!(items[2].children[0].children[0].path, "upgrade-maas");
    }

    #[test]
    fn test_breadcrumbs() {
        let nav = navigation();

        let crumbs = nav.breadcrumbs("upgrade-maas");

        assert_eq!(
            crumbs,
            vec![
                Breadcrumb {
                    title: "How-to guides".to_owned(),
                    path: String::new(),
                },
                Breadcrumb {
                    title: "Install MAAS".to_owned(),
                    path: "install-maas".to_owned(),
                },
            ]
        );
        assert!(nav.breadcrumbs("tutorials").is_empty());
        assert!(nav.breadcrumbs("unknown").is_empty());
    }

    #[test]
    fn test_get_and_contains() {
        let nav = navigation();
        assert_eq!(nav.get("/install-maas/").unwrap().title, "Install MAAS");
        assert!(nav.contains("configure-dhcp"));
        assert!(!nav.contains("missing"));
        assert_eq!(nav.len(), 7);
    }

    #[test]
    fn test_paths_skip_group_headings() {
        let nav = navigation();
        let paths: Vec<&str> = nav.paths().collect();
        assert_eq!(
            paths,
            vec![
                "tutorials",
                "try-out-maas",
                "install-maas",
                "upgrade-maas",
                "configure-dhcp"
            ]
        );
    }

    #[test]
    fn test_level_jump_attaches_to_nearest_lower_level() {
        let table = NavTable::from_entries(vec![
            entry(1, "a", 1),
            entry(3, "deep", 2),
            entry(2, "b", 3),
        ]);
        let nav = Navigation::build(&table);
        let items = nav.items();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].children.len(), 2);
        assert_eq!(items[0].children[0].path, "deep");
    }

    #[test]
    fn test_issues_level_jump_and_duplicate() {
        let table = NavTable::from_entries(vec![
            entry(1, "a", 1),
            entry(3, "deep", 2),
            entry(1, "a", 3),
            entry(1, "", 4),
            entry(1, "", 5),
        ]);

        let issues = table.issues();

        assert_eq!(
            issues,
            vec![
                NavIssue::LevelJump {
                    path: "deep".to_owned(),
                    line: 2,
                    from: 1,
                    to: 3,
                },
                NavIssue::DuplicatePath {
                    path: "a".to_owned(),
                    line: 3,
                    first_line: 1,
                },
            ]
        );
    }

    #[test]
    fn test_issues_with_maximum_level() {
        let table = NavTable::parse(
            "\
| Level | Path | Navlink |
| -- | -- | -- |
| 4294967295 | a | A |
| 1 | b | B |
| 4294967295 | c | C |
",
        )
        .unwrap();

        let issues = table.issues();

        assert_eq!(
            issues,
            vec![NavIssue::LevelJump {
                path: "c".to_owned(),
                line: 5,
                from: 1,
                to: u32::MAX,
            }]
        );
    }

    #[test]
    fn test_render_outline() {
        let table = NavTable::from_entries(vec![
            entry(1, "", 1),
            entry(2, "install", 2),
            entry(3, "upgrade", 3),
        ]);
        let outline = Navigation::build(&table).render_outline();

        assert_eq!(
            outline,
            "Title 1\n  Title 2 (install)\n    Title 3 (upgrade)\n"
        );
    }

    #[test]
    fn test_nav_item_serialization_skips_empty_fields() {
        let item = NavItem {
            title: "Install".to_owned(),
            path: "install".to_owned(),
            target: None,
            children: Vec::new(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Install", "path": "install"}));
    }

    fn entry(level: u32, path: &str, line: usize) -> NavEntry {
        NavEntry {
            level,
            path: path.to_owned(),
            title: format!("Title {line}"),
            target: None,
            line,
        }
    }
}
