//! Markdown pipe-table extraction.
//!
//! The index page carries its tables as plain GFM pipe tables, possibly
//! wrapped in Discourse `[details=...]` blocks. Only the table rows matter;
//! surrounding prose and wrapper markers are ignored.

/// A pipe table found in a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeTable {
    /// Header cells, trimmed.
    pub header: Vec<String>,
    /// 1-based line number of the header row.
    pub line: usize,
    /// Body rows in document order.
    pub rows: Vec<TableRow>,
}

/// A body row of a [`PipeTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Cells with escaped pipes unescaped and whitespace trimmed.
    pub cells: Vec<String>,
    /// 1-based line number of the row.
    pub line: usize,
}

impl PipeTable {
    /// Index of the column whose header matches `name` (case-insensitive).
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Whether the header consists of exactly these column names, in order.
    #[must_use]
    pub fn has_header(&self, names: &[&str]) -> bool {
        self.header.len() == names.len()
            && self
                .header
                .iter()
                .zip(names)
                .all(|(h, n)| h.eq_ignore_ascii_case(n))
    }
}

/// Find every pipe table in `markdown`.
///
/// A table is a pipe row immediately followed by a delimiter row. Tables
/// inside fenced code blocks are skipped.
#[must_use]
pub fn find_tables(markdown: &str) -> Vec<PipeTable> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut tables = Vec::new();
    let mut fence: Option<&str> = None;
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim_start();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            i += 1;
            continue;
        }
        if let Some(marker) = fence_marker(trimmed) {
            fence = Some(marker);
            i += 1;
            continue;
        }

        let header = split_row(lines[i]);
        let delimiter = lines.get(i + 1).and_then(|l| split_row(l));
        let (Some(header), Some(delimiter)) = (header, delimiter) else {
            i += 1;
            continue;
        };
        if !is_delimiter_row(&delimiter) {
            i += 1;
            continue;
        }

        let mut table = PipeTable {
            header,
            line: i + 1,
            rows: Vec::new(),
        };
        i += 2;
        while let Some(cells) = lines.get(i).and_then(|l| split_row(l)) {
            table.rows.push(TableRow {
                cells,
                line: i + 1,
            });
            i += 1;
        }
        tables.push(table);
    }

    tables
}

fn fence_marker(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Split a pipe row into trimmed cells.
///
/// Returns `None` for lines that contain no unescaped pipe.
#[must_use]
pub fn split_row(line: &str) -> Option<Vec<String>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut saw_pipe = false;
    let mut chars = trimmed.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => {
                saw_pipe = true;
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    cells.push(current);

    if !saw_pipe {
        return None;
    }

    // Leading and trailing pipes produce empty edge cells
    if trimmed.starts_with('|') {
        cells.remove(0);
    }
    if trimmed.ends_with('|') && !trimmed.ends_with("\\|") {
        cells.pop();
    }

    Some(cells.into_iter().map(|c| c.trim().to_owned()).collect())
}

fn is_delimiter_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|c| {
            let c = c.trim();
            !c.is_empty() && c.contains('-') && c.chars().all(|ch| ch == '-' || ch == ':')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_row_with_edge_pipes() {
        assert_eq!(
            split_row("| 1 | install | [Install](/t/install/1) |"),
            Some(vec![
                "1".to_owned(),
                "install".to_owned(),
                "[Install](/t/install/1)".to_owned()
            ])
        );
    }

    #[test]
    fn test_split_row_without_edge_pipes() {
        assert_eq!(
            split_row("/old | /new"),
            Some(vec!["/old".to_owned(), "/new".to_owned()])
        );
    }

    #[test]
    fn test_split_row_keeps_empty_middle_cell() {
        assert_eq!(
            split_row("| 1 | | [Home](/t/home/1) |"),
            Some(vec![
                "1".to_owned(),
                String::new(),
                "[Home](/t/home/1)".to_owned()
            ])
        );
    }

    #[test]
    fn test_split_row_escaped_pipe() {
        assert_eq!(
            split_row(r"| a \| b | c |"),
            Some(vec!["a | b".to_owned(), "c".to_owned()])
        );
    }

    #[test]
    fn test_split_row_plain_text_is_not_row() {
        assert_eq!(split_row("Just a paragraph."), None);
        assert_eq!(split_row("   "), None);
    }

    #[test]
    fn test_find_tables_inside_details_block() {
        let md = "\
# Redirects

[details=Mapping table]
| Path | Location |
| -- | -- |
| /docs/a | /docs/b |
| /docs/c | /docs/d |
[/details]
";
        let tables = find_tables(md);

        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert!(table.has_header(&["path", "location"]));
        assert_eq!(table.line, 4);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].cells, vec!["/docs/c", "/docs/d"]);
        assert_eq!(table.rows[1].line, 7);
    }

    #[test]
    fn test_find_tables_multiple() {
        let md = "\
| Level | Path | Navlink |
|---|---|---|
| 1 | a | [A](/t/a/1) |

Text between.

| Path | Location |
|:--|--:|
| /x | /y |
";
        let tables = find_tables(md);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].column("navlink"), Some(2));
        assert_eq!(tables[1].column("Location"), Some(1));
    }

    #[test]
    fn test_find_tables_ignores_fenced_code() {
        let md = "\
```
| Path | Location |
| -- | -- |
| /x | /y |
```
";
        assert!(find_tables(md).is_empty());
    }

    #[test]
    fn test_header_without_delimiter_is_not_table() {
        let md = "| Path | Location |\n| /x | /y |\n";
        assert!(find_tables(md).is_empty());
    }
}
