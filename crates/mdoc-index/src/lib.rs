//! Index page tables for mdoc.
//!
//! The index page of a documentation corpus carries two static tables:
//!
//! - a navigation table (`Level | Path | Navlink`) describing the table of
//!   contents, turned into a [`Navigation`] tree;
//! - a redirect table (`Path | Location`) mapping deprecated URLs to current
//!   ones, turned into a [`RedirectTable`] that can resolve redirect chains.
//!
//! # Example
//!
//! ```
//! use mdoc_index::{Resolution, SiteIndex};
//!
//! let index = SiteIndex::parse(
//!     "| Path | Location |\n| -- | -- |\n| /docs/old | /docs/new |\n",
//!     10,
//! )
//! .unwrap();
//!
//! let resolution = index.redirects.resolve("/docs/old", |_| false).unwrap();
//! assert_eq!(
//!     resolution,
//!     Resolution::Redirect { target: "/docs/new".to_owned(), hops: 1 }
//! );
//! ```

mod error;
mod navigation;
mod path;
mod redirects;
mod table;

use std::path::Path;

pub use error::IndexError;
pub use navigation::{Breadcrumb, NavEntry, NavIssue, NavItem, NavTable, Navigation};
pub use path::{is_external, join_fragment, normalize_path, split_fragment};
pub use redirects::{
    DEFAULT_MAX_HOPS, RedirectError, RedirectRule, RedirectTable, Resolution, RuleClash,
};
pub use table::{PipeTable, TableRow, find_tables, split_row};

/// Both tables of an index page.
#[derive(Debug, Default)]
pub struct SiteIndex {
    /// Raw navigation rows.
    pub nav_table: NavTable,
    /// Navigation tree built from `nav_table`.
    pub navigation: Navigation,
    /// Redirect table.
    pub redirects: RedirectTable,
}

impl SiteIndex {
    /// Parse both tables from index page content.
    pub fn parse(markdown: &str, max_hops: usize) -> Result<Self, IndexError> {
        let nav_table = NavTable::parse(markdown)?;
        let navigation = Navigation::build(&nav_table);
        let redirects = RedirectTable::parse(markdown)?.with_max_hops(max_hops);
        Ok(Self {
            nav_table,
            navigation,
            redirects,
        })
    }

    /// Read and parse the index page.
    ///
    /// A missing file yields empty tables.
    pub fn load(path: &Path, max_hops: usize) -> Result<Self, IndexError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Index file not found, using empty tables");
            return Ok(Self::empty(max_hops));
        }

        let content = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::parse(&content, max_hops)?;
        tracing::info!(
            path = %path.display(),
            nav_entries = index.nav_table.entries().len(),
            redirects = index.redirects.rules().len(),
            "Loaded index"
        );
        Ok(index)
    }

    /// Index with no navigation and no redirects.
    #[must_use]
    pub fn empty(max_hops: usize) -> Self {
        Self {
            redirects: RedirectTable::default().with_max_hops(max_hops),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INDEX: &str = "\
# MAAS documentation

## Navigation

[details=Navigation]
| Level | Path | Navlink |
| -- | -- | -- |
| 1 | how-to | How-to guides |
| 2 | install-maas | [Install MAAS](/t/install-maas/5128) |
[/details]

## Redirects

[details=Mapping table]
| Path | Location |
| -- | -- |
| /docs/old-install | /docs/install-maas |
[/details]
";

    #[test]
    fn test_parse_both_tables() {
        let index = SiteIndex::parse(INDEX, 5).unwrap();

        assert_eq!(index.nav_table.entries().len(), 2);
        assert_eq!(index.navigation.items().len(), 1);
        assert_eq!(index.redirects.len(), 1);
        assert_eq!(index.redirects.max_hops(), 5);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.md");
        std::fs::write(&path, INDEX).unwrap();

        let index = SiteIndex::load(&path, 10).unwrap();

        assert_eq!(
            index.navigation.breadcrumbs("install-maas")[0].title,
            "How-to guides"
        );
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();

        let index = SiteIndex::load(&dir.path().join("index.md"), 7).unwrap();

        assert!(index.navigation.is_empty());
        assert!(index.redirects.is_empty());
        assert_eq!(index.redirects.max_hops(), 7);
    }

    #[test]
    fn test_parse_error_propagates() {
        let md = "| Level | Path | Navlink |\n|--|--|--|\n| x | a | A |\n";
        assert!(matches!(
            SiteIndex::parse(md, 10),
            Err(IndexError::InvalidLevel { .. })
        ));
    }
}
