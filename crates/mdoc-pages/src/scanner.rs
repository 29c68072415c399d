//! Markdown file discovery by filesystem walking.
//!
//! The scanner only finds files; reading and splitting them is done by
//! [`Corpus::load`](crate::Corpus::load).

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::PagesError;

/// Reference to a Markdown source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileRef {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Path relative to the source directory, with `/` separators.
    pub rel_path: String,
}

impl FileRef {
    /// Slug of the page the file maps to.
    pub fn slug(&self) -> String {
        file_path_to_url(Path::new(&self.rel_path), "")
    }

    /// Directory of the file relative to the source root (`""` at the root).
    pub fn dir(&self) -> &str {
        self.rel_path.rsplit_once('/').map_or("", |(dir, _)| dir)
    }
}

/// Walks a source directory for `.md` files.
pub(crate) struct Scanner {
    source_dir: PathBuf,
    exclude: Vec<Pattern>,
}

impl Scanner {
    /// Create a scanner.
    ///
    /// `exclude` globs are matched against paths relative to `source_dir`.
    pub fn new(source_dir: PathBuf, exclude: &[String]) -> Result<Self, PagesError> {
        let exclude = exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| PagesError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            source_dir,
            exclude,
        })
    }

    /// Scan the source directory, sorted by relative path.
    ///
    /// Returns an empty Vec if the source directory doesn't exist.
    pub fn scan(&self) -> Result<Vec<FileRef>, PagesError> {
        let mut refs = Vec::new();
        if self.source_dir.exists() {
            self.scan_directory(&self.source_dir, "", &mut refs)?;
        }
        refs.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Ok(refs)
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        rel_prefix: &str,
        refs: &mut Vec<FileRef>,
    ) -> Result<(), PagesError> {
        let entries = fs::read_dir(dir_path).map_err(|e| PagesError::io(dir_path, e))?;

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name().to_string_lossy().into_owned();
            // Skip hidden files/dirs
            if name.starts_with('.') {
                continue;
            }

            let rel_path = if rel_prefix.is_empty() {
                name
            } else {
                format!("{rel_prefix}/{name}")
            };
            let path = entry.path();

            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                self.scan_directory(&path, &rel_path, refs)?;
            } else if path.extension().is_some_and(|e| e == "md") {
                if self.is_excluded(&rel_path) {
                    tracing::debug!(path = %rel_path, "Excluded");
                    continue;
                }
                refs.push(FileRef { path, rel_path });
            }
        }

        Ok(())
    }

    fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(rel_path))
    }
}

/// Convert file path to URL path with optional base prefix.
///
/// Examples (with empty base):
/// - `index.md` -> `""`
/// - `guide.md` -> `"guide"`
/// - `domain/index.md` -> `"domain"`
/// - `domain/setup.md` -> `"domain/setup"`
///
/// Examples (with base):
/// - `index.md`, base `"domain"` -> `"domain"`
/// - `guide.md`, base `"domain"` -> `"domain/guide"`
#[must_use]
pub fn file_path_to_url(rel_path: &Path, base: &str) -> String {
    let path_str = rel_path.to_string_lossy().replace('\\', "/");

    let without_ext = path_str.strip_suffix(".md").unwrap_or(&path_str);

    let path_part = if without_ext == "index" {
        ""
    } else if let Some(without_index) = without_ext.strip_suffix("/index") {
        without_index
    } else {
        without_ext
    };

    match (base.is_empty(), path_part.is_empty()) {
        (true, _) => path_part.to_owned(),
        (false, true) => base.to_owned(),
        (false, false) => format!("{base}/{path_part}"),
    }
}
