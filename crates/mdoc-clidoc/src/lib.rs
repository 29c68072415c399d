//! CLI reference pages from command introspection output.
//!
//! The introspector dumps every `maas` command as a JSON node carrying its
//! usage line, options, overview and Sphinx-style keyword epilog. This
//! crate groups those nodes by resource, renders one Markdown section per
//! command and writes one page per group, updating a numbered page in
//! place when one already exists under the output directory.
//!
//! # Example
//!
//! ```no_run
//! use mdoc_clidoc::{Generator, read_nodes};
//!
//! let nodes = read_nodes("introspection.json".as_ref()).unwrap();
//! let outcome = Generator::new("docs/reference/cli")
//!     .with_skip_groups(vec!["local".to_owned(), "admin".to_owned()])
//!     .run(&nodes)
//!     .unwrap();
//! println!("{} files changed", outcome.would_change());
//! ```

mod error;
mod generate;
mod group;
mod keywords;
mod node;
mod render;
mod text;
mod usage;

use std::path::Path;

pub use error::ClidocError;
pub use generate::{FileStatus, Generator, Outcome};
pub use group::{group_for_key, singularize};
pub use keywords::{KeywordParam, Keywords, parse_keywords_text};
pub use node::{CommandNode, OptionRow, Section, parse_nodes};
pub use render::render_command;

/// Read and parse an introspection JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of
/// command nodes.
pub fn read_nodes(path: &Path) -> Result<Vec<CommandNode>, ClidocError> {
    let json = std::fs::read_to_string(path).map_err(|e| ClidocError::io(path, e))?;
    let nodes = parse_nodes(&json)?;
    tracing::debug!(path = %path.display(), nodes = nodes.len(), "Read introspection nodes");
    Ok(nodes)
}
