//! Documentation corpus loading for mdoc.
//!
//! Scans a source directory for Markdown files, splits article bundles at
//! the delimiter line, and extracts headings and links from every article.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use mdoc_pages::{Corpus, CorpusConfig};
//!
//! let corpus = Corpus::load(&CorpusConfig {
//!     source_dir: PathBuf::from("docs"),
//!     base_path: "/docs".to_owned(),
//!     topic_prefix: "/t/".to_owned(),
//!     article_delimiter: "<!-- split -->".to_owned(),
//!     exclude: Vec::new(),
//! })
//! .unwrap();
//!
//! for article in corpus.articles() {
//!     println!("{} ({} links)", article.slug, article.links.len());
//! }
//! ```

mod analyse;
mod corpus;
mod error;
mod link;
mod scanner;
mod slug;
mod split;

pub use analyse::{Analysis, Heading, Link, analyse, parser_options};
pub use corpus::{Article, Corpus, CorpusConfig};
pub use error::PagesError;
pub use link::{LinkContext, LinkKind, classify};
pub use scanner::file_path_to_url;
pub use slug::slugify;
pub use split::{ArticleText, split_articles};
