//! Loaded documentation corpus.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analyse::{Heading, Link, analyse};
use crate::error::PagesError;
use crate::link::LinkContext;
use crate::scanner::{FileRef, Scanner};
use crate::slug::slugify;
use crate::split::split_articles;

/// Settings for [`Corpus::load`].
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Root directory of the Markdown sources.
    pub source_dir: PathBuf,
    /// Public prefix of page URLs.
    pub base_path: String,
    /// Prefix of topic links.
    pub topic_prefix: String,
    /// Article bundle delimiter line.
    pub article_delimiter: String,
    /// Globs of files to skip, relative to `source_dir`.
    pub exclude: Vec<String>,
}

/// One article of the corpus.
#[derive(Debug, Clone)]
pub struct Article {
    /// Page slug (`""` for the root index).
    pub slug: String,
    /// First H1 text, else the last slug segment.
    pub title: String,
    /// Source file.
    pub source: PathBuf,
    /// Source file relative to the source directory.
    pub rel_path: String,
    /// Position within the source file, starting at 0.
    pub index_in_file: usize,
    /// Headings in document order.
    pub headings: Vec<Heading>,
    /// Links in document order.
    pub links: Vec<Link>,
    /// Article Markdown.
    pub body: String,
    /// Number of file lines before the article.
    pub line_offset: usize,
}

impl Article {
    /// Whether any heading of the article has this anchor id.
    #[must_use]
    pub fn has_anchor(&self, anchor: &str) -> bool {
        self.headings.iter().any(|h| h.anchor == anchor)
    }
}

/// All articles of a documentation source tree, sorted by slug.
#[derive(Debug, Default)]
pub struct Corpus {
    articles: Vec<Article>,
    slug_index: HashMap<String, usize>,
    base_path: String,
}

impl Corpus {
    /// Scan, read, split and analyse every Markdown file.
    pub fn load(config: &CorpusConfig) -> Result<Self, PagesError> {
        let files = Scanner::new(config.source_dir.clone(), &config.exclude)?.scan()?;
        let ctx = LinkContext {
            base_path: &config.base_path,
            topic_prefix: &config.topic_prefix,
        };

        let per_file: Vec<Vec<Article>> = files
            .par_iter()
            .map(|file| load_file(file, &config.article_delimiter, &ctx))
            .collect::<Result<_, _>>()?;

        let corpus = Self::from_articles(per_file.into_iter().flatten().collect(), &config.base_path);
        tracing::info!(
            files = files.len(),
            articles = corpus.articles.len(),
            "Loaded corpus"
        );
        Ok(corpus)
    }

    /// Build a corpus from already-analysed articles.
    ///
    /// When two articles share a slug, the one sorting first by source path
    /// is kept for lookups.
    #[must_use]
    pub fn from_articles(mut articles: Vec<Article>, base_path: &str) -> Self {
        articles.sort_by(|a, b| {
            a.slug
                .cmp(&b.slug)
                .then_with(|| a.rel_path.cmp(&b.rel_path))
                .then_with(|| a.index_in_file.cmp(&b.index_in_file))
        });

        let mut slug_index = HashMap::with_capacity(articles.len());
        for (idx, article) in articles.iter().enumerate() {
            if let Some(&first) = slug_index.get(&article.slug) {
                let first: &Article = &articles[first];
                tracing::warn!(
                    slug = %article.slug,
                    first = %first.rel_path,
                    duplicate = %article.rel_path,
                    "Duplicate article slug"
                );
                continue;
            }
            slug_index.insert(article.slug.clone(), idx);
        }

        Self {
            articles,
            slug_index,
            base_path: base_path.trim_end_matches('/').to_owned(),
        }
    }

    /// Article by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Article> {
        self.slug_index
            .get(slug.trim_matches('/'))
            .map(|&i| &self.articles[i])
    }

    /// Whether an article with this slug exists.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    /// All articles, sorted by slug.
    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Distinct slugs, sorted.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.articles
            .iter()
            .enumerate()
            .filter(|(idx, a)| self.slug_index.get(&a.slug) == Some(idx))
            .map(|(_, a)| a.slug.as_str())
    }

    /// Number of articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the corpus has no articles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Public URL path of a slug.
    #[must_use]
    pub fn url_for(&self, slug: &str) -> String {
        let slug = slug.trim_matches('/');
        match (self.base_path.is_empty(), slug.is_empty()) {
            (true, true) => "/".to_owned(),
            (true, false) => format!("/{slug}"),
            (false, true) => self.base_path.clone(),
            (false, false) => format!("{}/{slug}", self.base_path),
        }
    }

    /// Slug for a public URL path, if it falls under the base path.
    ///
    /// The slug need not exist.
    #[must_use]
    pub fn slug_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let rest = if self.base_path.is_empty() {
            url
        } else {
            url.strip_prefix(self.base_path.as_str())?
        };
        (rest.is_empty() || rest.starts_with('/')).then(|| rest.trim_matches('/'))
    }

    /// Whether a public URL path is an article.
    #[must_use]
    pub fn is_page_url(&self, url: &str) -> bool {
        self.slug_for_url(url).is_some_and(|slug| self.contains(slug))
    }

    /// Write every article to `{out_dir}/{slug}.md`.
    ///
    /// The root article is written as `index.md`. Returns written paths.
    pub fn write_split(&self, out_dir: &Path) -> Result<Vec<PathBuf>, PagesError> {
        let mut written = Vec::with_capacity(self.slug_index.len());
        for slug in self.slugs() {
            let Some(article) = self.get(slug) else {
                continue;
            };
            let name = if slug.is_empty() { "index" } else { slug };
            let path = out_dir.join(format!("{name}.md"));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| PagesError::io(parent, e))?;
            }
            let content = format!("{}\n", article.body.trim_end());
            fs::write(&path, content).map_err(|e| PagesError::io(&path, e))?;
            tracing::debug!(path = %path.display(), "Wrote article");
            written.push(path);
        }
        Ok(written)
    }
}

fn load_file(
    file: &FileRef,
    delimiter: &str,
    ctx: &LinkContext<'_>,
) -> Result<Vec<Article>, PagesError> {
    let text = fs::read_to_string(&file.path).map_err(|e| PagesError::io(&file.path, e))?;
    let file_slug = file.slug();
    let dir = file.dir();

    let articles: Vec<Article> = split_articles(&text, delimiter)
        .into_iter()
        .enumerate()
        .map(|(index_in_file, part)| {
            let analysis = analyse(&part.body, part.line_offset, dir, ctx);
            let slug = if index_in_file == 0 {
                file_slug.clone()
            } else {
                bundled_slug(dir, &file_slug, analysis.first_h1(), index_in_file + 1)
            };
            let title = analysis
                .first_h1()
                .map_or_else(|| fallback_title(&slug), str::to_owned);
            Article {
                slug,
                title,
                source: file.path.clone(),
                rel_path: file.rel_path.clone(),
                index_in_file,
                headings: analysis.headings,
                links: analysis.links,
                body: part.body,
                line_offset: part.line_offset,
            }
        })
        .collect();

    tracing::debug!(path = %file.rel_path, articles = articles.len(), "Loaded file");
    Ok(articles)
}

/// Slug of a non-first article in a bundle.
fn bundled_slug(dir: &str, file_slug: &str, h1: Option<&str>, position: usize) -> String {
    match h1.map(slugify).filter(|s| !s.is_empty()) {
        Some(slug) if dir.is_empty() => slug,
        Some(slug) => format!("{dir}/{slug}"),
        None if file_slug.is_empty() => format!("index-{position}"),
        None => format!("{file_slug}-{position}"),
    }
}

fn fallback_title(slug: &str) -> String {
    match slug.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_owned(),
        _ => "index".to_owned(),
    }
}
