//! Heading and link extraction from article Markdown.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::link::{LinkContext, LinkKind, classify};
use crate::slug::{AnchorIds, slugify};

/// Heading found in an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level, 1 to 6.
    pub level: u8,
    /// Plain heading text.
    pub text: String,
    /// Slug of the text, shared by headings with the same text.
    pub slug: String,
    /// Unique anchor id within the article.
    pub anchor: String,
    /// 1-based line number in the source file.
    pub line: usize,
}

/// Link or image found in an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target as written.
    pub target: String,
    /// Plain link text.
    pub text: String,
    /// 1-based line number in the source file.
    pub line: usize,
    /// Classified target.
    pub kind: LinkKind,
}

/// Headings and links of one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Headings in document order.
    pub headings: Vec<Heading>,
    /// Links in document order.
    pub links: Vec<Link>,
}

impl Analysis {
    /// Text of the first level-1 heading.
    #[must_use]
    pub fn first_h1(&self) -> Option<&str> {
        self.headings
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.as_str())
    }
}

/// Parser options used for analysis and rendering.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Extract headings and links from an article body.
///
/// `line_offset` is the number of file lines before the body, so reported
/// line numbers are relative to the file. Relative links are resolved
/// against `article_dir`.
#[must_use]
pub fn analyse(
    body: &str,
    line_offset: usize,
    article_dir: &str,
    ctx: &LinkContext<'_>,
) -> Analysis {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(body.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let line_at = |offset: usize| line_starts.partition_point(|&s| s <= offset) + line_offset;

    let mut analysis = Analysis::default();
    let mut anchors = AnchorIds::default();
    let mut heading: Option<(u8, usize, String)> = None;
    let mut links: Vec<(String, usize, String)> = Vec::new();

    for (event, range) in Parser::new_ext(body, parser_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((heading_level_to_num(level), range.start, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, start, text)) = heading.take() {
                    let text = text.trim().to_owned();
                    let slug = slugify(&text);
                    let anchor = anchors.next(&slug);
                    analysis.headings.push(Heading {
                        level,
                        text,
                        slug,
                        anchor,
                        line: line_at(start),
                    });
                }
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                links.push((dest_url.into_string(), range.start, String::new()));
            }
            Event::End(TagEnd::Link) => {
                if let Some((target, start, text)) = links.pop() {
                    let kind = classify(&target, article_dir, ctx);
                    analysis.links.push(Link {
                        target,
                        text,
                        line: line_at(start),
                        kind,
                    });
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                analysis.links.push(Link {
                    target: dest_url.into_string(),
                    text: String::new(),
                    line: line_at(range.start),
                    kind: LinkKind::Other,
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buf)) = heading.as_mut() {
                    buf.push_str(&text);
                }
                for (_, _, buf) in &mut links {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                for (_, _, buf) in &mut links {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }

    analysis
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
