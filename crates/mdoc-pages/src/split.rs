//! Article bundle splitting.

/// One article cut out of a bundle file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleText {
    /// Article Markdown, delimiter lines excluded.
    pub body: String,
    /// Number of file lines before the article's first line.
    pub line_offset: usize,
}

/// Split `text` into articles at lines equal to `delimiter` (after trimming).
///
/// Delimiters inside fenced code blocks are ignored. Whitespace-only
/// articles are dropped.
#[must_use]
pub fn split_articles(text: &str, delimiter: &str) -> Vec<ArticleText> {
    let delimiter = delimiter.trim();
    let mut articles = Vec::new();
    let mut current = String::new();
    let mut current_offset = 0;
    let mut fence: Option<&str> = None;

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let trimmed = line.trim();

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
        } else if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        } else if trimmed == delimiter {
            push_article(&mut articles, std::mem::take(&mut current), current_offset);
            current_offset = idx + 1;
            continue;
        }

        current.push_str(line);
    }
    push_article(&mut articles, current, current_offset);

    articles
}

fn push_article(articles: &mut Vec<ArticleText>, body: String, line_offset: usize) {
    if !body.trim().is_empty() {
        articles.push(ArticleText { body, line_offset });
    }
}
