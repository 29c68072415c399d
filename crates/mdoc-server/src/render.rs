//! HTML preview of an article.

use std::fmt::Write as _;

use mdoc_index::Breadcrumb;
use mdoc_pages::{Article, parser_options};
use pulldown_cmark::{CowStr, Event, Parser, Tag, html};

/// Render an article as a standalone HTML page.
///
/// Headings get the same anchor ids the link checker resolves against.
/// `url_for` maps a navigation path to its public URL.
pub(crate) fn render_page(
    article: &Article,
    breadcrumbs: &[Breadcrumb],
    url_for: impl Fn(&str) -> String,
) -> String {
    let mut anchors = article.headings.iter().map(|h| h.anchor.clone());
    let events = Parser::new_ext(&article.body, parser_options()).map(|event| match event {
        Event::Start(Tag::Heading {
            level,
            id: None,
            classes,
            attrs,
        }) => Event::Start(Tag::Heading {
            level,
            id: anchors.next().map(CowStr::from),
            classes,
            attrs,
        }),
        Event::Start(Tag::Heading { .. }) => {
            anchors.next();
            event
        }
        other => other,
    });
    let mut content = String::new();
    html::push_html(&mut content, events);

    let title = escape(&article.title);
    let mut out = String::with_capacity(content.len() + 512);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n"
    );
    if !breadcrumbs.is_empty() {
        out.push_str("<nav class=\"breadcrumbs\">");
        for (i, crumb) in breadcrumbs.iter().enumerate() {
            if i > 0 {
                out.push_str(" / ");
            }
            if crumb.path.is_empty() {
                out.push_str(&escape(&crumb.title));
            } else {
                let _ = write!(
                    out,
                    "<a href=\"{}\">{}</a>",
                    escape(&url_for(&crumb.path)),
                    escape(&crumb.title)
                );
            }
        }
        out.push_str("</nav>\n");
    }
    let _ = write!(out, "<main>\n{content}</main>\n</body>\n</html>\n");
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
