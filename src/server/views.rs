//! HTML views
//!
//! Small server-rendered pages. All interpolated text is escaped; the only
//! raw fragment is the paragraph highlight markup, which is re-admitted
//! after escaping.

use crate::config::Config;
use html_escape::encode_text;

/// A keyword or link search hit prepared for display
pub struct ResultRow {
    pub url: String,
    /// Pretty-printed URL shown as the link text
    pub title: String,
    pub about: String,
}

/// A paragraph search hit prepared for display
pub struct ParagraphRow {
    pub url: String,
    pub title: String,
    pub about: String,
    /// Matched paragraph with `<strong>` markers
    pub highlighted: String,
}

fn layout(config: &Config, title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} &mdash; {name}</title>
<link rel="stylesheet" href="/assets/style.css">
<link rel="stylesheet" href="/assets/theme.css">
</head>
<body>
<nav>
<a href="/">{name}</a>
<a href="/paragraph">paragraphs</a>
<a href="/outgoing">links</a>
<a href="/random">random</a>
<a href="/about">about</a>
</nav>
<main>
{content}
</main>
</body>
</html>
"#,
        title = encode_text(title),
        name = encode_text(&config.general.name),
        content = content
    )
}

fn search_form(config: &Config, action: &str, query: &str) -> String {
    format!(
        r#"<form method="get" action="{action}">
<input type="search" name="q" value="{query}" placeholder="{placeholder}">
<button type="submit">search</button>
</form>"#,
        action = action,
        query = encode_text(query),
        placeholder = encode_text(&config.general.placeholder),
    )
}

/// The landing page: tagline and search box
pub fn index_page(config: &Config) -> String {
    let content = format!(
        "<h1>{}</h1>\n<p>{}</p>\n{}",
        encode_text(&config.general.name),
        encode_text(&config.general.tagline),
        search_form(config, "/", "")
    );
    layout(config, "search", &content)
}

/// Keyword and link search results
pub fn search_page(config: &Config, title: &str, action: &str, query: &str, rows: &[ResultRow]) -> String {
    let mut content = format!("<h1>{}</h1>\n{}\n", encode_text(title), search_form(config, action, query));
    if rows.is_empty() {
        content.push_str("<p>no hits, sorry</p>\n");
    }
    content.push_str("<ul class=\"results\">\n");
    for row in rows {
        content.push_str(&format!(
            "<li><a href=\"{}\">{}</a>",
            encode_text(&row.url),
            encode_text(&row.title)
        ));
        if !row.about.is_empty() {
            content.push_str(&format!("<p>{}</p>", encode_text(&row.about)));
        }
        content.push_str("</li>\n");
    }
    content.push_str("</ul>\n");
    layout(config, title, &content)
}

/// Paragraph search results with highlighted matches
pub fn paragraph_page(config: &Config, query: &str, rows: &[ParagraphRow]) -> String {
    let title = "Paragraph Search Results";
    let mut content = format!(
        "<h1>{}</h1>\n{}\n",
        encode_text(title),
        search_form(config, "/paragraph", query)
    );
    if rows.is_empty() {
        content.push_str("<p>no hits, sorry</p>\n");
    }
    content.push_str("<ul class=\"results\">\n");
    for row in rows {
        content.push_str(&format!(
            "<li><a href=\"{}\">{}</a>",
            encode_text(&row.url),
            encode_text(&row.title)
        ));
        content.push_str(&format!("<p>{}</p>", highlight_safe(&row.highlighted)));
        if !row.about.is_empty() {
            content.push_str(&format!("<p class=\"about\">{}</p>", encode_text(&row.about)));
        }
        content.push_str("</li>\n");
    }
    content.push_str("</ul>\n");
    layout(config, title, &content)
}

/// A plain listing of titled links (the /filtered page)
pub fn list_page(config: &Config, title: &str, rows: &[ResultRow]) -> String {
    let mut content = format!("<h1>{}</h1>\n<ul>\n", encode_text(title));
    for row in rows {
        content.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            encode_text(&row.url),
            encode_text(&row.title)
        ));
    }
    content.push_str("</ul>\n");
    layout(config, title, &content)
}

/// Instance statistics
pub fn about_page(
    config: &Config,
    domain_count: u64,
    page_count: &str,
    term_count: &str,
    last_crawl: &str,
) -> String {
    let content = format!(
        "<h1>about {name}</h1>\n\
         <p>{name} is a neighbourhood search engine indexing <a href=\"{ring}\">the webring</a>.</p>\n\
         <ul>\n\
         <li>{domains} domains</li>\n\
         <li>{pages} pages</li>\n\
         <li>{terms} indexed terms</li>\n\
         <li>last crawl: {crawl}</li>\n\
         </ul>\n\
         <p><a href=\"/filtered\">filtered domains</a></p>\n",
        name = encode_text(&config.general.name),
        ring = encode_text(&config.general.url),
        domains = domain_count,
        pages = encode_text(page_count),
        terms = encode_text(term_count),
        crawl = encode_text(last_crawl),
    );
    layout(config, "about", &content)
}

/// Escapes a highlighted paragraph, then restores the highlight markers
fn highlight_safe(highlighted: &str) -> String {
    encode_text(highlighted)
        .replace("&lt;strong&gt;", "<strong>")
        .replace("&lt;/strong&gt;", "</strong>")
}

/// Humanizes a count for the about page: 1234567 shows as "1m"
pub fn humanize(n: u64) -> String {
    if n > 1_000_000 {
        format!("{}m", n / 1_000_000)
    } else if n > 1000 {
        format!("{}k", n / 1000)
    } else {
        format!("{}", n)
    }
}
