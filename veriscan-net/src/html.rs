//! HTML content extraction
//!
//! Pulls the parts collectors care about out of a fetched page:
//! title, meta description, visible text, and resolved links.

use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracted parts of one HTML page
#[derive(Debug, Clone)]
pub struct PageContent {
    /// Page title (if found)
    pub title: Option<String>,
    /// og:site_name, usually the cleanest company-name source
    pub site_name: Option<String>,
    /// Meta description, falling back to og:description
    pub description: Option<String>,
    /// Visible text, whitespace-normalized
    pub text: String,
    /// Absolute http(s) links, deduplicated in document order
    pub links: Vec<String>,
}

/// Extract title, description, text, and links from HTML.
///
/// Relative links are resolved against `base_url`; non-http(s) schemes
/// are dropped. Parsing never fails, a malformed document just yields
/// emptier content.
pub fn extract_content(html: &str, base_url: &str) -> PageContent {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title").unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let site_name = meta_content(&document, r#"meta[property="og:site_name"]"#);
    let description = meta_content(&document, r#"meta[name="description"]"#)
        .or_else(|| meta_content(&document, r#"meta[property="og:description"]"#));

    PageContent {
        title,
        site_name,
        description,
        text: extract_text(&document),
        links: extract_links(&document, base_url),
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Extract visible text, skipping script/style/noscript subtrees
fn extract_text(document: &Html) -> String {
    use scraper::node::Node;

    let body_selector = Selector::parse("body").unwrap();
    let body = match document.select(&body_selector).next() {
        Some(b) => b,
        None => return String::new(),
    };

    let mut text_parts = Vec::new();

    for node_ref in body.descendants() {
        if let Node::Text(text_node) = node_ref.value() {
            let in_excluded = node_ref.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|el| matches!(el.name(), "script" | "style" | "noscript"))
                    .unwrap_or(false)
            });

            if !in_excluded {
                let trimmed = text_node.trim();
                if !trimmed.is_empty() {
                    text_parts.push(trimmed.to_string());
                }
            }
        }
    }

    normalize_whitespace(&text_parts.join(" "))
}

fn extract_links(document: &Html, base_url: &str) -> Vec<String> {
    let base = Url::parse(base_url).ok();
    let link_selector = Selector::parse("a").unwrap();

    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&link_selector) {
        let href = match element.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };

        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        let resolved = match Url::parse(href) {
            Ok(url) => Some(url),
            Err(_) => base.as_ref().and_then(|b| b.join(href).ok()),
        };

        let mut url = match resolved {
            Some(u) => u,
            None => continue,
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            continue;
        }
        url.set_fragment(None);

        let link = url.to_string();
        if seen.insert(link.clone()) {
            links.push(link);
        }
    }

    links
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let html = r#"
            <html>
            <head>
                <title>Acme Corp</title>
                <meta name="description" content="Industrial widgets since 1990">
            </head>
            <body>
                <script>var x = 1;</script>
                <h1>Hello World</h1>
                <p>This is test content.</p>
                <style>.x { color: red; }</style>
            </body>
            </html>
        "#;

        let content = extract_content(html, "https://acme.example.com");

        assert_eq!(content.title, Some("Acme Corp".to_string()));
        assert!(content.site_name.is_none());
        assert_eq!(
            content.description,
            Some("Industrial widgets since 1990".to_string())
        );
        assert!(content.text.contains("Hello World"));
        assert!(content.text.contains("test content"));
        assert!(!content.text.contains("var x"));
        assert!(!content.text.contains("color: red"));
    }

    #[test]
    fn test_og_description_fallback() {
        let html = r#"
            <html>
            <head><meta property="og:description" content="Fallback text"></head>
            <body></body>
            </html>
        "#;

        let content = extract_content(html, "https://example.com");
        assert_eq!(content.description, Some("Fallback text".to_string()));
    }

    #[test]
    fn test_site_name() {
        let html = r#"
            <html>
            <head><meta property="og:site_name" content="Acme Corp"></head>
            <body></body>
            </html>
        "#;

        let content = extract_content(html, "https://example.com");
        assert_eq!(content.site_name, Some("Acme Corp".to_string()));
    }

    #[test]
    fn test_extract_links() {
        let html = r##"
            <html>
            <body>
                <a href="/about">About</a>
                <a href="https://linkedin.com/company/acme">LinkedIn</a>
                <a href="mailto:info@acme.com">Email</a>
                <a href="#section">Anchor</a>
                <a href="/about">About again</a>
            </body>
            </html>
        "##;

        let content = extract_content(html, "https://acme.example.com");

        assert_eq!(
            content.links,
            vec![
                "https://acme.example.com/about".to_string(),
                "https://linkedin.com/company/acme".to_string(),
            ]
        );
    }

    #[test]
    fn test_normalize_whitespace() {
        let input = "  hello   world  \n\t  test  ";
        let output = normalize_whitespace(input);
        assert_eq!(output, "hello world test");
    }
}
