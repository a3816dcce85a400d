//! Asset reference extraction from rendered HTML.
//!
//! Discovery order is deterministic regardless of where the elements sit in
//! the markup: all `<link rel="stylesheet">` hrefs, then all `<script src>`
//! values, then all `<img src>` values. Relative references are resolved
//! against the final page URL. Duplicate URLs are kept; the same reference
//! appearing twice is fetched twice.

use scraper::{Html, Selector};
use url::Url;

/// Selector/attribute pairs in discovery order.
const ASSET_SELECTORS: [(&str, &str); 3] = [
    (r#"link[rel="stylesheet"]"#, "href"),
    ("script[src]", "src"),
    ("img[src]", "src"),
];

/// Extract asset URLs from `html`, resolved to absolute form against
/// `base_url`. Elements whose relevant attribute is empty or absent are
/// skipped, as are references that do not resolve to http(s).
pub fn extract_asset_urls(html: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(html);
    let mut urls = Vec::new();

    for (selector, attr) in ASSET_SELECTORS {
        let sel = match Selector::parse(selector) {
            Ok(sel) => sel,
            Err(_) => continue,
        };
        for element in document.select(&sel) {
            let Some(raw) = element.value().attr(attr) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            if let Ok(resolved) = base.join(raw) {
                if matches!(resolved.scheme(), "http" | "https") {
                    urls.push(resolved.to_string());
                }
            }
        }
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_order_is_stylesheets_scripts_images() {
        // Markup order is image, script, stylesheet; discovery order is not.
        let html = r#"
        <html><head></head><body>
        <img src="/logo.png" />
        <script src="/app.js"></script>
        <link rel="stylesheet" href="/app.css" />
        </body></html>
        "#;
        let urls = extract_asset_urls(html, "https://example.com/");
        assert_eq!(
            urls,
            vec![
                "https://example.com/app.css",
                "https://example.com/app.js",
                "https://example.com/logo.png",
            ]
        );
    }

    #[test]
    fn relative_references_resolve_against_the_page_url() {
        let html = r#"<img src="images/photo.jpg" />"#;
        let urls = extract_asset_urls(html, "https://example.com/blog/post");
        assert_eq!(urls, vec!["https://example.com/blog/images/photo.jpg"]);
    }

    #[test]
    fn empty_and_missing_attributes_are_skipped() {
        let html = r#"
        <link rel="stylesheet" href="" />
        <link rel="stylesheet" />
        <script src="  "></script>
        <img src="/ok.png" />
        "#;
        let urls = extract_asset_urls(html, "https://example.com/");
        assert_eq!(urls, vec!["https://example.com/ok.png"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let html = r#"
        <script src="/app.js"></script>
        <script src="/app.js"></script>
        "#;
        let urls = extract_asset_urls(html, "https://example.com/");
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0], urls[1]);
    }

    #[test]
    fn non_http_schemes_are_dropped() {
        let html = r#"<img src="data:image/png;base64,AAAA" />"#;
        let urls = extract_asset_urls(html, "https://example.com/");
        assert!(urls.is_empty());
    }

    #[test]
    fn non_stylesheet_links_are_ignored() {
        let html = r#"
        <link rel="icon" href="/favicon.ico" />
        <link rel="stylesheet" href="/app.css" />
        "#;
        let urls = extract_asset_urls(html, "https://example.com/");
        assert_eq!(urls, vec!["https://example.com/app.css"]);
    }

    #[test]
    fn unparseable_base_url_yields_nothing() {
        let html = r#"<img src="/logo.png" />"#;
        assert!(extract_asset_urls(html, "not a url").is_empty());
    }
}
