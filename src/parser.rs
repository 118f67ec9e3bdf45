use scraper::{Html, Selector};

/// Extract crawlable hyperlink URLs from HTML content.
///
/// Only absolute `http`/`https` URLs are returned; fragment-only anchors,
/// `javascript:`, `mailto:` and relative references are dropped. URLs are
/// case-preserved and duplicates are kept - deduplication is the
/// supervisor's job at assignment time.
///
/// # Examples
/// ```
/// use swarmcrawl::parser::extract_links;
///
/// let html = r##"<a href="http://a.example/x">x</a><a href="#frag">skip</a>"##;
/// let links = extract_links(html);
/// assert_eq!(links, vec!["http://a.example/x"]);
/// ```
pub fn extract_links(html_body: &str) -> Vec<String> {
    let document = Html::parse_document(html_body);
    let selector = Selector::parse("a[href]").expect("Invalid CSS selector");

    let mut links = Vec::new();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            let cleaned_href = href.trim();

            // Absolute http(s) only; this also drops javascript:, mailto:,
            // tel:, data: and anchor-style references.
            let lowered = cleaned_href.to_ascii_lowercase();
            if lowered.starts_with("http://") || lowered.starts_with("https://") {
                links.push(cleaned_href.to_string());
            }
        }
    }

    links
}
