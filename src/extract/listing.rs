//! Listing and roundup page parsing.

use scraper::Html;

use super::anchor_href;
use super::selectors::SiteSelectors;

/// What one listing page offers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Content-page URLs in page order.
    pub content_urls: Vec<String>,
    /// True when the "older posts" control is present with text.
    pub has_next: bool,
}

/// Parses a listing page into its content-page URLs and next-page signal.
#[must_use]
pub fn parse_listing_page(html: &str, page_url: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let selectors = SiteSelectors::get();
    let content_urls = document
        .select(&selectors.listing_entry)
        .filter_map(|anchor| anchor_href(anchor, page_url))
        .collect();
    let has_next = document
        .select(&selectors.pagination_older)
        .any(|control| control.text().any(|text| !text.trim().is_empty()));
    ListingPage {
        content_urls,
        has_next,
    }
}

/// Parses a weekly roundup page into the content-page URLs it links to.
#[must_use]
pub fn parse_roundup_page(html: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&SiteSelectors::get().roundup_entry)
        .filter_map(|anchor| anchor_href(anchor, page_url))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_page_collects_entries_and_next() {
        let html = r#"<html><body>
            <article><h1 class="post-title"><a href="https://site.example/dc/a-1/">A #1</a></h1></article>
            <article><h1 class="post-title"><a href="/marvel/b-2/">B #2</a></h1></article>
            <a class="pagination-older" href="/page/2">Older Comics</a>
        </body></html>"#;
        let page = parse_listing_page(html, "https://site.example/page/1");
        assert_eq!(
            page.content_urls,
            ["https://site.example/dc/a-1/", "https://site.example/marvel/b-2/"]
        );
        assert!(page.has_next);
    }

    #[test]
    fn test_parse_listing_page_empty_older_control_means_last_page() {
        let html = r#"<h1 class="post-title"><a href="https://site.example/x/">X</a></h1>
            <a class="pagination-older" href="/page/9">  </a>"#;
        let page = parse_listing_page(html, "https://site.example/page/8");
        assert!(!page.has_next);
        assert_eq!(page.content_urls.len(), 1);
    }

    #[test]
    fn test_parse_roundup_page_uses_outbound_anchors() {
        let html = r#"<p>
            <a rel="noopener noreferrer" href="https://site.example/dc/c-3/">C</a>
            <a href="https://site.example/not-included/">skip</a>
            <a rel="noopener noreferrer" href="https://site.example/dc/d-4/">D</a>
        </p>"#;
        let urls = parse_roundup_page(html, "https://site.example/weekly/week-12/");
        assert_eq!(urls, ["https://site.example/dc/c-3/", "https://site.example/dc/d-4/"]);
    }
}
