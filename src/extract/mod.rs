//! Link extraction from content pages.
//!
//! A content page is handled by exactly one of three layout strategies,
//! chosen by counting primary "Download Now" anchors:
//!
//! - none (or one without an href): list layout, see [`list`]
//! - exactly one: single-comic layout, see [`single`]
//! - more than one: multi-primary layout, see [`multi`]
//!
//! Extraction is synchronous; the parsed document never crosses an await.

mod list;
mod listing;
mod multi;
pub(crate) mod selectors;
mod siblings;
mod single;

pub use listing::{ListingPage, parse_listing_page, parse_roundup_page};
pub use siblings::ButtonSiblings;

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::model::ComicLink;
use crate::resolver::utils::absolutize_url;

use selectors::SiteSelectors;

/// Page layout variant recognized on a content page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// One comic with one primary button and per-host title markers.
    Single,
    /// Several comics, each a primary button followed by host button groups.
    MultiPrimary,
    /// List items, each a title followed by labeled host anchors.
    List,
}

/// Extracts every comic record from a content page.
///
/// Records without at least one recognized link are never returned.
#[must_use]
pub fn extract_links(html: &str, page_url: &str) -> Vec<ComicLink> {
    let document = Html::parse_document(html);
    let selectors = SiteSelectors::get();
    let primaries: Vec<ElementRef<'_>> = document.select(&selectors.primary).collect();
    let layout = detect_layout(&primaries);
    debug!(page_url, ?layout, primaries = primaries.len(), "detected page layout");

    match layout {
        PageLayout::Single => single::extract(&document, primaries[0], page_url)
            .into_iter()
            .collect(),
        PageLayout::MultiPrimary => multi::extract(&primaries, page_url),
        PageLayout::List => list::extract(&document, page_url),
    }
}

fn detect_layout(primaries: &[ElementRef<'_>]) -> PageLayout {
    let first_has_href = primaries
        .first()
        .and_then(|anchor| anchor.value().attr("href"))
        .is_some_and(|href| !href.trim().is_empty());
    match primaries.len() {
        _ if !first_has_href => PageLayout::List,
        1 => PageLayout::Single,
        _ => PageLayout::MultiPrimary,
    }
}

/// Absolute href of `anchor`, resolved against the page it was found on.
pub(crate) fn anchor_href(anchor: ElementRef<'_>, page_url: &str) -> Option<String> {
    anchor
        .value()
        .attr("href")
        .and_then(|href| absolutize_url(href, page_url))
}

/// All descendant text of `element`, trimmed.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::HostKind;

    const PAGE_URL: &str = "https://site.example/other-comics/sample-2022/";

    #[test]
    fn test_single_layout_main_equals_primary_href() {
        let html = r#"<html><body>
            <h1>Sample #1 (2022)</h1>
            <a title="Download Now" href="https://site.example/links/abc">Download</a>
            <a title="MEDIAFIRE" href="https://www.mediafire.com/file/x/sample.cbr">MF</a>
        </body></html>"#;
        let records = extract_links(html, PAGE_URL);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].link(HostKind::Main),
            Some("https://site.example/links/abc")
        );
        assert_eq!(records[0].page_url, PAGE_URL);
    }

    #[test]
    fn test_no_primary_uses_list_layout() {
        let html = r#"<html><body><section class="post-contents"><ul>
            <li>Issue 5 <a href="https://mega.nz/file/x">Mega</a></li>
        </ul></section></body></html>"#;
        let records = extract_links(html, PAGE_URL);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Issue 5");
    }

    #[test]
    fn test_primary_without_href_falls_back_to_list_layout() {
        let html = r#"<html><body>
            <a title="Download Now">Download</a>
            <section class="post-contents"><ul>
                <li>Issue 6 <a href="https://mega.nz/file/y">MEGA</a></li>
            </ul></section>
        </body></html>"#;
        let records = extract_links(html, PAGE_URL);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].link(HostKind::Mega), Some("https://mega.nz/file/y"));
    }

    #[test]
    fn test_page_without_any_links_yields_nothing() {
        assert!(extract_links("<html><body><p>Nothing</p></body></html>", PAGE_URL).is_empty());
    }
}
