//! List layout: list items, each a leading title and a cluster of labeled anchors.

use std::collections::BTreeMap;

use scraper::Html;

use crate::model::{ComicLink, HostKind};

use super::selectors::SiteSelectors;
use super::{anchor_href, element_text};

/// Builds one record per list item that has at least one recognized anchor.
///
/// Anchors are classified by their visible label; a later anchor for the
/// same host replaces an earlier one.
pub(super) fn extract(document: &Html, page_url: &str) -> Vec<ComicLink> {
    let selectors = SiteSelectors::get();
    document
        .select(&selectors.list_item)
        .filter_map(|item| {
            let title = item
                .children()
                .filter_map(|node| node.value().as_text())
                .map(|text| &**text)
                .collect::<String>()
                .trim()
                .to_string();

            let mut links = BTreeMap::new();
            for anchor in item.select(&selectors.anchor) {
                let Some(kind) = HostKind::classify_label(&element_text(anchor)) else {
                    continue;
                };
                if let Some(href) = anchor_href(anchor, page_url) {
                    links.insert(kind, href);
                }
            }
            ComicLink::new(title, page_url, links)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::extract::extract_links;
    use crate::model::HostKind;

    const PAGE_URL: &str = "https://site.example/other-comics/the-walking-dead-extras/";

    #[test]
    fn test_list_layout_classifies_labels() {
        let html = r#"<section class="post-contents"><ul>
            <li>The Walking Dead Vol. 1 : <a href="https://site.example/links/a1">Main Server</a> |
                <a href="https://site.example/links/a2">Mirror</a> |
                <a href="https://mega.nz/file/a3">MEGA</a></li>
            <li>The Walking Dead Vol. 2 : <a href="https://site.example/links/b1">Link 1</a> |
                <a href="https://site.example/links/b2">LINK 2</a> |
                <a href="https://userscloud.com/b3">Users Cloud</a></li>
        </ul></section>"#;
        let records = extract_links(html, PAGE_URL);
        assert_eq!(records.len(), 2);

        assert!(records[0].title.starts_with("The Walking Dead Vol. 1 :"));
        assert!(!records[0].title.contains("Main Server"), "anchor text is not title");
        assert_eq!(records[0].link(HostKind::Main), Some("https://site.example/links/a1"));
        assert_eq!(records[0].link(HostKind::Mirror), Some("https://site.example/links/a2"));
        assert_eq!(records[0].link(HostKind::Mega), Some("https://mega.nz/file/a3"));

        assert_eq!(records[1].link(HostKind::Main), Some("https://site.example/links/b1"));
        assert_eq!(records[1].link(HostKind::Mirror), Some("https://site.example/links/b2"));
        assert_eq!(records[1].link(HostKind::Userscloud), Some("https://userscloud.com/b3"));
    }

    #[test]
    fn test_list_item_with_only_info_link_is_dropped() {
        let html = r#"<section class="post-contents"><ul>
            <li>Reading order <a href="https://site.example/info">Info</a></li>
            <li>Issue 3 <a href="https://www.mediafire.com/file/c">Mediafire</a></li>
        </ul></section>"#;
        let records = extract_links(html, PAGE_URL);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Issue 3");
    }

    #[test]
    fn test_list_items_outside_post_contents_are_ignored() {
        let html = r#"<ul><li>Sidebar <a href="https://mega.nz/file/x">Mega</a></li></ul>"#;
        assert!(extract_links(html, PAGE_URL).is_empty());
    }

    #[test]
    fn test_list_item_without_text_keeps_empty_title() {
        let html = r#"<section class="post-contents"><ul>
            <li><a href="https://mega.nz/file/x">Mega</a></li>
        </ul></section>"#;
        let records = extract_links(html, PAGE_URL);
        assert_eq!(records[0].title, "");
    }
}
