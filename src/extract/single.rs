//! Single-comic layout: one primary button plus host buttons found by title marker.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html};

use crate::model::{ComicLink, HostKind};

use super::selectors::SiteSelectors;
use super::{anchor_href, element_text};

/// Builds the page's only record.
///
/// The title is the first heading. Each titled anchor contributes at most one
/// host (first marker in [`HostKind`] order), and the first anchor found for
/// a host keeps the slot.
pub(super) fn extract(document: &Html, primary: ElementRef<'_>, page_url: &str) -> Option<ComicLink> {
    let selectors = SiteSelectors::get();
    let title = document
        .select(&selectors.heading)
        .next()
        .map(element_text)
        .unwrap_or_default();

    let mut links = BTreeMap::new();
    if let Some(main) = anchor_href(primary, page_url) {
        links.insert(HostKind::Main, main);
    }

    for anchor in document.select(&selectors.titled_anchor) {
        if anchor == primary {
            continue;
        }
        let Some(kind) = anchor
            .value()
            .attr("title")
            .and_then(classify_title_marker)
        else {
            continue;
        };
        if links.contains_key(&kind) {
            continue;
        }
        if let Some(href) = anchor_href(anchor, page_url) {
            links.insert(kind, href);
        }
    }

    ComicLink::new(title, page_url, links)
}

fn classify_title_marker(title: &str) -> Option<HostKind> {
    let lowered = title.to_lowercase();
    HostKind::ALL.into_iter().find(|kind| {
        kind.title_marker()
            .is_some_and(|marker| lowered.contains(marker))
    })
}
