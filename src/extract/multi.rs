//! Multi-primary layout: several comics, each a primary button and its host buttons.

use std::collections::BTreeMap;

use scraper::ElementRef;

use crate::model::{ComicLink, HostKind};

use super::selectors::SiteSelectors;
use super::siblings::{ButtonSiblings, is_button_group, previous_meaningful_element};
use super::{anchor_href, element_text};

/// Builds one record per primary anchor.
pub(super) fn extract(primaries: &[ElementRef<'_>], page_url: &str) -> Vec<ComicLink> {
    primaries
        .iter()
        .filter_map(|primary| extract_one(*primary, page_url))
        .collect()
}

fn extract_one(primary: ElementRef<'_>, page_url: &str) -> Option<ComicLink> {
    let container = button_container(primary);
    let title = group_title(container);

    let mut links = BTreeMap::new();
    if let Some(main) = anchor_href(primary, page_url) {
        links.insert(HostKind::Main, main);
    }

    for group in ButtonSiblings::after(container) {
        let Some(anchor) = group.select(&SiteSelectors::get().anchor).next() else {
            continue;
        };
        let label = anchor
            .value()
            .attr("title")
            .filter(|title| !title.trim().is_empty())
            .map_or_else(|| element_text(anchor), str::to_string);
        match HostKind::classify_label(&label) {
            // The primary anchor owns the main slot.
            Some(HostKind::Main) | None => {}
            Some(kind) => {
                if let Some(href) = anchor_href(anchor, page_url) {
                    links.insert(kind, href);
                }
            }
        }
    }

    ComicLink::new(title, page_url, links)
}

/// The button group holding `primary`: its nearest button-group ancestor,
/// else its grandparent.
fn button_container(primary: ElementRef<'_>) -> ElementRef<'_> {
    primary
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| is_button_group(*ancestor))
        .or_else(|| {
            primary
                .ancestors()
                .filter_map(ElementRef::wrap)
                .nth(1)
        })
        .unwrap_or(primary)
}

/// Bold text of the paragraph directly above the button group.
fn group_title(container: ElementRef<'_>) -> String {
    previous_meaningful_element(container)
        .filter(|previous| previous.value().name() == "p")
        .and_then(|paragraph| paragraph.select(&SiteSelectors::get().strong).next())
        .map(element_text)
        .unwrap_or_default()
}
