//! Precompiled CSS selectors for the aggregator's page layouts.

use std::sync::OnceLock;

use scraper::Selector;

/// Class carried by every button group on multi-primary pages.
pub(crate) const BUTTON_GROUP_CLASS: &str = "aio-button-center";

/// Site selector set.
pub(crate) struct SiteSelectors {
    /// The primary "Download Now" anchor.
    pub primary: Selector,
    /// Headings; the first one titles a single-comic page.
    pub heading: Selector,
    /// Anchors carrying a `title` attribute.
    pub titled_anchor: Selector,
    /// Any anchor.
    pub anchor: Selector,
    /// Bold text inside the paragraph above a button group.
    pub strong: Selector,
    /// List items of list-layout pages.
    pub list_item: Selector,
    /// Content-page anchors on a listing page.
    pub listing_entry: Selector,
    /// The "older posts" pagination control.
    pub pagination_older: Selector,
    /// Outbound anchors on a weekly roundup page.
    pub roundup_entry: Selector,
}

static SELECTORS: OnceLock<SiteSelectors> = OnceLock::new();

/// Compiles a selector at static init; panics on invalid pattern.
pub(crate) fn compile_static_selector(pattern: &str) -> Selector {
    Selector::parse(pattern).unwrap_or_else(|e| panic!("invalid static selector '{pattern}': {e}"))
}

impl SiteSelectors {
    /// Returns the process-wide selector set.
    pub(crate) fn get() -> &'static SiteSelectors {
        SELECTORS.get_or_init(|| SiteSelectors {
            primary: compile_static_selector(r#"a[title="Download Now"]"#),
            heading: compile_static_selector("h1"),
            titled_anchor: compile_static_selector("a[title]"),
            anchor: compile_static_selector("a"),
            strong: compile_static_selector("strong"),
            list_item: compile_static_selector("section.post-contents li"),
            listing_entry: compile_static_selector("h1.post-title a"),
            pagination_older: compile_static_selector("a.pagination-older"),
            roundup_entry: compile_static_selector(r#"a[rel="noopener noreferrer"]"#),
        })
    }
}
