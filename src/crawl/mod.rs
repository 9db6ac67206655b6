//! Discovery of content pages.
//!
//! [`IndexWalker`] walks paginated listing pages lazily, one page per
//! [`IndexWalker::next_batch`] call, expanding weekly roundup pages into
//! the content pages they link to. [`validate_single_url`] covers the
//! single-URL mode that bypasses pagination.

mod error;
mod validate;

pub use error::CrawlError;
pub use validate::{ensure_scheme, same_site, validate_single_url};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::extract::{parse_listing_page, parse_roundup_page};
use crate::fetch::PageFetcher;
use crate::options::RunOptions;

/// URL substring marking a weekly roundup page.
const ROUNDUP_MARKER: &str = "week";

/// Returns true if `url` is a weekly roundup page.
#[must_use]
pub fn is_roundup(url: &str) -> bool {
    url.contains(ROUNDUP_MARKER)
}

/// Listing root: `{base}`, `{base}/tag/{tag}`, or `{base}/cat/{category}`.
///
/// A tag takes precedence over a category.
#[must_use]
pub fn listing_root(options: &RunOptions) -> String {
    let base = options.base_url();
    if let Some(tag) = options.tag.as_deref().filter(|t| !t.is_empty()) {
        format!("{base}/tag/{tag}")
    } else if let Some(category) = options.category.as_deref().filter(|c| !c.is_empty()) {
        format!("{base}/cat/{category}")
    } else {
        base.to_string()
    }
}

/// Builds the listing URL for `page`. Page 0 omits the `/page/N` segment.
#[must_use]
pub fn index_url(root: &str, page: u32, query: Option<&str>) -> String {
    let query = query
        .filter(|q| !q.is_empty())
        .map(|q| format!("?s={}", urlencoding::encode(q)))
        .unwrap_or_default();
    if page == 0 {
        format!("{root}{query}")
    } else {
        format!("{root}/page/{page}{query}")
    }
}

/// Lazy walker over paginated listing pages.
///
/// Position is local state: a walker cannot be resumed once dropped.
pub struct IndexWalker {
    fetcher: Arc<dyn PageFetcher>,
    root: String,
    query: Option<String>,
    start: u32,
    pages: u32,
    ceiling: u32,
    current: u32,
    visited: u32,
    has_next: bool,
}

impl IndexWalker {
    /// Creates a walker positioned at `options.start`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: &RunOptions) -> Self {
        Self {
            fetcher,
            root: listing_root(options),
            query: options.query.clone(),
            start: options.start,
            pages: options.pages,
            ceiling: options.max_index_pages,
            current: options.start,
            visited: 0,
            has_next: true,
        }
    }

    /// Number of listing pages loaded so far.
    #[must_use]
    pub fn visited_pages(&self) -> u32 {
        self.visited
    }

    fn within_bound(&self) -> bool {
        if self.pages == 0 {
            return true;
        }
        let last = u64::from(self.start) + u64::from(self.pages) - 1;
        u64::from(self.current) <= last
    }

    /// Loads the next listing page and returns its content-page URLs, with
    /// roundup pages expanded in place. `Ok(None)` ends the walk.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::StartPage`] when the very first listing page
    /// cannot be loaded. Later listing failures end the walk with a warning.
    #[instrument(skip(self), fields(page = self.current))]
    pub async fn next_batch(&mut self) -> Result<Option<Vec<String>>, CrawlError> {
        if !self.has_next || !self.within_bound() {
            return Ok(None);
        }
        if self.pages == 0 && self.visited >= self.ceiling {
            warn!(
                ceiling = self.ceiling,
                "listing page ceiling reached; stopping unbounded walk"
            );
            return Ok(None);
        }

        let url = index_url(&self.root, self.current, self.query.as_deref());
        info!(url = %url, "parsing listing page");
        let html = match self.fetcher.fetch_html(&url).await {
            Ok(html) => html,
            Err(error) if self.visited == 0 => return Err(CrawlError::start_page(&url, error)),
            Err(error) => {
                warn!(url = %url, error = %error, "listing page failed; stopping walk");
                self.has_next = false;
                return Ok(None);
            }
        };

        let listing = parse_listing_page(&html, &url);
        self.visited += 1;
        self.current = self.current.saturating_add(1);
        self.has_next = listing.has_next;
        if !listing.has_next {
            info!("no more listing pages");
        }

        let mut content_urls = Vec::with_capacity(listing.content_urls.len());
        for entry in listing.content_urls {
            if is_roundup(&entry) {
                content_urls.extend(self.expand_roundup(&entry).await);
            } else {
                content_urls.push(entry);
            }
        }
        debug!(count = content_urls.len(), "content pages discovered");
        Ok(Some(content_urls))
    }

    async fn expand_roundup(&self, url: &str) -> Vec<String> {
        info!(url = %url, "parsing weekly roundup page");
        match self.fetcher.fetch_html(url).await {
            Ok(html) => parse_roundup_page(&html, url),
            Err(error) => {
                warn!(url = %url, error = %error, "roundup page failed; skipping");
                Vec::new()
            }
        }
    }

    /// Drains the walk into one list of content-page URLs.
    ///
    /// # Errors
    ///
    /// Propagates [`CrawlError::StartPage`] from the first page.
    pub async fn collect_all(&mut self) -> Result<Vec<String>, CrawlError> {
        let mut all = Vec::new();
        while let Some(batch) = self.next_batch().await? {
            all.extend(batch);
        }
        Ok(all)
    }
}

impl std::fmt::Debug for IndexWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWalker")
            .field("fetcher", &self.fetcher.name())
            .field("root", &self.root)
            .field("current", &self.current)
            .field("visited", &self.visited)
            .field("has_next", &self.has_next)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fetch::HttpPageFetcher;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing(entries: &[&str], has_next: bool) -> String {
        let mut html = String::from("<html><body>");
        for entry in entries {
            html.push_str(&format!(r#"<h1 class="post-title"><a href="{entry}">x</a></h1>"#));
        }
        if has_next {
            html.push_str(r##"<a class="pagination-older" href="#">Older</a>"##);
        }
        html.push_str("</body></html>");
        html
    }

    fn options_for(server: &MockServer) -> RunOptions {
        RunOptions {
            base_url: server.uri(),
            ..RunOptions::default()
        }
    }

    fn walker(options: &RunOptions) -> IndexWalker {
        IndexWalker::new(Arc::new(HttpPageFetcher::new(reqwest::Client::new())), options)
    }

    #[test]
    fn test_index_url_shapes() {
        assert_eq!(index_url("https://s.example", 1, None), "https://s.example/page/1");
        assert_eq!(index_url("https://s.example", 0, None), "https://s.example");
        assert_eq!(
            index_url("https://s.example/tag/superman", 3, Some("Donald Duck")),
            "https://s.example/tag/superman/page/3?s=Donald%20Duck"
        );
        assert_eq!(index_url("https://s.example", 0, Some("x")), "https://s.example?s=x");
    }

    #[test]
    fn test_listing_root_tag_wins_over_category() {
        let options = RunOptions {
            base_url: "https://s.example/".to_string(),
            tag: Some("the-walking-dead".to_string()),
            category: Some("marvel".to_string()),
            ..RunOptions::default()
        };
        assert_eq!(listing_root(&options), "https://s.example/tag/the-walking-dead");
        let options = RunOptions {
            tag: None,
            ..options
        };
        assert_eq!(listing_root(&options), "https://s.example/cat/marvel");
    }

    #[test]
    fn test_is_roundup() {
        assert!(is_roundup("https://s.example/weekly-pack/2022-week-12/"));
        assert!(!is_roundup("https://s.example/dc/batman-1/"));
    }

    #[tokio::test]
    async fn test_walker_honors_page_bound_despite_next_signal() {
        let server = MockServer::start().await;
        for page in 1..=2 {
            Mock::given(method("GET"))
                .and(path(format!("/page/{page}")))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(listing(&[format!("/dc/p{page}/").as_str()], true)),
                )
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/page/3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[], true)))
            .expect(0)
            .mount(&server)
            .await;

        let options = RunOptions {
            pages: 2,
            start: 1,
            ..options_for(&server)
        };
        let mut walker = walker(&options);
        let urls = walker.collect_all().await.unwrap();
        assert_eq!(walker.visited_pages(), 2);
        assert_eq!(
            urls,
            [format!("{}/dc/p1/", server.uri()), format!("{}/dc/p2/", server.uri())]
        );
    }

    #[tokio::test]
    async fn test_walker_unbounded_stops_without_next_signal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(&["/a/"], true)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(&["/b/"], false)))
            .mount(&server)
            .await;

        let options = RunOptions {
            pages: 0,
            ..options_for(&server)
        };
        let mut walker = walker(&options);
        let urls = walker.collect_all().await.unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(walker.visited_pages(), 2);
    }

    #[tokio::test]
    async fn test_walker_unbounded_respects_ceiling() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(&["/a/"], true)))
            .mount(&server)
            .await;

        let options = RunOptions {
            pages: 0,
            max_index_pages: 3,
            ..options_for(&server)
        };
        let mut walker = walker(&options);
        let urls = walker.collect_all().await.unwrap();
        assert_eq!(walker.visited_pages(), 3);
        assert_eq!(urls.len(), 3);
    }

    #[tokio::test]
    async fn test_walker_expands_roundups() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(listing(&["/dc/solo/", "/packs/2022-week-3/"], false)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/packs/2022-week-3/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a rel="noopener noreferrer" href="/dc/r1/">1</a>
                   <a rel="noopener noreferrer" href="/dc/r2/">2</a>"#,
            ))
            .mount(&server)
            .await;

        let mut walker = walker(&options_for(&server));
        let urls = walker.collect_all().await.unwrap();
        let base = server.uri();
        assert_eq!(
            urls,
            [
                format!("{base}/dc/solo/"),
                format!("{base}/dc/r1/"),
                format!("{base}/dc/r2/")
            ]
        );
    }

    #[tokio::test]
    async fn test_walker_search_query_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/1"))
            .and(query_param("s", "Donald Duck"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(&["/dd/"], false)))
            .expect(1)
            .mount(&server)
            .await;

        let options = RunOptions {
            query: Some("Donald Duck".to_string()),
            ..options_for(&server)
        };
        let urls = walker(&options).collect_all().await.unwrap();
        assert_eq!(urls.len(), 1);
    }

    #[tokio::test]
    async fn test_walker_first_page_failure_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = walker(&options_for(&server)).collect_all().await.unwrap_err();
        assert!(matches!(err, CrawlError::StartPage { .. }));
    }

    #[tokio::test]
    async fn test_walker_later_page_failure_stops_quietly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(&["/a/"], true)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page/2"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let options = RunOptions {
            pages: 0,
            ..options_for(&server)
        };
        let urls = walker(&options).collect_all().await.unwrap();
        assert_eq!(urls.len(), 1);
    }
}
