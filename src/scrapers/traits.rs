use crate::scrapers::error::ScrapeResult;
use async_trait::async_trait;

/// A source of page sessions (one headless browser, one HTTP client, ...).
/// Any engine implementing this can back the crawler.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Open a fresh page. The crawler owns it for one crawl and closes it.
    async fn open_page(&self) -> ScrapeResult<Box<dyn PageSession>>;

    /// Get the name of the engine
    fn engine_name(&self) -> &'static str;
}

/// One mutable page in a browser: the capability set the crawler relies on.
///
/// DOM queries are not part of the trait. `content()` hands back the rendered
/// markup and the extractor queries that snapshot with `scraper`.
#[async_trait]
pub trait PageSession: Send {
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()>;

    async fn wait_for_network_idle(&mut self) -> ScrapeResult<()>;

    /// Scroll to a fraction of the document height (0.5 = middle, 1.0 = bottom)
    async fn scroll_to(&mut self, fraction: f64) -> ScrapeResult<()>;

    /// Rendered outer HTML of the current document
    async fn content(&mut self) -> ScrapeResult<String>;

    async fn close(&mut self) -> ScrapeResult<()>;
}
