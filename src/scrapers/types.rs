use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.property24.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Where to search: suburb plus the city and region it sits in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTarget {
    /// Suburb name, e.g. "kenilworth" or "Sea Point"
    pub location: String,
    pub city: String,
    /// Province or state
    pub region: String,
}

impl SearchTarget {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

impl Default for SearchTarget {
    fn default() -> Self {
        Self {
            location: "kenilworth".to_string(),
            city: "cape-town".to_string(),
            region: "western-cape".to_string(),
        }
    }
}

/// Paging policy for one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    /// Search-result pages only, summary fields from each tile
    Fast { max_pages: usize },
    /// Visit every listing page found on the first result page
    Detailed { max_listings: usize },
}

impl CrawlMode {
    pub fn describe(&self) -> &'static str {
        match self {
            CrawlMode::Fast { .. } => "fast (search pages only)",
            CrawlMode::Detailed { .. } => "detailed (visits every listing)",
        }
    }
}

/// Timing and site settings for the crawler
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: String,

    pub user_agent: String,

    /// Pause after network idle so client-side rendering can finish
    pub settle_delay: Duration,

    /// Pause after scrolling to the middle of the page
    pub mid_scroll_delay: Duration,

    /// Pause after scrolling to the bottom of the page
    pub bottom_scroll_delay: Duration,

    /// Pause after loading an individual listing page
    pub detail_settle_delay: Duration,

    /// Politeness delay between result pages
    pub page_delay: Duration,

    /// Politeness delay between listing pages in detailed mode
    pub listing_delay: Duration,

    pub navigation_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            settle_delay: Duration::from_secs(3),
            mid_scroll_delay: Duration::from_secs(1),
            bottom_scroll_delay: Duration::from_secs(2),
            detail_settle_delay: Duration::from_secs(2),
            page_delay: Duration::from_secs(1),
            listing_delay: Duration::from_millis(500),
            navigation_timeout: Duration::from_secs(30),
        }
    }
}

impl CrawlConfig {
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::default()
    }
}

/// Builder for CrawlConfig
#[derive(Debug, Default)]
pub struct CrawlConfigBuilder {
    config: CrawlConfig,
}

impl CrawlConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout = timeout;
        self
    }

    /// Zero every wait. Only sensible against local or canned pages.
    pub fn without_delays(mut self) -> Self {
        self.config.settle_delay = Duration::ZERO;
        self.config.mid_scroll_delay = Duration::ZERO;
        self.config.bottom_scroll_delay = Duration::ZERO;
        self.config.detail_settle_delay = Duration::ZERO;
        self.config.page_delay = Duration::ZERO;
        self.config.listing_delay = Duration::ZERO;
        self
    }

    pub fn build(self) -> CrawlConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_base_url_and_zeroes_delays() {
        let config = CrawlConfig::builder()
            .base_url("http://localhost:8080/")
            .without_delays()
            .build();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.listing_delay, Duration::ZERO);
        assert_eq!(config.navigation_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_search_target_defaults_to_cape_town() {
        let target = SearchTarget::new("claremont");
        assert_eq!(target.location, "claremont");
        assert_eq!(target.city, "cape-town");
        assert_eq!(target.region, "western-cape");
    }
}
