//! Suburb crawler: search URL construction, pagination and politeness.
//!
//! One page session per crawl. Everything runs sequentially on that session;
//! it is opened at the start of `crawl` and closed at the end whatever the
//! outcome.

mod area_codes;

pub use area_codes::area_code;

use crate::extract::{ListingExtractor, PageExtraction};
use crate::models::{ListingType, PropertyListing};
use crate::scrapers::error::ScrapeResult;
use crate::scrapers::traits::{BrowserEngine, PageSession};
use crate::scrapers::types::{CrawlConfig, CrawlMode, SearchTarget};
use std::collections::HashSet;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Lowercase, spaces to hyphens
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// `{base}/{to-rent|for-sale}/{location}/{city}/{region}[/{areaCode}][/p{page}]`
pub fn build_search_url(
    base_url: &str,
    target: &SearchTarget,
    listing_type: ListingType,
    page: usize,
) -> String {
    let location = slugify(&target.location);
    let mut url = format!(
        "{}/{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        listing_type.path_segment(),
        location,
        slugify(&target.city),
        slugify(&target.region),
    );

    if let Some(code) = area_code(&location) {
        url.push('/');
        url.push_str(code);
    }
    if page > 1 {
        url.push_str(&format!("/p{page}"));
    }
    url
}

pub struct SuburbCrawler {
    engine: Box<dyn BrowserEngine>,
    extractor: ListingExtractor,
    config: CrawlConfig,
}

impl SuburbCrawler {
    pub fn new(engine: Box<dyn BrowserEngine>, config: CrawlConfig) -> ScrapeResult<Self> {
        let extractor = ListingExtractor::new(&config.base_url)?;
        Ok(Self {
            engine,
            extractor,
            config,
        })
    }

    /// Replace the default extractor (e.g. one with a custom container locator)
    pub fn with_extractor(mut self, extractor: ListingExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Crawl one (location, listing type) pair. Listings are unique by URL.
    pub async fn crawl(
        &self,
        target: &SearchTarget,
        listing_type: ListingType,
        mode: CrawlMode,
    ) -> ScrapeResult<Vec<PropertyListing>> {
        if area_code(&slugify(&target.location)).is_none() {
            warn!(
                "No area code known for '{}', searching without one (results may be broader)",
                target.location
            );
        }

        info!(
            "Crawling {} listings for {} via {} in {} mode",
            listing_type,
            target.location,
            self.engine.engine_name(),
            mode.describe()
        );

        let mut page = self.engine.open_page().await?;

        let result = match mode {
            CrawlMode::Fast { max_pages } => {
                self.crawl_fast(page.as_mut(), target, listing_type, max_pages)
                    .await
            }
            CrawlMode::Detailed { max_listings } => {
                self.crawl_detailed(page.as_mut(), target, listing_type, max_listings)
                    .await
            }
        };

        if let Err(e) = page.close().await {
            warn!("Failed to close page session: {}", e);
        }

        result
    }

    async fn crawl_fast(
        &self,
        page: &mut dyn PageSession,
        target: &SearchTarget,
        listing_type: ListingType,
        max_pages: usize,
    ) -> ScrapeResult<Vec<PropertyListing>> {
        let mut seen = HashSet::new();
        let mut listings = Vec::new();

        for page_num in 1..=max_pages {
            let url = build_search_url(&self.config.base_url, target, listing_type, page_num);
            info!("Scraping: {}", url);

            let extraction = match self.load_result_page(page, &url).await {
                Ok(html) => self
                    .extractor
                    .extract_page(&html, &target.location, listing_type),
                Err(e) => {
                    warn!("Could not load page {}: {}", page_num, e);
                    PageExtraction::default()
                }
            };

            let fresh: Vec<PropertyListing> = extraction
                .listings
                .into_iter()
                .filter(|listing| seen.insert(listing.url.clone()))
                .collect();

            if fresh.is_empty() {
                info!("No listings found on page {}, stopping", page_num);
                break;
            }

            listings.extend(fresh);
            info!(
                "Page {}: {} listings so far",
                page_num,
                listings.len()
            );

            if !extraction.has_next_page {
                debug!("No next-page link on page {}", page_num);
                break;
            }

            if page_num < max_pages {
                sleep(self.config.page_delay).await;
            }
        }

        Ok(listings)
    }

    /// Load a result page and coax lazy-loaded tiles into the DOM
    async fn load_result_page(&self, page: &mut dyn PageSession, url: &str) -> ScrapeResult<String> {
        page.navigate(url).await?;
        page.wait_for_network_idle().await?;
        sleep(self.config.settle_delay).await;

        page.scroll_to(0.5).await?;
        sleep(self.config.mid_scroll_delay).await;
        page.scroll_to(1.0).await?;
        sleep(self.config.bottom_scroll_delay).await;

        page.content().await
    }

    async fn crawl_detailed(
        &self,
        page: &mut dyn PageSession,
        target: &SearchTarget,
        listing_type: ListingType,
        max_listings: usize,
    ) -> ScrapeResult<Vec<PropertyListing>> {
        let url = build_search_url(&self.config.base_url, target, listing_type, 1);
        info!("Getting listing URLs from: {}", url);

        page.navigate(&url).await?;
        page.wait_for_network_idle().await?;
        sleep(self.config.settle_delay).await;
        page.scroll_to(1.0).await?;
        sleep(self.config.bottom_scroll_delay).await;

        let html = page.content().await?;
        let urls: Vec<String> = self
            .extractor
            .listing_urls(&html, listing_type)
            .into_iter()
            .take(max_listings)
            .collect();
        info!("Found {} listing URLs to visit", urls.len());

        let mut listings = Vec::new();
        for (i, listing_url) in urls.iter().enumerate() {
            info!("Scraping {}/{}: {}", i + 1, urls.len(), listing_url);

            match self
                .visit_listing(page, listing_url, &target.location, listing_type)
                .await
            {
                Ok(Some(listing)) => listings.push(listing),
                Ok(None) => debug!("No price found on {}, skipped", listing_url),
                Err(e) => warn!("Error scraping {}: {}", listing_url, e),
            }

            sleep(self.config.listing_delay).await;
        }

        info!(
            "Kept {} of {} listings with a price",
            listings.len(),
            urls.len()
        );
        Ok(listings)
    }

    async fn visit_listing(
        &self,
        page: &mut dyn PageSession,
        url: &str,
        location: &str,
        listing_type: ListingType,
    ) -> ScrapeResult<Option<PropertyListing>> {
        page.navigate(url).await?;
        page.wait_for_network_idle().await?;
        sleep(self.config.detail_settle_delay).await;

        let html = page.content().await?;
        Ok(self
            .extractor
            .extract_detail(&html, url, location, listing_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fixture::FixtureEngine;

    const RENT_PAGE_1: &str =
        "https://www.property24.com/to-rent/kenilworth/cape-town/western-cape/8669";

    fn rent_page(n: usize) -> String {
        if n == 1 {
            RENT_PAGE_1.to_string()
        } else {
            format!("{RENT_PAGE_1}/p{n}")
        }
    }

    fn results_page(ids: &[u32], prices: &[&str], next: bool) -> String {
        let tiles: Vec<String> = ids
            .iter()
            .zip(prices)
            .map(|(id, price)| {
                format!(
                    r#"<div class="p24_tileContainer"><a href="/to-rent/kenilworth/cape-town/western-cape/8669/{id}">
                         <span>{price}</span><span>2 Bedroom Apartment</span></a></div>"#
                )
            })
            .collect();
        format!(
            "<html><body>{}{}</body></html>",
            tiles.join(""),
            if next { r#"<a class="pagination-next" href="next">Next</a>"# } else { "" }
        )
    }

    fn crawler(engine: &FixtureEngine) -> SuburbCrawler {
        let config = CrawlConfig::builder().without_delays().build();
        SuburbCrawler::new(Box::new(engine.clone()), config).unwrap()
    }

    fn fast(max_pages: usize) -> CrawlMode {
        CrawlMode::Fast { max_pages }
    }

    #[test]
    fn test_build_search_url() {
        let target = SearchTarget::new("Kenilworth");
        assert_eq!(
            build_search_url("https://www.property24.com", &target, ListingType::Rent, 1),
            RENT_PAGE_1
        );
        assert_eq!(
            build_search_url("https://www.property24.com/", &target, ListingType::Sale, 3),
            "https://www.property24.com/for-sale/kenilworth/cape-town/western-cape/8669/p3"
        );

        let target = SearchTarget::new("Sea Point").with_city("Cape Town");
        assert_eq!(
            build_search_url("https://www.property24.com", &target, ListingType::Rent, 2),
            "https://www.property24.com/to-rent/sea-point/cape-town/western-cape/8657/p2"
        );
    }

    #[test]
    fn test_unknown_location_omits_area_code() {
        let target = SearchTarget::new("Sandton")
            .with_city("Johannesburg")
            .with_region("Gauteng");
        assert_eq!(
            build_search_url("https://www.property24.com", &target, ListingType::Sale, 1),
            "https://www.property24.com/for-sale/sandton/johannesburg/gauteng"
        );
    }

    #[tokio::test]
    async fn test_fast_mode_stops_on_empty_page() {
        let engine = FixtureEngine::new([
            (rent_page(1), results_page(&[1, 2], &["R 8 000", "R 9 000"], true)),
            (rent_page(2), results_page(&[3], &["R 10 000"], true)),
            (rent_page(3), results_page(&[], &[], true)),
            (rent_page(4), results_page(&[4], &["R 11 000"], true)),
        ]);

        let listings = crawler(&engine)
            .crawl(&SearchTarget::new("kenilworth"), ListingType::Rent, fast(5))
            .await
            .unwrap();

        assert_eq!(listings.len(), 3);
        assert_eq!(engine.visited(), vec![rent_page(1), rent_page(2), rent_page(3)]);
        assert_eq!(engine.sessions(), (1, 1));
        let prices: Vec<_> = listings.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![Some(8000), Some(9000), Some(10000)]);
    }

    #[tokio::test]
    async fn test_fast_mode_scrolls_in_two_stages() {
        let engine = FixtureEngine::new([(rent_page(1), results_page(&[1], &["R 8 000"], false))]);

        crawler(&engine)
            .crawl(&SearchTarget::new("kenilworth"), ListingType::Rent, fast(3))
            .await
            .unwrap();

        assert_eq!(engine.scrolls(), vec![0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_fast_mode_stops_without_next_link_and_at_page_cap() {
        let engine = FixtureEngine::new([
            (rent_page(1), results_page(&[1], &["R 8 000"], true)),
            (rent_page(2), results_page(&[2], &["R 8 500"], false)),
            (rent_page(3), results_page(&[3], &["R 9 500"], true)),
        ]);

        let listings = crawler(&engine)
            .crawl(&SearchTarget::new("kenilworth"), ListingType::Rent, fast(5))
            .await
            .unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(engine.visited().len(), 2);

        let engine = FixtureEngine::new([
            (rent_page(1), results_page(&[1], &["R 8 000"], true)),
            (rent_page(2), results_page(&[2], &["R 8 500"], true)),
        ]);
        let listings = crawler(&engine)
            .crawl(&SearchTarget::new("kenilworth"), ListingType::Rent, fast(1))
            .await
            .unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(engine.visited(), vec![rent_page(1)]);
    }

    #[tokio::test]
    async fn test_fast_mode_dedupes_across_pages() {
        let engine = FixtureEngine::new([
            (rent_page(1), results_page(&[1, 2], &["R 8 000", "R 9 000"], true)),
            (rent_page(2), results_page(&[2, 3], &["R 9 000", "R 7 000"], true)),
            (rent_page(3), results_page(&[3], &["R 7 000"], true)),
        ]);

        let listings = crawler(&engine)
            .crawl(&SearchTarget::new("kenilworth"), ListingType::Rent, fast(5))
            .await
            .unwrap();

        let urls: HashSet<_> = listings.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(listings.len(), 3);
        assert_eq!(urls.len(), 3);
        // page 3 only repeated a known listing, so the crawl stopped there
        assert_eq!(engine.visited().len(), 3);
    }

    #[tokio::test]
    async fn test_fast_mode_navigation_failure_ends_pagination() {
        let engine = FixtureEngine::new([(rent_page(1), results_page(&[1], &["R 8 000"], true))]);

        let listings = crawler(&engine)
            .crawl(&SearchTarget::new("kenilworth"), ListingType::Rent, fast(4))
            .await
            .unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(engine.visited(), vec![rent_page(1), rent_page(2)]);
        assert_eq!(engine.sessions(), (1, 1));
    }

    fn detail_url(id: u32) -> String {
        format!("{RENT_PAGE_1}/{id}")
    }

    fn detail_page(price: &str) -> String {
        format!(
            "<html><body><h1>2 Bedroom Flat</h1><p>{price}</p><p>2 Bedrooms 1 Bathroom 1 Parking 70 m²</p></body></html>"
        )
    }

    #[tokio::test]
    async fn test_detailed_mode_keeps_only_priced_listings() {
        let search = results_page(&[1, 2, 1, 3, 4], &["", "", "", "", ""], true);
        let engine = FixtureEngine::new([
            (rent_page(1), search),
            (detail_url(1), detail_page("R 9 500 per month")),
            (detail_url(2), detail_page("Price on application")),
            // 3 is missing: navigation fails and the listing is dropped
            (detail_url(4), detail_page("R 12 000")),
        ]);

        let listings = crawler(&engine)
            .crawl(
                &SearchTarget::new("kenilworth"),
                ListingType::Rent,
                CrawlMode::Detailed { max_listings: 3 },
            )
            .await
            .unwrap();

        assert_eq!(
            engine.visited(),
            vec![rent_page(1), detail_url(1), detail_url(2), detail_url(3)]
        );
        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.url, detail_url(1));
        assert_eq!(listing.price, Some(9500));
        assert_eq!(listing.title, "2 Bedroom Flat");
        assert_eq!(listing.parking_spaces, Some(1));
        assert_eq!(engine.sessions(), (1, 1));
    }

    #[tokio::test]
    async fn test_detailed_mode_fails_when_search_page_fails() {
        let engine = FixtureEngine::new(Vec::<(String, String)>::new());

        let result = crawler(&engine)
            .crawl(
                &SearchTarget::new("kenilworth"),
                ListingType::Sale,
                CrawlMode::Detailed { max_listings: 10 },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(engine.sessions(), (1, 1));
    }
}
