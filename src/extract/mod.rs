//! Listing extraction over a rendered page snapshot
//!
//! The crawler hands over the page's outer HTML; everything here works on a
//! `scraper::Html` parse of it. Parsing happens inside these synchronous
//! functions so the (non-`Send`) document never crosses an await point.

pub mod fields;
pub mod locator;

use crate::models::{ListingType, PropertyListing, PropertyType};
use crate::scrapers::error::{ScrapeError, ScrapeResult};
use chrono::Utc;
use locator::{CardAncestorLocator, ContainerLocator};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

/// Listing detail links end in `/<area code>/<listing id>`
static RE_DETAIL_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\d+/\d+$").unwrap());

const NEXT_PAGE_SELECTOR: &str = r#"a[rel="next"], .pagination-next, [aria-label="Next"]"#;
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Listings found on one result page
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub listings: Vec<PropertyListing>,
    pub has_next_page: bool,
}

pub struct ListingExtractor {
    base_url: Url,
    locator: Box<dyn ContainerLocator>,
}

impl ListingExtractor {
    pub fn new(base_url: &str) -> ScrapeResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScrapeError::Browser(format!("invalid base URL {base_url}: {e}")))?;
        Ok(Self {
            base_url,
            locator: Box::new(CardAncestorLocator::default()),
        })
    }

    /// Swap the container heuristic, e.g. for a site-specific adapter
    pub fn with_locator(mut self, locator: impl ContainerLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Resolve against the site root. Query and fragment are dropped so a
    /// listing has one identity however it is linked.
    fn resolve(&self, href: &str) -> ScrapeResult<String> {
        let mut url = self
            .base_url
            .join(href)
            .map_err(|e| ScrapeError::extraction(format!("bad listing link {href:?}: {e}")))?;
        url.set_query(None);
        url.set_fragment(None);
        Ok(url.to_string())
    }

    /// Detail-page anchors for this listing type, resolved and deduplicated
    /// in document order
    fn listing_anchors<'a>(
        &self,
        document: &'a Html,
        listing_type: ListingType,
    ) -> Vec<(String, ElementRef<'a>)> {
        let selector = match Selector::parse(&format!(
            r#"a[href*="/{}/"]"#,
            listing_type.path_segment()
        )) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Failed to parse anchor selector: {:?}", e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut anchors = Vec::new();

        for anchor in document.select(&selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let path = href.split(['?', '#']).next().unwrap_or(href);
            if !RE_DETAIL_LINK.is_match(path) {
                continue;
            }

            let url = match self.resolve(href) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping listing element: {}", e);
                    continue;
                }
            };

            if seen.insert(url.clone()) {
                anchors.push((url, anchor));
            }
        }

        anchors
    }

    /// Candidate detail-page URLs on a result page
    pub fn listing_urls(&self, html: &str, listing_type: ListingType) -> Vec<String> {
        let document = Html::parse_document(html);
        self.listing_anchors(&document, listing_type)
            .into_iter()
            .map(|(url, _)| url)
            .collect()
    }

    /// Parse every listing tile on a search-result page. Tiles without a
    /// readable price are kept with `price: None`.
    pub fn extract_page(
        &self,
        html: &str,
        location: &str,
        listing_type: ListingType,
    ) -> PageExtraction {
        let document = Html::parse_document(html);

        let listings = self
            .listing_anchors(&document, listing_type)
            .into_iter()
            .map(|(url, anchor)| {
                let container = self.locator.locate_container(anchor);
                let text = visible_text(container);
                debug!("Tile text for {}: {:?}", url, text);
                listing_from_text(url, &text, location, listing_type, first_line(&text))
            })
            .collect();

        PageExtraction {
            listings,
            has_next_page: has_next_page(&document),
        }
    }

    /// Parse a listing's own page. Returns `None` when no price can be found:
    /// detailed crawls only keep listings with a price.
    pub fn extract_detail(
        &self,
        html: &str,
        url: &str,
        location: &str,
        listing_type: ListingType,
    ) -> Option<PropertyListing> {
        let document = Html::parse_document(html);

        let body_selector = Selector::parse("body").ok()?;
        let text = document
            .select(&body_selector)
            .next()
            .map(visible_text)
            .unwrap_or_default();

        let title = Selector::parse("h1")
            .ok()
            .and_then(|h1| document.select(&h1).next())
            .map(inline_text)
            .unwrap_or_default();

        let mut listing = listing_from_text(url.to_string(), &text, location, listing_type, &title);
        if listing.price.is_none() {
            debug!("No price on {}, dropping", url);
            return None;
        }
        listing.parking_spaces = fields::parse_parking(&text);
        Some(listing)
    }
}

/// Apply the field parsers in order: price, bedrooms, bathrooms, size, type
fn listing_from_text(
    url: String,
    text: &str,
    location: &str,
    listing_type: ListingType,
    title: &str,
) -> PropertyListing {
    let price_text = fields::find_price_text(text).unwrap_or_default();

    PropertyListing {
        url,
        price: fields::parse_price(&price_text),
        price_text,
        location: location.to_string(),
        bedrooms: fields::parse_bedrooms(text),
        bathrooms: fields::parse_bathrooms(text),
        parking_spaces: None,
        size_square_meters: fields::parse_size(text),
        property_type: PropertyType::detect(text),
        title: fields::truncate_title(title),
        listing_type,
        scraped_at: Utc::now(),
    }
}

fn first_line(text: &str) -> &str {
    text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

pub fn has_next_page(document: &Html) -> bool {
    Selector::parse(NEXT_PAGE_SELECTOR)
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false)
}

/// Rendered text of an element: one line per non-empty text node, with
/// script and style contents left out
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut lines = Vec::new();
    collect_text(element, &mut lines);
    lines.join("\n")
}

/// Rendered text on a single line, the way a heading reads
pub fn inline_text(element: ElementRef<'_>) -> String {
    let mut pieces = Vec::new();
    collect_text(element, &mut pieces);
    pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !HIDDEN_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, lines);
            }
        } else if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
    }
}
