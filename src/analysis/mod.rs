//! Market metrics for a suburb, computed from stored listing batches

pub mod report;
mod stats;
mod yields;

pub use stats::PriceStats;
pub use yields::{YieldAssumptions, YieldBreakdown};

use crate::models::{ListingType, PropertyListing, PropertyType};
use crate::store::ListingStore;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Aggregate view of one suburb's rental and sales market
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuburbMetrics {
    pub location: String,

    pub rental_count: usize,
    pub rent: Option<PriceStats>,

    pub sales_count: usize,
    pub sale: Option<PriceStats>,

    pub gross_yield_percent: Option<f64>,
    pub estimated_net_yield_percent: Option<f64>,
    pub price_to_rent_ratio_years: Option<f64>,

    pub property_type_counts: BTreeMap<PropertyType, usize>,
    /// Listings per bedroom count; listings without a count are left out
    pub bedroom_counts: BTreeMap<u32, usize>,

    #[serde(skip)]
    pub yield_breakdown: Option<YieldBreakdown>,
}

/// Prices usable for statistics: present and positive
fn usable_prices(listings: &[PropertyListing]) -> Vec<f64> {
    listings
        .iter()
        .filter_map(|listing| listing.price)
        .filter(|price| *price > 0)
        .map(|price| price as f64)
        .collect()
}

impl SuburbMetrics {
    /// Pure computation over already-loaded batches
    pub fn compute(
        location: &str,
        rentals: &[PropertyListing],
        sales: &[PropertyListing],
        assumptions: &YieldAssumptions,
    ) -> Self {
        let rent = PriceStats::from_values(&usable_prices(rentals));
        let sale = PriceStats::from_values(&usable_prices(sales));

        let breakdown = YieldBreakdown::compute(
            rent.map(|stats| stats.median),
            sale.map(|stats| stats.median),
            assumptions,
        );

        let mut property_type_counts = BTreeMap::new();
        let mut bedroom_counts = BTreeMap::new();
        for listing in rentals.iter().chain(sales) {
            *property_type_counts.entry(listing.property_type).or_insert(0) += 1;
            if let Some(beds) = listing.bedrooms {
                *bedroom_counts.entry(beds).or_insert(0) += 1;
            }
        }

        Self {
            location: location.to_string(),
            rental_count: rentals.len(),
            rent,
            sales_count: sales.len(),
            sale,
            gross_yield_percent: breakdown.map(|y| y.gross_yield_percent),
            estimated_net_yield_percent: breakdown.map(|y| y.net_yield_percent),
            price_to_rent_ratio_years: breakdown.map(|y| y.price_to_rent_years),
            property_type_counts,
            bedroom_counts,
            yield_breakdown: breakdown,
        }
    }

    pub fn median_rent(&self) -> Option<f64> {
        self.rent.map(|stats| stats.median)
    }

    pub fn median_price(&self) -> Option<f64> {
        self.sale.map(|stats| stats.median)
    }
}

/// Reads stored batches and turns them into metrics
pub struct SuburbAnalyzer {
    store: ListingStore,
    assumptions: YieldAssumptions,
}

impl SuburbAnalyzer {
    pub fn new(store: ListingStore, assumptions: YieldAssumptions) -> Self {
        Self { store, assumptions }
    }

    pub fn assumptions(&self) -> &YieldAssumptions {
        &self.assumptions
    }

    pub async fn analyze(&self, location: &str) -> Result<SuburbMetrics> {
        let rentals = self.store.load(location, ListingType::Rent).await?;
        let sales = self.store.load(location, ListingType::Sale).await?;
        info!(
            "Analyzing {}: {} rentals, {} sales",
            location,
            rentals.len(),
            sales.len()
        );

        Ok(SuburbMetrics::compute(
            location,
            &rentals,
            &sales,
            &self.assumptions,
        ))
    }

    /// Metrics for each location, in the order given
    pub async fn compare(&self, locations: &[String]) -> Result<Vec<SuburbMetrics>> {
        let mut all = Vec::with_capacity(locations.len());
        for location in locations {
            all.push(self.analyze(location).await?);
        }
        Ok(all)
    }
}
