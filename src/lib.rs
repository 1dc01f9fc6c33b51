//! Suburb Scout: property listing scraper and rental-yield analysis.
//!
//! `crawler` drives a browser engine from `scrapers` over search pages,
//! `extract` turns rendered markup into listings, `store` keeps one JSON
//! batch per suburb and listing type, and `analysis` derives market metrics
//! and text reports from those batches.

pub mod analysis;
pub mod crawler;
pub mod extract;
pub mod models;
pub mod scrapers;
pub mod store;
