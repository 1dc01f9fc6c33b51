use crate::crawler::slugify;
use crate::models::{ListingType, PropertyListing};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Listing batches on disk: one JSON file per (location, listing type),
/// written whole after a crawl and read whole for analysis.
#[derive(Debug, Clone)]
pub struct ListingStore {
    data_dir: PathBuf,
}

impl ListingStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// e.g. `data/kenilworth_rentals.json`
    pub fn batch_path(&self, location: &str, listing_type: ListingType) -> PathBuf {
        self.data_dir.join(format!(
            "{}_{}.json",
            slugify(location),
            listing_type.batch_suffix()
        ))
    }

    /// Replace the stored batch. An empty batch leaves any previous file in
    /// place and returns `None`.
    pub async fn save(
        &self,
        location: &str,
        listing_type: ListingType,
        listings: &[PropertyListing],
    ) -> Result<Option<PathBuf>> {
        if listings.is_empty() {
            info!("No {} listings for {}, nothing saved", listing_type, location);
            return Ok(None);
        }

        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;

        let path = self.batch_path(location, listing_type);
        let json = serde_json::to_string_pretty(listings)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!("💾 Saved {} listings to {}", listings.len(), path.display());
        Ok(Some(path))
    }

    /// Load a stored batch; a batch that was never written is empty
    pub async fn load(
        &self,
        location: &str,
        listing_type: ListingType,
    ) -> Result<Vec<PropertyListing>> {
        let path = self.batch_path(location, listing_type);
        let exists = tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check {}", path.display()))?;
        if !exists {
            debug!("No batch at {}", path.display());
            return Ok(Vec::new());
        }

        let json = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let listings = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(listings)
    }
}
