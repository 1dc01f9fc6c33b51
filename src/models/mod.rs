use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a listing is offered to rent or for sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    /// Path segment used by the listing site for this type
    pub fn path_segment(self) -> &'static str {
        match self {
            ListingType::Rent => "to-rent",
            ListingType::Sale => "for-sale",
        }
    }

    /// Suffix of the persisted batch file (`kenilworth_rentals.json`)
    pub fn batch_suffix(self) -> &'static str {
        match self {
            ListingType::Rent => "rentals",
            ListingType::Sale => "sales",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingType::Rent => write!(f, "rent"),
            ListingType::Sale => write!(f, "sale"),
        }
    }
}

/// Kind of dwelling, detected from free text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyType {
    House,
    Apartment,
    Flat,
    Townhouse,
    Studio,
    Room,
    Commercial,
    Duplex,
    Unknown,
}

impl PropertyType {
    /// Detection order. Note "Townhouse" text matches `House` first.
    pub const DETECTION_ORDER: [PropertyType; 8] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Flat,
        PropertyType::Townhouse,
        PropertyType::Studio,
        PropertyType::Room,
        PropertyType::Commercial,
        PropertyType::Duplex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
            PropertyType::Flat => "Flat",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Studio => "Studio",
            PropertyType::Room => "Room",
            PropertyType::Commercial => "Commercial",
            PropertyType::Duplex => "Duplex",
            PropertyType::Unknown => "Unknown",
        }
    }

    /// First case-insensitive substring match against the enumeration
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::DETECTION_ORDER
            .into_iter()
            .find(|ptype| lower.contains(&ptype.as_str().to_lowercase()))
            .unwrap_or(PropertyType::Unknown)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scraped listing. Never mutated after the crawler emits it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyListing {
    pub url: String,
    /// Asking price or monthly rent in ZAR
    pub price: Option<i64>,
    /// Raw matched price text, kept for auditing the parse
    pub price_text: String,
    pub location: String,
    pub property_type: PropertyType,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub parking_spaces: Option<u32>,
    pub size_square_meters: Option<f64>,
    pub title: String,
    pub listing_type: ListingType,
    pub scraped_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_property_type() {
        let cases = [
            ("2 Bedroom Apartment in Kenilworth", PropertyType::Apartment),
            ("3 Bedroom House", PropertyType::House),
            ("Spacious townhouse", PropertyType::House),
            ("Studio flat", PropertyType::Flat),
            ("Studio to let", PropertyType::Studio),
            ("Office space, commercial zoning", PropertyType::Commercial),
            ("Modern DUPLEX", PropertyType::Duplex),
            ("Vacant land", PropertyType::Unknown),
        ];

        for (text, expected) in cases {
            assert_eq!(PropertyType::detect(text), expected, "text: {text}");
        }
    }

    #[test]
    fn test_listing_serializes_with_camel_case_fields() {
        let listing = PropertyListing {
            url: "https://www.property24.com/to-rent/kenilworth/cape-town/western-cape/8669/116563352"
                .to_string(),
            price: Some(8250),
            price_text: "R 8 250".to_string(),
            location: "kenilworth".to_string(),
            property_type: PropertyType::Apartment,
            bedrooms: Some(2),
            bathrooms: Some(1),
            parking_spaces: None,
            size_square_meters: Some(65.0),
            title: "2 Bedroom Apartment".to_string(),
            listing_type: ListingType::Rent,
            scraped_at: Utc::now(),
        };

        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["priceText"], "R 8 250");
        assert_eq!(value["propertyType"], "Apartment");
        assert_eq!(value["listingType"], "rent");
        assert_eq!(value["sizeSquareMeters"], 65.0);
        assert!(value["parkingSpaces"].is_null());

        let back: PropertyListing = serde_json::from_value(value).unwrap();
        assert_eq!(back, listing);
    }
}
