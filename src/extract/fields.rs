//! Field parsers: raw listing text in, typed value out.
//!
//! Each parser is a pure function so it can be pinned down by its own
//! table of cases. Site wording drifts; these are where it shows up first.

use regex::Regex;
use std::sync::LazyLock;

static RE_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bR\s*(\d{1,3}(?:[ \x{A0},]\d{3})+|\d+)").unwrap()
});
static RE_BEDROOMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*bed").unwrap());
static RE_BATHROOMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*bath").unwrap());
static RE_PARKING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:parking|garage|car)").unwrap());
static RE_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*m[²2]").unwrap());

pub const MAX_TITLE_CHARS: usize = 200;

/// First currency amount in the text, normalised to `"R <digits>"`.
/// Digit grouping is kept as matched so the audit trail shows the source.
pub fn find_price_text(text: &str) -> Option<String> {
    RE_PRICE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("R {}", m.as_str().trim()))
}

/// Parse a price such as `R 8 250`, `R 1 500 000` or `R 12,500 pm`.
/// Everything from the first per-period marker on is ignored.
pub fn parse_price(price_text: &str) -> Option<i64> {
    let amount = match price_text.find(['p', 'P']) {
        Some(idx) => &price_text[..idx],
        None => price_text,
    };

    let digits: String = amount.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn first_count(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn parse_bedrooms(text: &str) -> Option<u32> {
    first_count(&RE_BEDROOMS, text)
}

pub fn parse_bathrooms(text: &str) -> Option<u32> {
    first_count(&RE_BATHROOMS, text)
}

pub fn parse_parking(text: &str) -> Option<u32> {
    first_count(&RE_PARKING, text)
}

/// Floor area in square metres (`85 m²`, `120.5m2`). Zero is treated as absent.
pub fn parse_size(text: &str) -> Option<f64> {
    RE_SIZE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|size| *size > 0.0)
}

/// Cut a title to `MAX_TITLE_CHARS` characters on a char boundary
pub fn truncate_title(title: &str) -> String {
    title.trim().chars().take(MAX_TITLE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_price_text() {
        let cases = [
            ("R 8 250\n2 Bedrooms", Some("R 8 250")),
            ("Price R 1 500 000", Some("R 1 500 000")),
            ("R12 500 pm", Some("R 12 500")),
            ("R 8,250 per month", Some("R 8,250")),
            ("R8250", Some("R 8250")),
            ("R\n9 000", Some("R 9 000")),
            ("FOR 2 people", None),
            ("POA", None),
            ("", None),
        ];

        for (text, expected) in cases {
            assert_eq!(find_price_text(text).as_deref(), expected, "text: {text:?}");
        }
    }

    #[test]
    fn test_parse_price() {
        let cases = [
            ("R 8 250", Some(8_250)),
            ("R 1 500 000", Some(1_500_000)),
            ("R 12 500 pm", Some(12_500)),
            ("R 9 000 p/m", Some(9_000)),
            ("R 7,800 per month", Some(7_800)),
            ("R 15 000 P/M", Some(15_000)),
            ("Price on application", None),
            ("R ", None),
            ("", None),
        ];

        for (text, expected) in cases {
            assert_eq!(parse_price(text), expected, "text: {text:?}");
        }
    }

    #[test]
    fn test_parse_price_is_idempotent_on_stored_text() {
        for raw in ["R 8 250 pm", "Asking R 2 950 000", "R8250"] {
            let price_text = find_price_text(raw).unwrap();
            let first = parse_price(&price_text);
            assert!(first.is_some());
            assert_eq!(parse_price(&price_text), first);
        }
    }

    #[test]
    fn test_parse_bedrooms() {
        let cases = [
            ("3 Bedroom House", Some(3)),
            ("2 bedrooms", Some(2)),
            ("R 8 250\n2\nBeds", Some(2)),
            ("1bed", Some(1)),
            ("Studio", None),
        ];

        for (text, expected) in cases {
            assert_eq!(parse_bedrooms(text), expected, "text: {text:?}");
        }
    }

    #[test]
    fn test_parse_bathrooms() {
        let cases = [
            ("2 Bathrooms", Some(2)),
            ("3 bed 2 bath", Some(2)),
            ("1 Bath", Some(1)),
            ("No bathroom listed", None),
        ];

        for (text, expected) in cases {
            assert_eq!(parse_bathrooms(text), expected, "text: {text:?}");
        }
    }

    #[test]
    fn test_parse_parking() {
        let cases = [
            ("2 Parking", Some(2)),
            ("1 Garage", Some(1)),
            ("2 car ports", Some(2)),
            ("Street parking", None),
        ];

        for (text, expected) in cases {
            assert_eq!(parse_parking(text), expected, "text: {text:?}");
        }
    }

    #[test]
    fn test_parse_size() {
        let cases = [
            ("85 m²", Some(85.0)),
            ("120.5m2", Some(120.5)),
            ("Floor size: 64 m²", Some(64.0)),
            ("0 m²", None),
            ("Erf size unknown", None),
        ];

        for (text, expected) in cases {
            assert_eq!(parse_size(text), expected, "text: {text:?}");
        }
    }

    #[test]
    fn test_truncate_title() {
        let long = "é".repeat(250);
        assert_eq!(truncate_title(&long).chars().count(), MAX_TITLE_CHARS);
        assert_eq!(truncate_title("  2 Bedroom Flat "), "2 Bedroom Flat");
    }
}
