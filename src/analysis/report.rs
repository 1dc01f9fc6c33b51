//! Plain-text rendering of suburb metrics

use crate::analysis::{PriceStats, SuburbMetrics, YieldAssumptions};
use crate::models::PropertyListing;
use std::fmt::Write;

const RULE_WIDTH: usize = 50;

/// `R 1,250,000`, rounded to whole rand
pub fn format_rand(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-R {grouped}")
    } else {
        format!("R {grouped}")
    }
}

/// "sea-point" -> "Sea-Point"
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        at_word_start = !ch.is_alphabetic();
    }
    out
}

/// Rate as a percentage label: 0.05 -> "5", 0.002 -> "0.2"
fn percent_label(rate: f64) -> String {
    let label = format!("{:.1}", rate * 100.0);
    match label.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => label,
    }
}

fn push_price_block(lines: &mut Vec<String>, stats: &Option<PriceStats>, noun: &str, unit: &str) {
    if let Some(stats) = stats {
        lines.push(format!("  Median {}: {}{}", noun, format_rand(stats.median), unit));
        lines.push(format!("  Average {}: {}{}", noun, format_rand(stats.mean), unit));
        lines.push(format!(
            "  Range: {} - {}",
            format_rand(stats.min),
            format_rand(stats.max)
        ));
        if stats.std_dev > 0.0 {
            lines.push(format!("  Std Dev: {}", format_rand(stats.std_dev)));
        }
    }
}

/// Narrative report for one suburb. Lines without data are left out.
pub fn market_report(metrics: &SuburbMetrics) -> String {
    let mut lines = vec![
        format!("=== {} Market Analysis ===", title_case(&metrics.location)),
        String::new(),
        "RENTAL MARKET".to_string(),
        format!("  Listings: {}", metrics.rental_count),
    ];
    push_price_block(&mut lines, &metrics.rent, "Rent", " /month");

    lines.extend([
        String::new(),
        "SALES MARKET".to_string(),
        format!("  Listings: {}", metrics.sales_count),
    ]);
    push_price_block(&mut lines, &metrics.sale, "Price", "");

    lines.extend([String::new(), "INVESTMENT METRICS".to_string()]);
    match (
        metrics.gross_yield_percent,
        metrics.estimated_net_yield_percent,
        metrics.price_to_rent_ratio_years,
    ) {
        (Some(gross), Some(net), Some(ratio)) => {
            lines.push(format!("  Gross Yield: {gross:.2}%"));
            lines.push(format!("  Est. Net Yield: {net:.2}%"));
            lines.push(format!("  Price-to-Rent Ratio: {ratio:.1} years"));
        }
        _ => lines.push("  Insufficient data (needs both rental and sale prices)".to_string()),
    }

    lines.extend([String::new(), "PROPERTY MIX".to_string()]);
    if !metrics.property_type_counts.is_empty() {
        let types: Vec<String> = metrics
            .property_type_counts
            .iter()
            .map(|(ptype, count)| format!("{ptype}: {count}"))
            .collect();
        lines.push(format!("  Types: {}", types.join(", ")));
    }
    if !metrics.bedroom_counts.is_empty() {
        let beds: Vec<String> = metrics
            .bedroom_counts
            .iter()
            .map(|(beds, count)| format!("{beds} bed: {count}"))
            .collect();
        lines.push(format!("  Bedrooms: {}", beds.join(", ")));
    }

    lines.join("\n")
}

/// Qualitative reading of net yield and price-to-rent ratio
pub fn interpretation(net_yield_percent: f64, price_to_rent_years: f64) -> Vec<&'static str> {
    let mut notes = Vec::new();

    if net_yield_percent > 5.0 {
        notes.push("> 5% net yield = Good cash flow");
    } else if net_yield_percent >= 3.0 {
        notes.push("3-5% net yield = Moderate, watch expenses");
    } else {
        notes.push("< 3% net yield = Growth play, not cash flow");
    }

    if price_to_rent_years < 15.0 {
        notes.push("Price-to-rent < 15 = Generally affordable");
    } else if price_to_rent_years > 20.0 {
        notes.push("Price-to-rent > 20 = Premium market");
    }

    notes
}

fn breakdown_line(out: &mut String, label: &str, amount: String, subtotal: Option<f64>) {
    let subtotal = subtotal.map(format_rand).unwrap_or_default();
    let _ = writeln!(out, "  {label:<36}{amount:>14}{subtotal:>16}");
}

/// Step-by-step net yield calculation with a running subtotal
pub fn yield_breakdown(metrics: &SuburbMetrics, assumptions: &YieldAssumptions) -> String {
    let Some(y) = metrics.yield_breakdown else {
        return "Insufficient data for yield breakdown.".to_string();
    };

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "YIELD BREAKDOWN: {}", title_case(&metrics.location));
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out);

    let _ = writeln!(out, "GROSS INCOME");
    let mut running = y.annual_rent;
    breakdown_line(
        &mut out,
        &format!("Annual Rent ({} x 12):", format_rand(y.monthly_rent)),
        format_rand(y.annual_rent),
        Some(running),
    );
    running -= y.vacancy_loss;
    breakdown_line(
        &mut out,
        &format!("Less: Vacancy ({}%):", percent_label(assumptions.vacancy_rate)),
        format!("-{}", format_rand(y.vacancy_loss)),
        Some(running),
    );
    breakdown_line(&mut out, "Effective Gross Income:", format_rand(y.effective_rent), None);
    let _ = writeln!(out);

    let _ = writeln!(out, "EXPENSES");
    let expenses = [
        (
            format!("Property Management ({}%):", percent_label(assumptions.management_fee)),
            y.management,
        ),
        (
            format!("Maintenance ({}% of value):", percent_label(assumptions.maintenance_rate)),
            y.maintenance,
        ),
        (
            format!("Insurance ({}% of value):", percent_label(assumptions.insurance_rate)),
            y.insurance,
        ),
        (
            format!("Rates & Levies ({}% of value):", percent_label(assumptions.rates_rate)),
            y.rates,
        ),
    ];
    for (label, cost) in &expenses {
        running -= cost;
        breakdown_line(&mut out, label, format!("-{}", format_rand(*cost)), Some(running));
    }
    let _ = writeln!(out);

    breakdown_line(&mut out, "NET OPERATING INCOME:", format_rand(y.net_income), None);
    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    breakdown_line(&mut out, "PROPERTY VALUE:", format_rand(y.property_value), None);
    let _ = writeln!(out);
    breakdown_line(&mut out, "GROSS YIELD:", format!("{:.2}%", y.gross_yield_percent), None);
    breakdown_line(&mut out, "NET YIELD:", format!("{:.2}%", y.net_yield_percent), None);
    breakdown_line(
        &mut out,
        "PRICE-TO-RENT RATIO:",
        format!("{:.1} years", y.price_to_rent_years),
        None,
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "INTERPRETATION:");
    for note in interpretation(y.net_yield_percent, y.price_to_rent_years) {
        let _ = writeln!(out, "  {note}");
    }

    out
}

/// Fixed-width table, one row per suburb in the order given
pub fn comparison_table(all_metrics: &[SuburbMetrics]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== SUBURB COMPARISON ===");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<15} {:<8} {:<8} {:<12} {:<15} {:<10} {:<10}",
        "Suburb", "Rentals", "Sales", "Med Rent", "Med Price", "Gross %", "Net %"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));

    let na = || "N/A".to_string();
    for m in all_metrics {
        let rent = m.median_rent().map(format_rand).unwrap_or_else(na);
        let price = m.median_price().map(format_rand).unwrap_or_else(na);
        let gross = m
            .gross_yield_percent
            .map(|g| format!("{g:.2}%"))
            .unwrap_or_else(na);
        let net = m
            .estimated_net_yield_percent
            .map(|n| format!("{n:.2}%"))
            .unwrap_or_else(na);

        let _ = writeln!(
            out,
            "{:<15} {:<8} {:<8} {:<12} {:<15} {:<10} {:<10}",
            m.location, m.rental_count, m.sales_count, rent, price, gross, net
        );
    }

    out
}

/// Post-crawl summary: counts, median and price range
pub fn crawl_summary(label: &str, listings: &[PropertyListing]) -> String {
    let prices: Vec<f64> = listings
        .iter()
        .filter_map(|listing| listing.price)
        .map(|price| price as f64)
        .collect();

    let mut lines = vec![
        format!("{label} Summary:"),
        format!("  Listings: {} ({} with price)", listings.len(), prices.len()),
    ];
    if let Some(stats) = PriceStats::from_values(&prices) {
        lines.push(format!("  Median: {}", format_rand(stats.median)));
        lines.push(format!(
            "  Range: {} - {}",
            format_rand(stats.min),
            format_rand(stats.max)
        ));
    }
    lines.join("\n")
}
