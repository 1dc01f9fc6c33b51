use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Expense ratios behind the net-yield estimate. Defaults are typical for
/// Cape Town rentals; other markets can override them from a JSON file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct YieldAssumptions {
    /// Share of the year the unit stands empty
    pub vacancy_rate: f64,
    /// Agent fee, as a share of collected rent
    pub management_fee: f64,
    /// Yearly maintenance, as a share of property value
    pub maintenance_rate: f64,
    /// Yearly insurance, as a share of property value
    pub insurance_rate: f64,
    /// Municipal rates and levies, as a share of property value
    pub rates_rate: f64,
}

impl Default for YieldAssumptions {
    fn default() -> Self {
        Self {
            vacancy_rate: 0.05,
            management_fee: 0.08,
            maintenance_rate: 0.01,
            insurance_rate: 0.002,
            rates_rate: 0.005,
        }
    }
}

impl YieldAssumptions {
    /// Read overrides from JSON; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read assumptions file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse assumptions file {}", path.display()))
    }
}

/// Every step from median rent and median price to net yield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldBreakdown {
    pub monthly_rent: f64,
    pub property_value: f64,
    pub annual_rent: f64,
    pub vacancy_loss: f64,
    pub effective_rent: f64,
    pub management: f64,
    pub maintenance: f64,
    pub insurance: f64,
    pub rates: f64,
    pub net_income: f64,
    pub gross_yield_percent: f64,
    pub net_yield_percent: f64,
    /// Years of rent needed to pay the price
    pub price_to_rent_years: f64,
}

impl YieldBreakdown {
    /// `None` unless both medians are positive
    pub fn compute(
        median_rent: Option<f64>,
        median_price: Option<f64>,
        assumptions: &YieldAssumptions,
    ) -> Option<Self> {
        let monthly_rent = median_rent.filter(|rent| *rent > 0.0)?;
        let price = median_price.filter(|price| *price > 0.0)?;

        let annual_rent = monthly_rent * 12.0;
        let vacancy_loss = annual_rent * assumptions.vacancy_rate;
        let effective_rent = annual_rent - vacancy_loss;
        let management = effective_rent * assumptions.management_fee;
        let maintenance = price * assumptions.maintenance_rate;
        let insurance = price * assumptions.insurance_rate;
        let rates = price * assumptions.rates_rate;
        let net_income = effective_rent - management - maintenance - insurance - rates;

        Some(Self {
            monthly_rent,
            property_value: price,
            annual_rent,
            vacancy_loss,
            effective_rent,
            management,
            maintenance,
            insurance,
            rates,
            net_income,
            gross_yield_percent: annual_rent / price * 100.0,
            net_yield_percent: net_income / price * 100.0,
            price_to_rent_years: price / annual_rent,
        })
    }
}
