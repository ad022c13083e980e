// 📊 Aggregation Engine
// Grouped sums and derived metrics over a (filtered) dataset.
// Everything here is a pure function of its input.

use crate::error::{DashboardError, Result};
use crate::record::Dataset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ============================================================================
// ROW TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearGrowth {
    pub year: i32,
    pub total_registrations: u64,
    /// None for the first year, or when the previous total is zero
    pub growth_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerShare {
    pub manufacturer: String,
    pub total_registrations: u64,
    /// Share of the filtered total, 0-100
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub date: NaiveDate,
    pub category: String,
    pub total_registrations: u64,
}

/// Headline growth between two specific years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearOverYear {
    pub year: i32,
    pub previous_year: i32,
    pub growth_pct: f64,
}

// ============================================================================
// TABLES
// ============================================================================

/// Registrations per year (ascending) with growth against the previous entry
pub fn year_over_year_growth(dataset: &Dataset) -> Vec<YearGrowth> {
    let totals = totals_by_year(dataset);

    let mut rows = Vec::with_capacity(totals.len());
    let mut previous: Option<u64> = None;

    for (year, total) in totals {
        let growth_pct = previous.and_then(|prev| growth_pct(total, prev));
        rows.push(YearGrowth {
            year,
            total_registrations: total,
            growth_pct,
        });
        previous = Some(total);
    }

    rows
}

/// Registrations per manufacturer, in first-seen order
pub fn market_share(dataset: &Dataset) -> Vec<ManufacturerShare> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, u64> = HashMap::new();

    for record in dataset {
        let entry = totals.entry(record.manufacturer.as_str()).or_insert_with(|| {
            order.push(record.manufacturer.as_str());
            0
        });
        *entry += record.registrations;
    }

    let grand_total: u64 = totals.values().sum();

    order
        .into_iter()
        .map(|manufacturer| {
            let total = totals.get(manufacturer).copied().unwrap_or(0);
            let share_pct = if grand_total == 0 {
                0.0
            } else {
                total as f64 / grand_total as f64 * 100.0
            };
            ManufacturerShare {
                manufacturer: manufacturer.to_string(),
                total_registrations: total,
                share_pct,
            }
        })
        .collect()
}

/// Registrations per (date, category), ascending by date then category
pub fn monthly_trend(dataset: &Dataset) -> Vec<MonthlyPoint> {
    let mut totals: BTreeMap<(NaiveDate, &str), u64> = BTreeMap::new();

    for record in dataset {
        *totals.entry((record.date, record.category.as_str())).or_insert(0) += record.registrations;
    }

    totals
        .into_iter()
        .map(|((date, category), total)| MonthlyPoint {
            date,
            category: category.to_string(),
            total_registrations: total,
        })
        .collect()
}

// ============================================================================
// SCALARS
// ============================================================================

pub fn total_registrations(dataset: &Dataset) -> u64 {
    dataset.iter().map(|r| r.registrations).sum()
}

/// Growth of `year` over `year - 1`, in percent.
///
/// UndefinedMetric when either year has no rows or the prior total is zero.
pub fn yoy_growth_for_year(dataset: &Dataset, year: i32) -> Result<f64> {
    let prior = previous_year(year)?;
    let totals = totals_by_year(dataset);

    let current = totals
        .get(&year)
        .copied()
        .ok_or_else(|| DashboardError::undefined(format!("no registrations in {}", year)))?;
    let previous = totals
        .get(&prior)
        .copied()
        .ok_or_else(|| DashboardError::undefined(format!("no registrations in {}", prior)))?;

    growth_pct(current, previous).ok_or_else(|| {
        DashboardError::undefined(format!("{} total is zero, growth for {} undefined", prior, year))
    })
}

fn previous_year(year: i32) -> Result<i32> {
    year.checked_sub(1)
        .ok_or_else(|| DashboardError::undefined(format!("no year before {}", year)))
}

/// Most recent date present, None on an empty dataset
pub fn latest_month(dataset: &Dataset) -> Option<NaiveDate> {
    dataset.iter().map(|r| r.date).max()
}

/// Latest year with all twelve months present in the data
pub fn latest_complete_year(dataset: &Dataset) -> Option<i32> {
    let mut months: BTreeMap<i32, BTreeSet<u32>> = BTreeMap::new();
    for record in dataset {
        months.entry(record.year).or_default().insert(record.month);
    }

    months
        .into_iter()
        .rev()
        .find(|(_, seen)| seen.len() == 12)
        .map(|(year, _)| year)
}

/// Headline YoY: `year` (or the latest complete year) against the year before
pub fn headline_growth(dataset: &Dataset, year: Option<i32>) -> Result<YearOverYear> {
    let year = match year {
        Some(y) => y,
        None => latest_complete_year(dataset)
            .ok_or_else(|| DashboardError::undefined("no complete year in selection"))?,
    };

    let growth_pct = yoy_growth_for_year(dataset, year)?;
    Ok(YearOverYear {
        year,
        previous_year: previous_year(year)?,
        growth_pct,
    })
}

fn totals_by_year(dataset: &Dataset) -> BTreeMap<i32, u64> {
    let mut totals = BTreeMap::new();
    for record in dataset {
        *totals.entry(record.year).or_insert(0) += record.registrations;
    }
    totals
}

fn growth_pct(current: u64, previous: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 / previous as f64 - 1.0) * 100.0)
}
