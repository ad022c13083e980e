// 🎲 Synthetic Generator
// Month-end time series with trend + seasonality + noise, one row per
// (month, category, manufacturer)

use crate::catalog::VehicleCatalog;
use crate::record::{Dataset, RegistrationRecord};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::PI;

/// Year the growth trend is anchored at (growth = 0)
pub const BASE_YEAR: i32 = 2019;
/// Annual linear growth rate
pub const GROWTH_PER_YEAR: f64 = 0.15;
/// Amplitude of the monthly sine seasonality
pub const SEASONALITY_AMPLITUDE: f64 = 0.2;
/// Standard deviation of the multiplicative noise
pub const NOISE_STD_DEV: f64 = 0.1;
/// Synthetic registrations never fall below this
pub const MIN_REGISTRATIONS: u64 = 1000;
/// Base draw range is [BASE_MIN, BASE_MAX)
pub const BASE_MIN: u64 = 1000;
pub const BASE_MAX: u64 = 5000;

#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    catalog: VehicleCatalog,
    start: NaiveDate,
    end: NaiveDate,
    seed: Option<u64>,
}

impl SyntheticGenerator {
    pub fn new(catalog: VehicleCatalog, start: NaiveDate, end: NaiveDate) -> Self {
        SyntheticGenerator {
            catalog,
            start,
            end,
            seed: None,
        }
    }

    /// Builder pattern: fix the random source for reproducible output
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generate with the configured seed, or from entropy when unseeded
    pub fn generate(&self) -> Dataset {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with(&mut rng)
    }

    /// Generate from a caller-supplied random source
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Dataset {
        let dates = month_ends(self.start, self.end);
        let mut records = Vec::with_capacity(dates.len() * self.catalog.pair_count());

        for date in dates {
            for entry in self.catalog.entries() {
                for manufacturer in &entry.manufacturers {
                    let registrations = draw_registrations(rng, date);
                    records.push(RegistrationRecord::new(
                        date,
                        &entry.category,
                        manufacturer,
                        registrations,
                    ));
                }
            }
        }

        tracing::debug!(
            rows = records.len(),
            start = %self.start,
            end = %self.end,
            seeded = self.seed.is_some(),
            "generated synthetic registrations"
        );

        Dataset::new(records)
    }
}

/// Deterministic part of the model: 1 + growth + seasonality
pub fn trend_factor(date: NaiveDate) -> f64 {
    let growth = (date.year() - BASE_YEAR) as f64 * GROWTH_PER_YEAR;
    let seasonality = ((date.month() as f64 - 1.0) * PI / 6.0).sin() * SEASONALITY_AMPLITUDE;
    1.0 + growth + seasonality
}

fn draw_registrations<R: Rng + ?Sized>(rng: &mut R, date: NaiveDate) -> u64 {
    let base = rng.gen_range(BASE_MIN..BASE_MAX) as f64;
    let z: f64 = rng.sample(StandardNormal);
    let noise = z * NOISE_STD_DEV;

    let value = (base * (trend_factor(date) + noise)).round();
    if value < MIN_REGISTRATIONS as f64 {
        MIN_REGISTRATIONS
    } else {
        value as u64
    }
}

/// Last day of the given month
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Every month-end date falling inside [start, end], ascending
pub fn month_ends(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if start > end {
        return dates;
    }

    let (mut year, mut month) = (start.year(), start.month());
    while let Some(date) = month_end(year, month) {
        if date > end {
            break;
        }
        if date >= start {
            dates.push(date);
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Quarter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn default_generator() -> SyntheticGenerator {
        SyntheticGenerator::new(
            VehicleCatalog::with_defaults(),
            date(2019, 1, 1),
            date(2023, 12, 31),
        )
    }

    #[test]
    fn test_month_end_handles_february_and_december() {
        assert_eq!(month_end(2020, 2), Some(date(2020, 2, 29)));
        assert_eq!(month_end(2021, 2), Some(date(2021, 2, 28)));
        assert_eq!(month_end(2022, 12), Some(date(2022, 12, 31)));
        assert_eq!(month_end(2022, 4), Some(date(2022, 4, 30)));
    }

    #[test]
    fn test_month_ends_full_window() {
        let dates = month_ends(date(2019, 1, 1), date(2023, 12, 31));

        assert_eq!(dates.len(), 60);
        assert_eq!(dates[0], date(2019, 1, 31));
        assert_eq!(dates[59], date(2023, 12, 31));
    }

    #[test]
    fn test_month_ends_partial_bounds() {
        // Start after January's month-end, end before June's
        let dates = month_ends(date(2022, 2, 1), date(2022, 6, 15));

        assert_eq!(
            dates,
            vec![date(2022, 2, 28), date(2022, 3, 31), date(2022, 4, 30), date(2022, 5, 31)]
        );
        assert!(month_ends(date(2022, 6, 2), date(2022, 6, 20)).is_empty());
        assert!(month_ends(date(2023, 1, 1), date(2022, 1, 1)).is_empty());
    }

    #[test]
    fn test_one_row_per_month_category_manufacturer() {
        let dataset = default_generator().with_seed(7).generate();

        assert_eq!(dataset.len(), 60 * 15);

        // First month: catalog order
        let first: Vec<(&str, &str)> = dataset
            .iter()
            .take(15)
            .map(|r| (r.category.as_str(), r.manufacturer.as_str()))
            .collect();
        assert_eq!(first[0], ("2W", "Hero"));
        assert_eq!(first[4], ("2W", "Royal Enfield"));
        assert_eq!(first[5], ("3W", "Bajaj"));
        assert_eq!(first[14], ("4W", "Toyota"));
    }

    #[test]
    fn test_generated_registrations_respect_floor() {
        let dataset = default_generator().with_seed(42).generate();

        assert!(dataset.iter().all(|r| r.registrations >= MIN_REGISTRATIONS));
    }

    #[test]
    fn test_generated_manufacturers_belong_to_category() {
        let catalog = VehicleCatalog::with_defaults();
        let dataset = default_generator().with_seed(3).generate();

        for record in &dataset {
            assert!(
                catalog.contains(&record.category, &record.manufacturer),
                "{} is not a {} manufacturer",
                record.manufacturer,
                record.category
            );
        }
    }

    #[test]
    fn test_generated_quarter_matches_month() {
        let dataset = default_generator().with_seed(11).generate();

        for record in &dataset {
            assert_eq!(record.quarter.label(), format!("Q{}", (record.month - 1) / 3 + 1));
            assert_eq!(record.month, record.date.month());
            assert_eq!(record.year, record.date.year());
        }
        assert!(dataset.iter().any(|r| r.quarter == Quarter::Q4));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = default_generator().with_seed(99).generate();
        let b = default_generator().with_seed(99).generate();
        let c = default_generator().with_seed(100).generate();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_trend_factor_components() {
        // January 2019: no growth, sin(0) = 0
        assert!((trend_factor(date(2019, 1, 31)) - 1.0).abs() < 1e-12);
        // April 2021: growth 0.30, sin(pi/2) * 0.2 = 0.2
        assert!((trend_factor(date(2021, 4, 30)) - 1.5).abs() < 1e-12);
        // October 2019: sin(3pi/2) * 0.2 = -0.2
        assert!((trend_factor(date(2019, 10, 31)) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_later_years_trend_higher() {
        let dataset = default_generator().with_seed(5).generate();

        let total_for = |year: i32| -> u64 {
            dataset.iter().filter(|r| r.year == year).map(|r| r.registrations).sum()
        };

        // 60 percentage points of growth dwarfs the noise over 180 rows
        assert!(total_for(2023) > total_for(2019));
    }

    #[test]
    fn test_empty_catalog_generates_nothing() {
        let generator = SyntheticGenerator::new(
            VehicleCatalog::new(Vec::new()),
            date(2019, 1, 1),
            date(2019, 12, 31),
        );

        assert!(generator.with_seed(1).generate().is_empty());
    }
}
