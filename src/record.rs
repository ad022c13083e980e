// 🚗 Registration Records
// One row = total registrations for a (month, category, manufacturer)

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// QUARTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Quarter for a calendar month (1-12). Months outside that range clamp
    /// to the nearest quarter.
    pub fn from_month(month: u32) -> Self {
        match month {
            0..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// REGISTRATION RECORD
// ============================================================================

/// Column order matches the persisted CSV header:
/// `date,year,quarter,month,category,manufacturer,registrations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub quarter: Quarter,
    pub month: u32,
    pub category: String,
    pub manufacturer: String,
    pub registrations: u64,
}

impl RegistrationRecord {
    /// Build a record, deriving year/quarter/month from the date
    pub fn new(date: NaiveDate, category: &str, manufacturer: &str, registrations: u64) -> Self {
        RegistrationRecord {
            date,
            year: date.year(),
            quarter: Quarter::from_month(date.month()),
            month: date.month(),
            category: category.to_string(),
            manufacturer: manufacturer.to_string(),
            registrations,
        }
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// An immutable, ordered collection of records.
///
/// There is no mutable access to the rows: filters and aggregations always
/// produce new values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<RegistrationRecord>,
}

impl Dataset {
    pub fn new(records: Vec<RegistrationRecord>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[RegistrationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RegistrationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.category.as_str()))
    }

    /// Distinct manufacturers in first-seen order
    pub fn manufacturers(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.manufacturer.as_str()))
    }

    /// (earliest, latest) record date, None when empty
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    pub fn into_records(self) -> Vec<RegistrationRecord> {
        self.records
    }
}

impl FromIterator<RegistrationRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = RegistrationRecord>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a RegistrationRecord;
    type IntoIter = std::slice::Iter<'a, RegistrationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    for value in values {
        if seen.insert(value) {
            ordered.push(value.to_string());
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_from_month() {
        let expected = [
            (1, Quarter::Q1), (3, Quarter::Q1),
            (4, Quarter::Q2), (6, Quarter::Q2),
            (7, Quarter::Q3), (9, Quarter::Q3),
            (10, Quarter::Q4), (12, Quarter::Q4),
        ];

        for (month, quarter) in expected {
            assert_eq!(Quarter::from_month(month), quarter, "month {}", month);
            assert_eq!(quarter.label(), format!("Q{}", (month - 1) / 3 + 1));
        }
    }

    #[test]
    fn test_record_derives_calendar_fields() {
        let record = RegistrationRecord::new(date(2021, 8, 31), "4W", "Tata", 2500);

        assert_eq!(record.year, 2021);
        assert_eq!(record.month, 8);
        assert_eq!(record.quarter, Quarter::Q3);
        assert_eq!(record.category, "4W");
        assert_eq!(record.manufacturer, "Tata");
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let dataset = Dataset::new(vec![
            RegistrationRecord::new(date(2022, 1, 31), "3W", "Bajaj", 1200),
            RegistrationRecord::new(date(2022, 1, 31), "2W", "Hero", 3000),
            RegistrationRecord::new(date(2022, 1, 31), "2W", "Bajaj", 1800),
            RegistrationRecord::new(date(2022, 2, 28), "3W", "Piaggio", 1100),
        ]);

        assert_eq!(dataset.categories(), vec!["3W", "2W"]);
        assert_eq!(dataset.manufacturers(), vec!["Bajaj", "Hero", "Piaggio"]);
        assert_eq!(
            dataset.date_bounds(),
            Some((date(2022, 1, 31), date(2022, 2, 28)))
        );
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let dataset = Dataset::default();

        assert!(dataset.is_empty());
        assert_eq!(dataset.date_bounds(), None);
        assert!(dataset.categories().is_empty());
    }
}
