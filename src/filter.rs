// 🔍 Filter Engine
// Date range AND category membership AND manufacturer membership

use crate::record::{Dataset, RegistrationRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// What the user currently has selected in the dashboard widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub date_range: DateRange,
    pub categories: BTreeSet<String>,
    pub manufacturers: BTreeSet<String>,
    #[serde(default)]
    pub show_raw: bool,
}

impl FilterSelection {
    pub fn new(
        date_range: DateRange,
        categories: impl IntoIterator<Item = impl Into<String>>,
        manufacturers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        FilterSelection {
            date_range,
            categories: categories.into_iter().map(Into::into).collect(),
            manufacturers: manufacturers.into_iter().map(Into::into).collect(),
            show_raw: false,
        }
    }

    /// Initial widget state: full date bounds, every category and
    /// manufacturer selected. None for an empty dataset.
    pub fn everything(dataset: &Dataset) -> Option<Self> {
        let (start, end) = dataset.date_bounds()?;
        Some(FilterSelection::new(
            DateRange::new(start, end),
            dataset.categories(),
            dataset.manufacturers(),
        ))
    }

    /// Builder pattern: toggle raw rows in the view
    pub fn with_raw(mut self, show_raw: bool) -> Self {
        self.show_raw = show_raw;
        self
    }

    pub fn matches(&self, record: &RegistrationRecord) -> bool {
        self.date_range.contains(record.date)
            && self.categories.contains(&record.category)
            && self.manufacturers.contains(&record.manufacturer)
    }

    /// Add the value if absent, remove it if present
    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_manufacturer(&mut self, manufacturer: &str) {
        toggle(&mut self.manufacturers, manufacturer);
    }

    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        filter(dataset, self)
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

/// Rows of `dataset` matching every predicate of `selection`, in input order.
///
/// An empty category or manufacturer set selects nothing.
pub fn filter(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    dataset
        .iter()
        .filter(|record| selection.matches(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(vec![
            RegistrationRecord::new(date(2021, 12, 31), "2W", "Hero", 3000),
            RegistrationRecord::new(date(2022, 1, 31), "2W", "Hero", 3100),
            RegistrationRecord::new(date(2022, 1, 31), "3W", "Bajaj", 1200),
            RegistrationRecord::new(date(2022, 1, 31), "4W", "Tata", 2200),
            RegistrationRecord::new(date(2022, 2, 28), "2W", "Bajaj", 2700),
            RegistrationRecord::new(date(2022, 3, 31), "4W", "Maruti", 4100),
        ])
    }

    fn full_range() -> DateRange {
        DateRange::new(date(2021, 1, 1), date(2022, 12, 31))
    }

    #[test]
    fn test_everything_selects_all_rows() {
        let dataset = sample_dataset();
        let selection = FilterSelection::everything(&dataset).unwrap();

        assert_eq!(selection.date_range, DateRange::new(date(2021, 12, 31), date(2022, 3, 31)));
        assert_eq!(selection.apply(&dataset), dataset);
        assert!(FilterSelection::everything(&Dataset::default()).is_none());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let dataset = sample_dataset();
        let selection = FilterSelection::new(
            DateRange::new(date(2022, 1, 31), date(2022, 2, 28)),
            ["2W", "3W", "4W"],
            ["Hero", "Bajaj", "Tata", "Maruti"],
        );

        let result = filter(&dataset, &selection);
        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|r| r.date >= date(2022, 1, 31) && r.date <= date(2022, 2, 28)));
    }

    #[test]
    fn test_conjunction_of_predicates() {
        let dataset = sample_dataset();
        // Bajaj is selected but only under 2W
        let selection = FilterSelection::new(full_range(), ["2W"], ["Bajaj"]);

        let result = filter(&dataset, &selection);
        assert_eq!(result.len(), 1);
        assert_eq!(result.records()[0].registrations, 2700);
    }

    #[test]
    fn test_preserves_input_order() {
        let dataset = sample_dataset();
        let selection = FilterSelection::new(full_range(), ["2W", "4W"], ["Hero", "Tata", "Maruti"]);

        let values: Vec<u64> = filter(&dataset, &selection).iter().map(|r| r.registrations).collect();
        assert_eq!(values, vec![3000, 3100, 2200, 4100]);
    }

    #[test]
    fn test_empty_manufacturers_yield_empty_result() {
        let dataset = sample_dataset();
        let selection = FilterSelection::new(full_range(), ["2W", "3W", "4W"], Vec::<String>::new());

        assert!(filter(&dataset, &selection).is_empty());
    }

    #[test]
    fn test_empty_categories_yield_empty_result() {
        let dataset = sample_dataset();
        let selection = FilterSelection::new(full_range(), Vec::<String>::new(), ["Hero", "Bajaj"]);

        assert!(filter(&dataset, &selection).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dataset = sample_dataset();
        let selection = FilterSelection::new(
            DateRange::new(date(2022, 1, 1), date(2022, 12, 31)),
            ["2W", "4W"],
            ["Hero", "Bajaj", "Maruti"],
        );

        let once = filter(&dataset, &selection);
        let twice = filter(&once, &selection);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_does_not_touch_input() {
        let dataset = sample_dataset();
        let before = dataset.clone();
        let selection = FilterSelection::new(full_range(), ["3W"], ["Bajaj"]);

        let _ = filter(&dataset, &selection);
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_toggle_selection() {
        let mut selection = FilterSelection::new(full_range(), ["2W", "3W"], ["Hero"]);

        selection.toggle_category("3W");
        selection.toggle_manufacturer("Bajaj");
        assert!(!selection.categories.contains("3W"));
        assert!(selection.manufacturers.contains("Bajaj"));

        selection.toggle_category("3W");
        assert!(selection.categories.contains("3W"));
    }
}
