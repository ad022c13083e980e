// 🖥️ Dashboard
// The boundary handed to presentation adapters: widget options in,
// metrics + chart tables out, recomputed for every selection.

use crate::aggregation::{
    headline_growth, latest_month, market_share, monthly_trend, total_registrations,
    year_over_year_growth, ManufacturerShare, MonthlyPoint, YearGrowth, YearOverYear,
};
use crate::error::Result;
use crate::filter::{DateRange, FilterSelection};
use crate::record::{Dataset, RegistrationRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// METRICS
// ============================================================================

/// A metric that may have no defined value for the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetricValue<T> {
    Available { value: T },
    NoData { reason: String },
}

impl<T> MetricValue<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            MetricValue::Available { value } => Some(value),
            MetricValue::NoData { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MetricValue::Available { .. })
    }

    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => MetricValue::Available { value },
            Err(e) => MetricValue::NoData { reason: e.to_string() },
        }
    }

    fn from_option(option: Option<T>, reason: &str) -> Self {
        match option {
            Some(value) => MetricValue::Available { value },
            None => MetricValue::NoData { reason: reason.to_string() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub total_registrations: u64,
    pub yoy_growth: MetricValue<YearOverYear>,
    pub latest_month: MetricValue<NaiveDate>,
}

impl KeyMetrics {
    pub fn compute(filtered: &Dataset, headline_year: Option<i32>) -> Self {
        KeyMetrics {
            total_registrations: total_registrations(filtered),
            yoy_growth: MetricValue::from_result(headline_growth(filtered, headline_year)),
            latest_month: MetricValue::from_option(latest_month(filtered), "empty selection"),
        }
    }

    /// "1,234,567"
    pub fn total_display(&self) -> String {
        format_thousands(self.total_registrations)
    }

    /// "YoY Growth (2023)" / "12.3%", or "YoY Growth" / "No data"
    pub fn yoy_display(&self) -> (String, String) {
        match self.yoy_growth.value() {
            Some(yoy) => (
                format!("YoY Growth ({})", yoy.year),
                format!("{:.1}%", yoy.growth_pct),
            ),
            None => ("YoY Growth".to_string(), "No data".to_string()),
        }
    }

    /// "December 2023", or "No data"
    pub fn latest_display(&self) -> String {
        match self.latest_month.value() {
            Some(date) => date.format("%B %Y").to_string(),
            None => "No data".to_string(),
        }
    }
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

// ============================================================================
// VIEW
// ============================================================================

/// Choices for the selection widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOptions {
    pub categories: Vec<String>,
    pub manufacturers: Vec<String>,
    pub date_bounds: Option<DateRange>,
    pub total_rows: usize,
}

/// Everything the presentation layer renders for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub row_count: usize,
    pub metrics: KeyMetrics,
    pub yoy_growth: Vec<YearGrowth>,
    pub market_share: Vec<ManufacturerShare>,
    pub monthly_trend: Vec<MonthlyPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_rows: Option<Vec<RegistrationRecord>>,
}

pub struct Dashboard {
    dataset: Arc<Dataset>,
    headline_year: Option<i32>,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Dashboard {
            dataset,
            headline_year: None,
        }
    }

    /// Builder pattern: pin the headline YoY year
    pub fn with_headline_year(mut self, year: Option<i32>) -> Self {
        self.headline_year = year;
        self
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn options(&self) -> DashboardOptions {
        DashboardOptions {
            categories: self.dataset.categories(),
            manufacturers: self.dataset.manufacturers(),
            date_bounds: self
                .dataset
                .date_bounds()
                .map(|(start, end)| DateRange::new(start, end)),
            total_rows: self.dataset.len(),
        }
    }

    /// Selection with everything chosen; an empty range on an empty dataset
    pub fn default_selection(&self) -> FilterSelection {
        FilterSelection::everything(&self.dataset).unwrap_or_else(|| {
            let today = chrono::Local::now().date_naive();
            FilterSelection::new(
                DateRange::new(today, today),
                Vec::<String>::new(),
                Vec::<String>::new(),
            )
        })
    }

    pub fn view(&self, selection: &FilterSelection) -> DashboardView {
        let filtered = selection.apply(&self.dataset);

        tracing::debug!(
            rows = filtered.len(),
            categories = selection.categories.len(),
            manufacturers = selection.manufacturers.len(),
            "recomputed dashboard view"
        );

        DashboardView {
            selection: selection.clone(),
            row_count: filtered.len(),
            metrics: KeyMetrics::compute(&filtered, self.headline_year),
            yoy_growth: year_over_year_growth(&filtered),
            market_share: market_share(&filtered),
            monthly_trend: monthly_trend(&filtered),
            raw_rows: selection.show_raw.then(|| filtered.into_records()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VehicleCatalog;
    use crate::generator::SyntheticGenerator;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard() -> Dashboard {
        let dataset = SyntheticGenerator::new(
            VehicleCatalog::with_defaults(),
            date(2019, 1, 1),
            date(2023, 12, 31),
        )
        .with_seed(1)
        .generate();
        Dashboard::new(Arc::new(dataset))
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_options_list_widget_choices() {
        let options = dashboard().options();

        assert_eq!(options.categories, vec!["2W", "3W", "4W"]);
        // Shared manufacturers appear once, in first-seen order
        assert_eq!(options.manufacturers.len(), 12);
        assert_eq!(options.manufacturers[0], "Hero");
        assert_eq!(
            options.date_bounds,
            Some(DateRange::new(date(2019, 1, 31), date(2023, 12, 31)))
        );
        assert_eq!(options.total_rows, 900);
    }

    #[test]
    fn test_default_view_covers_everything() {
        let dashboard = dashboard();
        let view = dashboard.view(&dashboard.default_selection());

        assert_eq!(view.row_count, 900);
        assert_eq!(view.yoy_growth.len(), 5);
        assert_eq!(view.monthly_trend.len(), 60 * 3);
        assert!(view.raw_rows.is_none());
        assert_eq!(view.metrics.latest_display(), "December 2023");

        let yoy = view.metrics.yoy_growth.value().unwrap();
        assert_eq!(yoy.year, 2023);
        assert_eq!(view.metrics.yoy_display().0, "YoY Growth (2023)");
    }

    #[test]
    fn test_empty_selection_renders_no_data() {
        let dashboard = dashboard();
        let mut selection = dashboard.default_selection();
        selection.manufacturers.clear();

        let view = dashboard.view(&selection);
        assert_eq!(view.row_count, 0);
        assert_eq!(view.metrics.total_registrations, 0);
        assert!(!view.metrics.latest_month.is_available());
        assert!(!view.metrics.yoy_growth.is_available());
        assert_eq!(view.metrics.yoy_display().1, "No data");
        assert_eq!(view.metrics.latest_display(), "No data");
        assert!(view.market_share.is_empty());
        assert!(view.monthly_trend.is_empty());
    }

    #[test]
    fn test_show_raw_returns_filtered_rows() {
        let dashboard = dashboard();
        let mut selection = dashboard.default_selection().with_raw(true);
        selection.categories = ["3W".to_string()].into_iter().collect();

        let view = dashboard.view(&selection);
        let raw = view.raw_rows.unwrap();
        assert_eq!(raw.len(), 60 * 4);
        assert!(raw.iter().all(|r| r.category == "3W"));
    }

    #[test]
    fn test_pinned_headline_year() {
        let dashboard = dashboard().with_headline_year(Some(2021));
        let view = dashboard.view(&dashboard.default_selection());

        assert_eq!(view.metrics.yoy_growth.value().unwrap().previous_year, 2020);
    }

    #[test]
    fn test_metric_value_json_shape() {
        let available: MetricValue<u32> = MetricValue::Available { value: 7 };
        let missing: MetricValue<u32> = MetricValue::NoData { reason: "empty".into() };

        assert_eq!(
            serde_json::to_value(&available).unwrap(),
            serde_json::json!({ "status": "available", "value": 7 })
        );
        assert_eq!(
            serde_json::to_value(&missing).unwrap(),
            serde_json::json!({ "status": "no_data", "reason": "empty" })
        );
    }
}
