// Vehicle Registration Dashboard - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod error;
pub mod record;
pub mod catalog;
pub mod generator;
pub mod source;
pub mod filter;
pub mod aggregation;
pub mod quality;
pub mod config;
pub mod dashboard;

// Re-export commonly used types
pub use error::{DashboardError, Result};
pub use record::{Dataset, Quarter, RegistrationRecord};
pub use catalog::{CategoryEntry, VehicleCatalog};
pub use generator::{month_end, month_ends, SyntheticGenerator, MIN_REGISTRATIONS};
pub use source::{
    read_csv, write_csv,
    DataSource, DatasetCache, LoadAttempt, LoadOutcome,
};
pub use filter::{filter, DateRange, FilterSelection};
pub use aggregation::{
    headline_growth, latest_complete_year, latest_month, market_share, monthly_trend,
    total_registrations, year_over_year_growth, yoy_growth_for_year,
    ManufacturerShare, MonthlyPoint, YearGrowth, YearOverYear,
};
pub use quality::{check_dataset, QualityIssue, QualityReport, Severity};
pub use config::DashboardConfig;
pub use dashboard::{
    format_thousands, Dashboard, DashboardOptions, DashboardView, KeyMetrics, MetricValue,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the stderr tracing subscriber used by both binaries.
/// `RUST_LOG` overrides the default `vehicle_dashboard=info` filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vehicle_dashboard=info,vehicle_dashboard_server=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load (or generate) the dataset through `cache`, then run the quality
/// check on it. The composition root owns both the config and the cache.
pub fn open_dashboard(config: &DashboardConfig, cache: &DatasetCache) -> Result<Dashboard> {
    let dataset = cache.get_or_load(&config.data_source())?;

    let report = check_dataset(&dataset, &config.catalog);
    quality::log_report(&report, 10);

    Ok(Dashboard::new(dataset).with_headline_year(config.headline_year))
}
