// ✅ Data Quality Check
// Consistency checks for a loaded registrations file. Issues are reported,
// never fatal: a hand-edited or real-world file still loads.

use crate::catalog::VehicleCatalog;
use crate::generator::MIN_REGISTRATIONS;
use crate::record::{Dataset, Quarter, RegistrationRecord};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    /// 0-based row index within the dataset
    pub row: usize,
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    pub rows_checked: usize,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows checked, {} issues ({} errors, {} warnings)",
            self.rows_checked,
            self.issues.len(),
            self.count(Severity::Error),
            self.count(Severity::Warning)
        )
    }
}

pub fn check_dataset(dataset: &Dataset, catalog: &VehicleCatalog) -> QualityReport {
    let mut report = QualityReport {
        rows_checked: dataset.len(),
        issues: Vec::new(),
    };

    for (row, record) in dataset.iter().enumerate() {
        check_record(row, record, catalog, &mut report.issues);
    }

    report
}

fn check_record(
    row: usize,
    record: &RegistrationRecord,
    catalog: &VehicleCatalog,
    issues: &mut Vec<QualityIssue>,
) {
    let mut push = |field: &str, message: String, severity: Severity| {
        issues.push(QualityIssue {
            row,
            field: field.to_string(),
            message,
            severity,
        });
    };

    if record.year != record.date.year() {
        push(
            "year",
            format!("year {} does not match date {}", record.year, record.date),
            Severity::Error,
        );
    }

    if record.month != record.date.month() {
        push(
            "month",
            format!("month {} does not match date {}", record.month, record.date),
            Severity::Error,
        );
    }

    let expected = Quarter::from_month(record.month);
    if !(1..=12).contains(&record.month) || record.quarter != expected {
        push(
            "quarter",
            format!("quarter {} inconsistent with month {}", record.quarter, record.month),
            Severity::Error,
        );
    }

    if !catalog.contains(&record.category, &record.manufacturer) {
        push(
            "manufacturer",
            format!("{} is not a known {} manufacturer", record.manufacturer, record.category),
            Severity::Warning,
        );
    }

    if record.registrations < MIN_REGISTRATIONS {
        push(
            "registrations",
            format!("{} below synthetic floor {}", record.registrations, MIN_REGISTRATIONS),
            Severity::Info,
        );
    }
}

/// Log a report through tracing, one event per issue up to `limit`
pub fn log_report(report: &QualityReport, limit: usize) {
    if report.is_clean() {
        tracing::debug!(rows = report.rows_checked, "data quality check passed");
        return;
    }

    tracing::warn!("data quality: {}", report.summary());
    for issue in report.issues.iter().take(limit) {
        match issue.severity {
            Severity::Error | Severity::Warning => {
                tracing::warn!(row = issue.row, field = %issue.field, "{}", issue.message)
            }
            Severity::Info => {
                tracing::debug!(row = issue.row, field = %issue.field, "{}", issue.message)
            }
        }
    }
}
