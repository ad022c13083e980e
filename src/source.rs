// 📂 Data Source
// CSV file -> Dataset, with a synthetic fallback persisted to the same path,
// and a compute-once cache owned by the composition root.

use crate::error::{DashboardError, Result};
use crate::generator::SyntheticGenerator;
use crate::record::{Dataset, RegistrationRecord};
use once_cell::sync::OnceCell;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ============================================================================
// CSV FORMAT
// ============================================================================

/// Header written (and expected) by the persisted file
pub const CSV_HEADER: [&str; 7] = [
    "date",
    "year",
    "quarter",
    "month",
    "category",
    "manufacturer",
    "registrations",
];

/// Read a registrations table. The header must match `CSV_HEADER` exactly;
/// an empty file has no header and is rejected too.
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let mut rdr = csv::Reader::from_path(path)?;

    // deserialize() drops header errors, so read them here first
    let headers = rdr.headers()?;
    if headers.is_empty() {
        return Err(DashboardError::Format("file has no header".to_string()));
    }
    if !headers.iter().eq(CSV_HEADER) {
        return Err(DashboardError::Format(format!(
            "unexpected header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: RegistrationRecord = result?;
        records.push(record);
    }

    Ok(Dataset::new(records))
}

/// Write to a sibling `.tmp` file, then rename it over `path`, so an
/// interrupted write never leaves a truncated table behind.
pub fn write_csv(path: &Path, dataset: &Dataset) -> Result<()> {
    let tmp_path = temp_path(path);

    if let Err(err) = write_records(&tmp_path, dataset) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn write_records(path: &Path, dataset: &Dataset) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    // serialize() only emits a header once it sees a record
    if dataset.is_empty() {
        wtr.write_record(CSV_HEADER)?;
    }
    for record in dataset {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

// ============================================================================
// LOAD OUTCOME
// ============================================================================

/// Result of the first step: reading the file
#[derive(Debug)]
pub enum LoadAttempt {
    /// File read and parsed
    Loaded(Dataset),
    /// File does not exist
    Missing,
    /// File exists but is not a valid registrations table
    Unparseable(String),
}

/// Tagged result of `DataSource::load`. Failure is the `Err` side
/// (`DashboardError::DataUnavailable`).
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Dataset),
    Generated(Dataset),
}

impl LoadOutcome {
    pub fn dataset(&self) -> &Dataset {
        match self {
            LoadOutcome::Loaded(d) | LoadOutcome::Generated(d) => d,
        }
    }

    pub fn into_dataset(self) -> Dataset {
        match self {
            LoadOutcome::Loaded(d) | LoadOutcome::Generated(d) => d,
        }
    }

    pub fn was_generated(&self) -> bool {
        matches!(self, LoadOutcome::Generated(_))
    }
}

// ============================================================================
// DATA SOURCE
// ============================================================================

#[derive(Debug, Clone)]
pub struct DataSource {
    path: PathBuf,
    generator: SyntheticGenerator,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>, generator: SyntheticGenerator) -> Self {
        DataSource {
            path: path.into(),
            generator,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Step one: try to read the file.
    ///
    /// Only a missing file or unparseable content are reported as a
    /// `LoadAttempt`; every other I/O failure is an error.
    pub fn try_load(&self) -> Result<LoadAttempt> {
        match read_csv(&self.path) {
            Ok(dataset) => Ok(LoadAttempt::Loaded(dataset)),
            Err(DashboardError::Csv(err)) => classify_csv_error(err),
            Err(DashboardError::Format(reason)) => Ok(LoadAttempt::Unparseable(reason)),
            Err(DashboardError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(LoadAttempt::Missing)
            }
            Err(err) => Err(err),
        }
    }

    /// Step two: generate a fresh dataset and persist it
    pub fn generate_and_persist(&self) -> Result<Dataset> {
        let dataset = self.generator.generate();
        write_csv(&self.path, &dataset)?;

        tracing::info!(
            path = %self.path.display(),
            rows = dataset.len(),
            "persisted synthetic dataset"
        );

        Ok(dataset)
    }

    /// Load the file, falling back to generate + persist when it is missing
    /// or unparseable. Any other failure is `DataUnavailable`.
    pub fn load(&self) -> Result<LoadOutcome> {
        let attempt = self
            .try_load()
            .map_err(|e| DashboardError::unavailable(&self.path, e))?;

        match attempt {
            LoadAttempt::Loaded(dataset) => {
                tracing::info!(
                    path = %self.path.display(),
                    rows = dataset.len(),
                    "loaded registrations"
                );
                Ok(LoadOutcome::Loaded(dataset))
            }
            LoadAttempt::Missing => {
                tracing::info!(path = %self.path.display(), "data file not found, generating");
                self.generate_fallback()
            }
            LoadAttempt::Unparseable(reason) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "data file unparseable, regenerating"
                );
                self.generate_fallback()
            }
        }
    }

    fn generate_fallback(&self) -> Result<LoadOutcome> {
        self.generate_and_persist()
            .map(LoadOutcome::Generated)
            .map_err(|e| DashboardError::unavailable(&self.path, e))
    }
}

fn classify_csv_error(err: csv::Error) -> Result<LoadAttempt> {
    if let csv::ErrorKind::Io(io_err) = err.kind() {
        if io_err.kind() == io::ErrorKind::NotFound {
            return Ok(LoadAttempt::Missing);
        }
        return Err(DashboardError::Csv(err));
    }

    let reason = match err.position() {
        Some(pos) => format!("line {}: {}", pos.line(), err),
        None => err.to_string(),
    };
    Ok(LoadAttempt::Unparseable(reason))
}

// ============================================================================
// DATASET CACHE
// ============================================================================

/// Compute-once holder for the full dataset.
///
/// Concurrent first callers block on the same initialization, so the file is
/// read (or generated and written) exactly once. A failed load leaves the
/// cache empty and the error goes to the caller.
#[derive(Debug, Default)]
pub struct DatasetCache {
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&self, source: &DataSource) -> Result<Arc<Dataset>> {
        self.cell
            .get_or_try_init(|| source.load().map(|outcome| Arc::new(outcome.into_dataset())))
            .cloned()
    }

    /// Cached dataset, if already loaded
    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.cell.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
