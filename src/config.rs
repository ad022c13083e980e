// ⚙️ Configuration
// Every field has a default, so an empty (or absent) TOML file is valid.

use crate::catalog::VehicleCatalog;
use crate::error::{DashboardError, Result};
use crate::generator::SyntheticGenerator;
use crate::source::DataSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Registrations CSV (read, or written when generated)
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// First day of the synthetic window
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Last day of the synthetic window
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,

    /// Seed for reproducible synthetic data (None = entropy)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Pin the headline YoY year (None = latest complete year)
    #[serde(default)]
    pub headline_year: Option<i32>,

    #[serde(default)]
    pub catalog: VehicleCatalog,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("vehicle_registrations.csv")
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or(NaiveDate::MIN)
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: default_data_path(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            seed: None,
            headline_year: None,
            catalog: VehicleCatalog::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DashboardConfig =
            toml::from_str(text).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(DashboardError::Config(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    pub fn generator(&self) -> SyntheticGenerator {
        let generator =
            SyntheticGenerator::new(self.catalog.clone(), self.start_date, self.end_date);
        match self.seed {
            Some(seed) => generator.with_seed(seed),
            None => generator,
        }
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::new(&self.data_path, self.generator())
    }
}
