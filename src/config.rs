use crate::error::Result;
use crate::processors::Enricher;
use crate::readers::{delimiter_byte, CachedLoader, ColumnMapping, DatasetLoader, TripReader};
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_BREAKDOWN_DAY, DEFAULT_CONFIG_FILE, DEFAULT_DELIMITER,
    DEFAULT_END_DAY, DEFAULT_HOUR_END, DEFAULT_HOUR_START, DEFAULT_RIDES_FILE,
    DEFAULT_ROW_GROUP_SIZE, DEFAULT_START_DAY, DEFAULT_TRIPS_FILE, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

/// Layered settings: built-in defaults, then `trip-insights.toml` in the
/// working directory, then an explicit `--config` file, then
/// `TRIP_INSIGHTS__SECTION__KEY` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    #[validate(nested)]
    pub sources: SourceSettings,
    pub columns: ColumnMapping,
    #[validate(nested)]
    pub dashboard: DashboardSettings,
    #[validate(nested)]
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SourceSettings {
    pub rides: PathBuf,
    pub trips: PathBuf,
    #[validate(custom(function = "validate_delimiter"))]
    pub delimiter: char,
    pub timestamp_format: Option<String>,
    pub use_mmap: bool,
    #[validate(range(min = 1, max = 1024))]
    pub max_workers: usize,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            rides: PathBuf::from(DEFAULT_RIDES_FILE),
            trips: PathBuf::from(DEFAULT_TRIPS_FILE),
            delimiter: DEFAULT_DELIMITER,
            timestamp_format: None,
            use_mmap: false,
            max_workers: num_cpus::get(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_dashboard_ranges"))]
pub struct DashboardSettings {
    #[validate(range(min = 1, max = 31))]
    pub start_day: u32,
    #[validate(range(min = 1, max = 31))]
    pub end_day: u32,
    #[validate(range(min = 1, max = 31))]
    pub breakdown_day: u32,
    #[validate(range(max = 23))]
    pub hour_start: u32,
    #[validate(range(max = 23))]
    pub hour_end: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            start_day: DEFAULT_START_DAY,
            end_day: DEFAULT_END_DAY,
            breakdown_day: DEFAULT_BREAKDOWN_DAY,
            hour_start: DEFAULT_HOUR_START,
            hour_end: DEFAULT_HOUR_END,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExportSettings {
    pub compression: String,
    #[validate(range(min = 1))]
    pub row_group_size: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            compression: COMPRESSION_SNAPPY.to_string(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub verbose: bool,
    pub file: Option<PathBuf>,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn reader(&self) -> Result<TripReader> {
        Ok(TripReader::new()
            .with_delimiter(self.sources.delimiter)?
            .with_columns(self.columns.clone())
            .with_timestamp_format(self.sources.timestamp_format.clone())
            .with_mmap(self.sources.use_mmap))
    }

    pub fn loader(&self) -> Result<CachedLoader> {
        Ok(CachedLoader::new(DatasetLoader::new(
            self.reader()?,
            Enricher::new(self.sources.max_workers),
        )))
    }
}

fn validate_delimiter(delimiter: &char) -> std::result::Result<(), ValidationError> {
    delimiter_byte(*delimiter)
        .map(|_| ())
        .map_err(|_| ValidationError::new("delimiter_not_ascii"))
}

fn validate_dashboard_ranges(
    dashboard: &DashboardSettings,
) -> std::result::Result<(), ValidationError> {
    if dashboard.start_day > dashboard.end_day {
        return Err(ValidationError::new("start_day_after_end_day"));
    }
    if dashboard.hour_start > dashboard.hour_end {
        return Err(ValidationError::new("hour_start_after_hour_end"));
    }
    Ok(())
}
