use crate::error::{PipelineError, Result};
use crate::models::{Dataset, RideRecord, TaxiTrip};
use crate::readers::timestamp::TimestampParser;
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, DEFAULT_DELIMITER, RIDE_BASE_COLUMN, RIDE_LATITUDE_COLUMN,
    RIDE_LONGITUDE_COLUMN, RIDE_TIMESTAMP_COLUMN, TRIP_DISTANCE_COLUMN, TRIP_DROPOFF_COLUMN,
    TRIP_PICKUP_COLUMN,
};
use crate::utils::coordinates::parse_coordinate;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Source column names for both dataset layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub ride_timestamp: String,
    pub ride_latitude: String,
    pub ride_longitude: String,
    pub ride_base: String,
    pub trip_pickup: String,
    pub trip_dropoff: String,
    pub trip_distance: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            ride_timestamp: RIDE_TIMESTAMP_COLUMN.to_string(),
            ride_latitude: RIDE_LATITUDE_COLUMN.to_string(),
            ride_longitude: RIDE_LONGITUDE_COLUMN.to_string(),
            ride_base: RIDE_BASE_COLUMN.to_string(),
            trip_pickup: TRIP_PICKUP_COLUMN.to_string(),
            trip_dropoff: TRIP_DROPOFF_COLUMN.to_string(),
            trip_distance: TRIP_DISTANCE_COLUMN.to_string(),
        }
    }
}

/// Reads delimited ride and taxi-trip files into raw records.
///
/// Loading is all-or-nothing: the first malformed row aborts the read with a
/// parse error naming its line.
#[derive(Debug, Clone)]
pub struct TripReader {
    delimiter: u8,
    columns: ColumnMapping,
    timestamps: TimestampParser,
    use_mmap: bool,
}

impl TripReader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
            columns: ColumnMapping::default(),
            timestamps: TimestampParser::new(),
            use_mmap: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        self.delimiter = delimiter_byte(delimiter)?;
        Ok(self)
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_timestamp_format(mut self, format: Option<String>) -> Self {
        self.timestamps = match format {
            Some(format) => TimestampParser::with_format(format),
            None => TimestampParser::new(),
        };
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter as char
    }

    /// Read a single-timestamp ride file
    pub fn read_rides(&self, path: &Path) -> Result<Dataset<RideRecord>> {
        tracing::debug!("Reading rides from {}", path.display());
        self.with_source(path, |reader| self.read_rides_from(reader))
    }

    /// Read a dual-timestamp taxi-trip file
    pub fn read_taxi_trips(&self, path: &Path) -> Result<Dataset<TaxiTrip>> {
        tracing::debug!("Reading taxi trips from {}", path.display());
        self.with_source(path, |reader| self.read_taxi_trips_from(reader))
    }

    pub fn read_rides_from<R: Read>(&self, reader: R) -> Result<Dataset<RideRecord>> {
        let mut csv_reader = self.csv_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let timestamp_idx = required_column(&headers, &self.columns.ride_timestamp)?;
        let latitude_idx = optional_column(&headers, &self.columns.ride_latitude);
        let longitude_idx = optional_column(&headers, &self.columns.ride_longitude);
        let base_idx = optional_column(&headers, &self.columns.ride_base);

        let mut rides = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let line = line_of(&row);

            let mut ride = RideRecord::new(self.parse_timestamp(&row, timestamp_idx, line)?);
            ride.latitude = parse_optional_coordinate(&row, latitude_idx, line)?;
            ride.longitude = parse_optional_coordinate(&row, longitude_idx, line)?;
            ride.base = base_idx
                .and_then(|idx| row.get(idx))
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            rides.push(ride);
        }

        Ok(Dataset::new(header_names(&headers), rides))
    }

    pub fn read_taxi_trips_from<R: Read>(&self, reader: R) -> Result<Dataset<TaxiTrip>> {
        let mut csv_reader = self.csv_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let pickup_idx = required_column(&headers, &self.columns.trip_pickup)?;
        let dropoff_idx = required_column(&headers, &self.columns.trip_dropoff)?;
        let distance_idx = required_column(&headers, &self.columns.trip_distance)?;

        let mut trips = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let line = line_of(&row);

            let pickup = self.parse_timestamp(&row, pickup_idx, line)?;
            let dropoff = self.parse_timestamp(&row, dropoff_idx, line)?;
            let distance_str = row.get(distance_idx).unwrap_or("");
            let trip_distance = distance_str.parse::<f64>().map_err(|_| {
                PipelineError::parse(line, format!("Invalid trip distance: '{}'", distance_str))
            })?;

            trips.push(TaxiTrip::new(pickup, dropoff, trip_distance));
        }

        Ok(Dataset::new(header_names(&headers), trips))
    }

    fn with_source<T>(
        &self,
        path: &Path,
        read: impl FnOnce(&mut dyn Read) -> Result<T>,
    ) -> Result<T> {
        let file = File::open(path)?;
        if self.use_mmap {
            let mmap = unsafe { Mmap::map(&file)? };
            let mut bytes: &[u8] = &mmap;
            read(&mut bytes)
        } else {
            let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
            read(&mut reader)
        }
    }

    fn csv_reader<R: Read>(&self, reader: R) -> csv::Reader<R> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader)
    }

    fn parse_timestamp(&self, row: &StringRecord, idx: usize, line: u64) -> Result<NaiveDateTime> {
        let value = row.get(idx).unwrap_or("");
        self.timestamps.parse(value).ok_or_else(|| {
            PipelineError::parse(line, format!("Invalid timestamp: '{}'", value))
        })
    }
}

impl Default for TripReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a caller-supplied delimiter to the single byte the CSV reader needs.
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(PipelineError::InvalidDelimiter(delimiter))
    }
}

fn required_column(headers: &StringRecord, name: &str) -> Result<usize> {
    optional_column(headers, name).ok_or_else(|| PipelineError::MissingColumn {
        column: name.to_string(),
        available: headers.iter().collect::<Vec<_>>().join(", "),
    })
}

fn optional_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn header_names(headers: &StringRecord) -> Vec<String> {
    headers.iter().map(str::to_string).collect()
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_optional_coordinate(
    row: &StringRecord,
    idx: Option<usize>,
    line: u64,
) -> Result<Option<f64>> {
    match idx.and_then(|i| row.get(i)) {
        None | Some("") => Ok(None),
        Some(value) => parse_coordinate(value)
            .map(Some)
            .ok_or_else(|| PipelineError::parse(line, format!("Invalid coordinate: '{}'", value))),
    }
}
