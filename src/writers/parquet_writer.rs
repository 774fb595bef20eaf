use crate::error::{PipelineError, Result};
use crate::models::{CalendarFields, Dataset, EnrichedRide, EnrichedTrip};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampSecondArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Writes enriched datasets to Parquet, raw columns first, derived columns
/// after them.
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(PipelineError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    pub fn write_rides(&self, dataset: &Dataset<EnrichedRide>, path: &Path) -> Result<()> {
        let schema = Arc::new(Schema::new(
            [
                vec![
                    Field::new("timestamp", DataType::Timestamp(TimeUnit::Second, None), false),
                    Field::new("lat", DataType::Float64, true),
                    Field::new("lon", DataType::Float64, true),
                    Field::new("base", DataType::Utf8, true),
                ],
                calendar_fields(""),
            ]
            .concat(),
        ));

        self.write_batches(dataset.records(), schema, path, |rides, schema| {
            let mut columns: Vec<ArrayRef> = vec![
                Arc::new(timestamps(rides.iter().map(|r| &r.ride.timestamp))),
                Arc::new(Float64Array::from(
                    rides.iter().map(|r| r.ride.latitude).collect::<Vec<_>>(),
                )),
                Arc::new(Float64Array::from(
                    rides.iter().map(|r| r.ride.longitude).collect::<Vec<_>>(),
                )),
                Arc::new(StringArray::from(
                    rides.iter().map(|r| r.ride.base.as_deref()).collect::<Vec<_>>(),
                )),
            ];
            columns.extend(calendar_columns(rides.iter().map(|r| &r.calendar)));
            Ok(RecordBatch::try_new(schema, columns)?)
        })
    }

    pub fn write_trips(&self, dataset: &Dataset<EnrichedTrip>, path: &Path) -> Result<()> {
        let schema = Arc::new(Schema::new(
            [
                vec![
                    Field::new(
                        "pickup_datetime",
                        DataType::Timestamp(TimeUnit::Second, None),
                        false,
                    ),
                    Field::new(
                        "dropoff_datetime",
                        DataType::Timestamp(TimeUnit::Second, None),
                        false,
                    ),
                    Field::new("trip_distance", DataType::Float64, false),
                ],
                calendar_fields("_pickup"),
                calendar_fields("_dropoff"),
                vec![
                    Field::new("trip_duration", DataType::Float64, false),
                    Field::new("average_speed", DataType::Float64, false),
                ],
            ]
            .concat(),
        ));

        self.write_batches(dataset.records(), schema, path, |trips, schema| {
            let mut columns: Vec<ArrayRef> = vec![
                Arc::new(timestamps(trips.iter().map(|t| &t.trip.pickup))),
                Arc::new(timestamps(trips.iter().map(|t| &t.trip.dropoff))),
                Arc::new(Float64Array::from(
                    trips.iter().map(|t| t.trip.trip_distance).collect::<Vec<_>>(),
                )),
            ];
            columns.extend(calendar_columns(trips.iter().map(|t| &t.pickup)));
            columns.extend(calendar_columns(trips.iter().map(|t| &t.dropoff)));
            columns.push(Arc::new(Float64Array::from(
                trips.iter().map(|t| t.trip_duration).collect::<Vec<_>>(),
            )));
            columns.push(Arc::new(Float64Array::from(
                trips.iter().map(|t| t.average_speed).collect::<Vec<_>>(),
            )));
            Ok(RecordBatch::try_new(schema, columns)?)
        })
    }

    /// Write `records` one row group at a time
    fn write_batches<T>(
        &self,
        records: &[T],
        schema: Arc<Schema>,
        path: &Path,
        to_batch: impl Fn(&[T], Arc<Schema>) -> Result<RecordBatch>,
    ) -> Result<()> {
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in records.chunks(self.row_group_size) {
            let batch = to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        tracing::info!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let columns = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        Ok(ParquetFileInfo {
            total_rows: file_metadata.num_rows(),
            row_groups: metadata.num_row_groups(),
            columns,
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn calendar_fields(suffix: &str) -> Vec<Field> {
    ["day", "weekday", "hour", "minute"]
        .iter()
        .map(|name| Field::new(format!("{}{}", name, suffix), DataType::UInt32, false))
        .collect()
}

fn calendar_columns<'a>(fields: impl Iterator<Item = &'a CalendarFields> + Clone) -> Vec<ArrayRef> {
    let column = |get: fn(&CalendarFields) -> u32| -> ArrayRef {
        Arc::new(UInt32Array::from(fields.clone().map(get).collect::<Vec<_>>()))
    };
    vec![
        column(|c| c.day),
        column(|c| c.weekday),
        column(|c| c.hour),
        column(|c| c.minute),
    ]
}

fn timestamps<'a>(values: impl Iterator<Item = &'a NaiveDateTime>) -> TimestampSecondArray {
    TimestampSecondArray::from(values.map(|ts| ts.and_utc().timestamp()).collect::<Vec<_>>())
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub columns: Vec<String>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Columns: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}",
            self.total_rows,
            self.columns.len(),
            self.row_groups,
            self.file_size as f64 / 1_048_576.0, // Convert to MB
            self.compression,
        )
    }
}
