/// Default column names of the ride-hailing source
pub const RIDE_TIMESTAMP_COLUMN: &str = "Date/Time";
pub const RIDE_LATITUDE_COLUMN: &str = "Lat";
pub const RIDE_LONGITUDE_COLUMN: &str = "Lon";
pub const RIDE_BASE_COLUMN: &str = "Base";

/// Default column names of the taxi-trip source
pub const TRIP_PICKUP_COLUMN: &str = "tpep_pickup_datetime";
pub const TRIP_DROPOFF_COLUMN: &str = "tpep_dropoff_datetime";
pub const TRIP_DISTANCE_COLUMN: &str = "trip_distance";

/// Default source files
pub const DEFAULT_RIDES_FILE: &str = "uber-raw-data-apr14.csv";
pub const DEFAULT_TRIPS_FILE: &str = "ny-trips-data.csv";
pub const DEFAULT_CONFIG_FILE: &str = "trip-insights";
pub const ENV_PREFIX: &str = "TRIP_INSIGHTS";

/// Processing defaults
pub const DEFAULT_DELIMITER: char = ',';
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_HEAD_ROWS: usize = 5;

/// Timestamp layouts accepted when no explicit format is configured
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Dashboard defaults
pub const DEFAULT_START_DAY: u32 = 4;
pub const DEFAULT_END_DAY: u32 = 30;
pub const DEFAULT_BREAKDOWN_DAY: u32 = 4;
pub const DEFAULT_HOUR_START: u32 = 8;
pub const DEFAULT_HOUR_END: u32 = 22;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
