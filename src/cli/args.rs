use crate::models::Field;
use crate::processors::RangeFilter;
use crate::utils::constants::DEFAULT_HEAD_ROWS;
use crate::writers::ReportFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trip-insights")]
#[command(about = "Enrich and aggregate ride-hailing and taxi-trip records")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file [default: ./trip-insights.toml]")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Rides,
    Trips,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the shape and first rows of an enriched dataset
    Inspect {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        kind: SourceKind,

        #[arg(short, long, help = "Field delimiter [default: from settings]")]
        delimiter: Option<char>,

        #[arg(long, default_value_t = DEFAULT_HEAD_ROWS)]
        head: usize,

        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// Count records per group key
    Count {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        kind: SourceKind,

        #[arg(short, long, help = "Field delimiter [default: from settings]")]
        delimiter: Option<char>,

        #[arg(short, long, help = "Discrete field to group on, e.g. hour_pickup")]
        group_by: Field,

        #[arg(
            short,
            long,
            help = "Inclusive range filter FIELD=START..END or FIELD=VALUE (repeatable)"
        )]
        filter: Vec<RangeFilter>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// Average a field per group key
    Mean {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        kind: SourceKind,

        #[arg(short, long, help = "Field delimiter [default: from settings]")]
        delimiter: Option<char>,

        #[arg(short, long, help = "Discrete field to group on, e.g. hour_pickup")]
        group_by: Field,

        #[arg(long, help = "Field to average, e.g. average_speed")]
        value: Field,

        #[arg(
            short,
            long,
            help = "Inclusive range filter FIELD=START..END or FIELD=VALUE (repeatable)"
        )]
        filter: Vec<RangeFilter>,

        #[arg(long, help = "Report every key of the group field's domain")]
        dense: bool,

        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// Print the ride and taxi-trip dashboard views
    Dashboard {
        #[arg(long, help = "Ride-hailing CSV file [default: from settings]")]
        rides: Option<PathBuf>,

        #[arg(long, help = "Taxi-trip CSV file [default: from settings]")]
        trips: Option<PathBuf>,

        #[arg(long)]
        start_day: Option<u32>,

        #[arg(long)]
        end_day: Option<u32>,

        #[arg(long, help = "Day used for the per-minute breakdown")]
        day: Option<u32>,

        #[arg(long)]
        hour_start: Option<u32>,

        #[arg(long)]
        hour_end: Option<u32>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
    },

    /// Write an enriched dataset to Parquet
    Export {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, value_enum)]
        kind: SourceKind,

        #[arg(short, long, help = "Field delimiter [default: from settings]")]
        delimiter: Option<char>,

        #[arg(
            short,
            long,
            help = "Output Parquet file path [default: output/{stem}-enriched-{YYMMDD}.parquet]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, help = "snappy, gzip, lz4, zstd or none [default: from settings]")]
        compression: Option<String>,
    },
}
