pub mod parquet_writer;
pub mod report_writer;

pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
pub use report_writer::{ReportFormat, ReportWriter};
