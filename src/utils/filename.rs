use chrono::{Datelike, Local};
use std::path::{Path, PathBuf};

/// Default export filename: output/{source-stem}-enriched-{YYMMDD}.parquet
pub fn generate_default_export_filename(source: &Path) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("trips");

    let filename = format!(
        "{}-enriched-{:02}{:02}{:02}.parquet",
        stem,
        year,
        now.month(),
        now.day()
    );
    PathBuf::from("output").join(filename)
}
