use chrono::{DateTime, NaiveDateTime};

use crate::utils::constants::TIMESTAMP_FORMATS;

/// Locale-independent timestamp parsing.
///
/// Without an explicit format the layouts in [`TIMESTAMP_FORMATS`] are tried
/// in order, then RFC 3339. Offsets are dropped, keeping the wall-clock time
/// as written.
#[derive(Debug, Clone, Default)]
pub struct TimestampParser {
    format: Option<String>,
}

impl TimestampParser {
    pub fn new() -> Self {
        Self { format: None }
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        if let Some(ref format) = self.format {
            return NaiveDateTime::parse_from_str(value, format).ok();
        }

        TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
    }
}
