use crate::models::EnrichedTrip;
use serde::Serialize;

/// Non-fatal observation about a derived value. The data is never changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQualityWarning {
    /// Zero-based record position in the dataset
    pub record: usize,
    pub kind: WarningKind,
    #[serde(serialize_with = "crate::utils::float_serde::serialize")]
    pub trip_duration: f64,
    #[serde(serialize_with = "crate::utils::float_serde::serialize")]
    pub average_speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    NegativeDuration,
    ZeroDuration,
    NonFiniteSpeed,
}

impl WarningKind {
    pub fn describe(&self) -> &'static str {
        match self {
            WarningKind::NegativeDuration => "dropoff before pickup",
            WarningKind::ZeroDuration => "zero trip duration",
            WarningKind::NonFiniteSpeed => "average speed is not finite",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QualityReport {
    pub total_records: usize,
    pub negative_durations: usize,
    pub zero_durations: usize,
    pub non_finite_speeds: usize,
    pub warnings: Vec<DataQualityWarning>,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.negative_durations + self.zero_durations + self.non_finite_speeds
    }
}

pub struct QualityChecker {
    /// Cap on individual warnings kept in the report; counts are always exact.
    max_warnings: usize,
}

impl QualityChecker {
    pub fn new() -> Self {
        Self { max_warnings: 1000 }
    }

    pub fn with_max_warnings(max_warnings: usize) -> Self {
        Self { max_warnings }
    }

    pub fn check_trips(&self, trips: &[EnrichedTrip]) -> QualityReport {
        let mut report = QualityReport {
            total_records: trips.len(),
            ..QualityReport::default()
        };

        for (index, trip) in trips.iter().enumerate() {
            if trip.trip_duration < 0.0 {
                report.negative_durations += 1;
                self.record(&mut report, index, trip, WarningKind::NegativeDuration);
            } else if trip.trip_duration == 0.0 {
                report.zero_durations += 1;
                self.record(&mut report, index, trip, WarningKind::ZeroDuration);
            }

            if !trip.average_speed.is_finite() {
                report.non_finite_speeds += 1;
                self.record(&mut report, index, trip, WarningKind::NonFiniteSpeed);
            }
        }

        if !report.is_clean() {
            tracing::warn!(
                "{} of {} trips have questionable durations or speeds (kept as-is)",
                report.warning_count(),
                report.total_records
            );
        }

        report
    }

    fn record(&self, report: &mut QualityReport, index: usize, trip: &EnrichedTrip, kind: WarningKind) {
        if report.warnings.len() < self.max_warnings {
            report.warnings.push(DataQualityWarning {
                record: index,
                kind,
                trip_duration: trip.trip_duration,
                average_speed: trip.average_speed,
            });
        }
    }

    pub fn generate_summary(&self, report: &QualityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Data Quality Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!("Negative Durations: {}\n", report.negative_durations));
        summary.push_str(&format!("Zero Durations: {}\n", report.zero_durations));
        summary.push_str(&format!("Non-finite Speeds: {}\n", report.non_finite_speeds));

        if !report.warnings.is_empty() {
            summary.push_str("\nFirst 10 Warnings:\n");
            for (i, warning) in report.warnings.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. Record {}: {} (duration={:.2} min, speed={})\n",
                    i + 1,
                    warning.record,
                    warning.kind.describe(),
                    warning.trip_duration,
                    warning.average_speed
                ));
            }
        }

        summary
    }
}

impl Default for QualityChecker {
    fn default() -> Self {
        Self::new()
    }
}
