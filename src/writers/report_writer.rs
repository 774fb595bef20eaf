use crate::error::Result;
use crate::models::{DatasetShape, EnrichedRide, EnrichedTrip};
use crate::processors::{Aggregation, MeanAggregation};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

/// Renders query results for the terminal.
pub struct ReportWriter {
    format: ReportFormat,
    bar_width: usize,
}

impl ReportWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            bar_width: 40,
        }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn render_counts(&self, title: &str, counts: &Aggregation<usize>) -> Result<String> {
        if self.format == ReportFormat::Json {
            return self.json(title, counts);
        }

        let mut out = format!("{}\n", title);
        let max = counts.groups.values().copied().max().unwrap_or(0);
        for (key, count) in counts.iter() {
            let bar = if max == 0 {
                0
            } else {
                (*count * self.bar_width).div_ceil(max)
            };
            let _ = writeln!(
                out,
                "{:>13} {:>4} | {:<width$} {}",
                counts.group_by.name(),
                key,
                "#".repeat(bar),
                count,
                width = self.bar_width
            );
        }
        let _ = writeln!(out, "Total: {}", counts.total());
        Ok(out)
    }

    pub fn render_means(&self, title: &str, means: &MeanAggregation) -> Result<String> {
        if self.format == ReportFormat::Json {
            return self.json(title, means);
        }

        let mut out = format!("{}\n", title);
        if means.is_insufficient() {
            out.push_str("Insufficient data\n");
            return Ok(out);
        }
        for (key, mean) in &means.groups {
            let marker = if means.filled_keys.contains(key) {
                " (filled)"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "{:>13} {:>4} | {:.3}{}",
                means.group_by.name(),
                key,
                mean,
                marker
            );
        }
        Ok(out)
    }

    pub fn render_shape(&self, title: &str, shape: &DatasetShape) -> Result<String> {
        if self.format == ReportFormat::Json {
            return self.json(title, shape);
        }
        Ok(format!(
            "{}\nRows: {}\nColumns: {}\n",
            title, shape.rows, shape.columns
        ))
    }

    pub fn render_rides(&self, rides: &[EnrichedRide]) -> Result<String> {
        if self.format == ReportFormat::Json {
            return self.json("head", &rides);
        }

        let mut out = String::from("timestamp            lat        lon        base    day wd hr min\n");
        for r in rides {
            let _ = writeln!(
                out,
                "{}  {:<9}  {:<9}  {:<6}  {:>3} {:>2} {:>2} {:>3}",
                r.ride.timestamp,
                fmt_optional(r.ride.latitude),
                fmt_optional(r.ride.longitude),
                r.ride.base.as_deref().unwrap_or("-"),
                r.calendar.day,
                r.calendar.weekday,
                r.calendar.hour,
                r.calendar.minute
            );
        }
        Ok(out)
    }

    pub fn render_trips(&self, trips: &[EnrichedTrip]) -> Result<String> {
        if self.format == ReportFormat::Json {
            return self.json("head", &trips);
        }

        let mut out = String::from(
            "pickup               dropoff              distance  duration  speed\n",
        );
        for t in trips {
            let _ = writeln!(
                out,
                "{}  {}  {:>8.2}  {:>8.2}  {:>6.2}",
                t.trip.pickup, t.trip.dropoff, t.trip.trip_distance, t.trip_duration, t.average_speed
            );
        }
        Ok(out)
    }

    fn json<T: Serialize + ?Sized>(&self, title: &str, value: &T) -> Result<String> {
        #[derive(Serialize)]
        struct Titled<'a, T: ?Sized> {
            title: &'a str,
            data: &'a T,
        }
        Ok(serde_json::to_string_pretty(&Titled { title, data: value })?)
    }
}

fn fmt_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;
    use std::collections::BTreeMap;

    fn counts() -> Aggregation<usize> {
        Aggregation {
            group_by: Field::Day,
            groups: BTreeMap::from([(1, 2), (2, 1)]),
        }
    }

    #[test]
    fn test_table_counts() {
        let out = ReportWriter::new(ReportFormat::Table)
            .render_counts("Rides by day", &counts())
            .unwrap();
        assert!(out.starts_with("Rides by day\n"));
        assert!(out.contains("Total: 3"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_json_counts() {
        let out = ReportWriter::new(ReportFormat::Json)
            .render_counts("Rides by day", &counts())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "Rides by day");
        assert_eq!(value["data"]["group_by"], "day");
        assert_eq!(value["data"]["groups"]["1"], 2);
    }

    #[test]
    fn test_means_mark_filled_groups() {
        let means = MeanAggregation {
            group_by: Field::HourPickup,
            value_field: Field::AverageSpeed,
            groups: BTreeMap::from([(8, 20.0), (9, 20.0)]),
            filled_keys: vec![9],
            fill_value: Some(20.0),
        };
        let out = ReportWriter::new(ReportFormat::Table)
            .render_means("Speed", &means)
            .unwrap();
        assert!(out.contains("(filled)"));
    }

    #[test]
    fn test_json_keeps_infinite_and_undefined_speeds() {
        use crate::models::TaxiTrip;
        use crate::processors::{mean_by_group, GroupQuery};
        use chrono::NaiveDate;

        let at = NaiveDate::from_ymd_opt(2015, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let trips = vec![
            EnrichedTrip::from_trip(TaxiTrip::new(at, at, 2.0)),
            EnrichedTrip::from_trip(TaxiTrip::new(at, at, 0.0)),
        ];
        let writer = ReportWriter::new(ReportFormat::Json);

        let head = writer.render_trips(&trips).unwrap();
        assert!(!head.contains("null"), "{}", head);
        let value: serde_json::Value = serde_json::from_str(&head).unwrap();
        assert_eq!(value["data"][0]["average_speed"], "inf");
        assert_eq!(value["data"][1]["average_speed"], "NaN");

        let means = mean_by_group(
            &trips,
            &GroupQuery::new(Field::HourPickup),
            Field::AverageSpeed,
            None,
        )
        .unwrap();
        let out = writer.render_means("Speed", &means).unwrap();
        assert!(!out.contains("null"), "{}", out);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["data"]["groups"]["9"], "inf");
    }

    #[test]
    fn test_insufficient_means() {
        let means = MeanAggregation {
            group_by: Field::HourPickup,
            value_field: Field::AverageSpeed,
            groups: BTreeMap::from([(8, f64::NAN)]),
            filled_keys: vec![],
            fill_value: None,
        };
        let out = ReportWriter::new(ReportFormat::Table)
            .render_means("Speed", &means)
            .unwrap();
        assert!(out.contains("Insufficient data"));
    }
}
