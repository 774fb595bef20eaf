use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use trip_insights::analyzers::{RideDashboard, TripDashboard};
use trip_insights::error::ErrorKind;
use trip_insights::models::{EnrichedRide, EnrichedTrip, Field, FieldAccess};
use trip_insights::processors::{count_by_group, mean_by_group, Enricher, GroupQuery, QualityChecker};
use trip_insights::readers::{CachedLoader, ConcurrentLoader, DatasetLoader, TripReader};
use trip_insights::writers::ParquetWriter;

fn write_file(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create test file");
    for line in lines {
        writeln!(file, "{}", line).expect("Failed to write test file");
    }
    path
}

fn rides_file(dir: &TempDir) -> PathBuf {
    write_file(
        dir,
        "rides.csv",
        &[
            "Date/Time,Lat,Lon,Base",
            "4/1/2014 5:11:00,40.769,-73.9549,B02512",
            "4/1/2014 5:17:00,40.7267,-74.0345,B02512",
            "4/2/2014 9:21:00,40.7316,-73.9873,B02512",
        ],
    )
}

fn trips_file(dir: &TempDir) -> PathBuf {
    write_file(
        dir,
        "trips.csv",
        &[
            "tpep_pickup_datetime,tpep_dropoff_datetime,trip_distance",
            "2015-01-15T08:00:00,2015-01-15T08:15:00,5.0",
            "2015-01-15 08:30:00,2015-01-15 09:00:00,10.0",
            "2015-01-15 10:00:00,2015-01-15 10:00:00,0.0",
            "2015-01-15 12:00:00,2015-01-15 12:30:00,3.0",
            "2015-01-16 23:50:00,2015-01-17 00:05:30,2.0",
        ],
    )
}

#[test]
fn test_rides_grouped_by_day() {
    let dir = TempDir::new().unwrap();
    let rides = DatasetLoader::default().load_rides(&rides_file(&dir)).unwrap();

    let counts = count_by_group(rides.records(), &GroupQuery::new(Field::Day)).unwrap();
    assert_eq!(counts.groups, BTreeMap::from([(1, 2), (2, 1)]));

    let first = &rides.records()[0];
    assert_eq!((first.day(), first.weekday(), first.hour(), first.minute()), (1, 1, 5, 11));
    assert_eq!(rides.shape().columns, 4 + EnrichedRide::derived_columns().len());
}

#[test]
fn test_trip_duration_and_speed() {
    let dir = TempDir::new().unwrap();
    let trips = DatasetLoader::default().load_trips(&trips_file(&dir)).unwrap();
    let records = trips.records();

    assert_eq!(records[0].trip_duration, 15.0);
    assert_eq!(records[0].average_speed, 20.0);
    assert_eq!(records[2].trip_duration, 0.0);
    assert!(records[2].average_speed.is_nan());
    assert_eq!(records[4].trip_duration, 15.5);
    assert_eq!(records[4].pickup.day, 16);
    assert_eq!(records[4].dropoff.day, 17);
    assert_eq!(records[4].dropoff.hour, 0);
}

#[test]
fn test_alternate_delimiter() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "trips.psv",
        &[
            "tpep_pickup_datetime|tpep_dropoff_datetime|trip_distance",
            "2015-01-15 08:00:00|2015-01-15 08:15:00|5.0",
        ],
    );

    let reader = TripReader::new().with_delimiter('|').unwrap();
    let loader = DatasetLoader::new(reader, Enricher::new(2));
    let trips = loader.load_trips(&path).unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips.records()[0].average_speed, 20.0);

    // The default comma reader cannot find the columns.
    let err = DatasetLoader::default().load_trips(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_malformed_sources_are_parse_errors() {
    let dir = TempDir::new().unwrap();
    let missing_column = write_file(&dir, "missing.csv", &["Lat,Lon", "40.7,-73.9"]);
    let bad_timestamp = write_file(
        &dir,
        "bad.csv",
        &["Date/Time,Lat,Lon,Base", "4/1/2014 0:11:00,40.7,-73.9,B1", "yesterday,40.7,-73.9,B1"],
    );

    let loader = DatasetLoader::default();
    assert!(loader.load_rides(&missing_column).unwrap_err().is_parse_error());

    let err = loader.load_rides(&bad_timestamp).unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("line 3"), "unexpected message: {}", err);
}

#[test]
fn test_header_only_source_yields_empty_aggregations() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.csv", &["tpep_pickup_datetime,tpep_dropoff_datetime,trip_distance"]);
    let trips = DatasetLoader::default().load_trips(&path).unwrap();

    assert!(trips.is_empty());
    let counts = count_by_group(trips.records(), &GroupQuery::new(Field::HourPickup)).unwrap();
    assert!(counts.is_empty());

    let means = mean_by_group(
        trips.records(),
        &GroupQuery::new(Field::HourPickup),
        Field::AverageSpeed,
        Field::HourPickup.domain(),
    )
    .unwrap();
    assert!(means.is_insufficient());
}

#[test]
fn test_filtered_counts_sum_to_selection() {
    let dir = TempDir::new().unwrap();
    let trips = DatasetLoader::default().load_trips(&trips_file(&dir)).unwrap();

    let query = GroupQuery::new(Field::MinutePickup).with_range(Field::HourPickup, 8.0, 10.0);
    let counts = count_by_group(trips.records(), &query).unwrap();
    assert_eq!(counts.total(), 3);
}

#[test]
fn test_mean_fill_uses_mean_of_group_means() {
    let dir = TempDir::new().unwrap();
    let trips = DatasetLoader::default().load_trips(&trips_file(&dir)).unwrap();

    let means = TripDashboard::new(&trips).average_speed_by_hour(8, 12).unwrap();
    // Hour 8: (20 + 20) / 2, hour 12: 6, hour 10 is 0/0.
    assert_eq!(means.get(8), Some(20.0));
    assert_eq!(means.get(12), Some(6.0));
    assert_eq!(means.get(10), Some(13.0));
    assert_eq!(means.filled_keys, vec![10]);
    assert_eq!(means.get(9), None);
}

#[test]
fn test_unknown_fields_are_field_errors() {
    let dir = TempDir::new().unwrap();
    let rides = DatasetLoader::default().load_rides(&rides_file(&dir)).unwrap();

    let err = count_by_group(rides.records(), &GroupQuery::new(Field::HourPickup)).unwrap_err();
    assert!(err.is_field_error());

    let err = count_by_group(
        rides.records(),
        &GroupQuery::new(Field::Day).with_range(Field::TripDistance, 0.0, 1.0),
    )
    .unwrap_err();
    assert!(err.is_field_error());

    assert!("speed".parse::<Field>().unwrap_err().is_field_error());
}

#[test]
fn test_quality_report_flags_but_keeps_records() {
    let dir = TempDir::new().unwrap();
    let trips = DatasetLoader::default().load_trips(&trips_file(&dir)).unwrap();

    let report = QualityChecker::new().check_trips(trips.records());
    assert_eq!(report.total_records, 5);
    assert_eq!(report.zero_durations, 1);
    assert_eq!(report.non_finite_speeds, 1);
    assert_eq!(trips.len(), 5);
}

#[test]
fn test_ride_dashboard_views() {
    let dir = TempDir::new().unwrap();
    let rides = DatasetLoader::default().load_rides(&rides_file(&dir)).unwrap();
    let dashboard = RideDashboard::new(&rides);

    let by_day = dashboard.frequency_by_day(1, 30).unwrap();
    assert_eq!(by_day.total(), 3);

    let minutes = dashboard.minute_breakdown(1, 0, 23).unwrap();
    assert_eq!(minutes.groups, BTreeMap::from([(11, 1), (17, 1)]));

    let centre = dashboard.pickup_midpoint(5).unwrap().unwrap();
    assert!((centre.latitude - 40.74785).abs() < 1e-9);
}

#[test]
fn test_cached_loader_keys_on_delimiter() {
    let dir = TempDir::new().unwrap();
    let path = rides_file(&dir);

    let loader = CachedLoader::default();
    let first = loader.rides(&path).unwrap();
    let again = loader.rides(&dir.path().join("./rides.csv")).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let semicolon = CachedLoader::new(DatasetLoader::new(
        TripReader::new().with_delimiter(';').unwrap(),
        Enricher::default(),
    ));
    assert!(semicolon.rides(&path).is_err());
}

#[tokio::test]
async fn test_concurrent_load_and_export() {
    let dir = TempDir::new().unwrap();
    let loader = ConcurrentLoader::new(Arc::new(CachedLoader::default()));

    let (rides, trips) = loader
        .load_both(rides_file(&dir), trips_file(&dir))
        .await
        .unwrap();
    assert_eq!(rides.len(), 3);
    assert_eq!(trips.len(), 5);

    let output = dir.path().join("trips.parquet");
    let writer = ParquetWriter::new();
    writer.write_trips(&trips, &output).unwrap();

    let info = writer.get_file_info(&output).unwrap();
    assert_eq!(info.total_rows, 5);
    assert_eq!(info.columns.len(), trips.columns().len());
    assert!(info.columns.iter().any(|c| c == "trip_duration"));
    assert_eq!(trips.columns().len(), 3 + EnrichedTrip::derived_columns().len());
}

#[tokio::test]
async fn test_concurrent_load_reports_first_failure() {
    let dir = TempDir::new().unwrap();
    let loader = ConcurrentLoader::new(Arc::new(CachedLoader::default()));

    let result = loader
        .load_both(rides_file(&dir), Path::new("/nonexistent/trips.csv").to_path_buf())
        .await;
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Io);
}
