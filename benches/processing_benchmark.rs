use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trip_insights::models::{Dataset, EnrichedTrip, Field, TaxiTrip};
use trip_insights::processors::{count_by_group, mean_by_group, Enricher, GroupQuery};
use trip_insights::readers::TripReader;

// Synthetic taxi trips spread over a month
fn create_test_trips(count: usize) -> Dataset<TaxiTrip> {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let trips = (0..count)
        .map(|i| {
            let pickup = start + Duration::minutes((i * 7 % 43_200) as i64);
            let dropoff = pickup + Duration::minutes((i % 45) as i64);
            TaxiTrip::new(pickup, dropoff, (i % 20) as f64 * 0.5)
        })
        .collect();

    Dataset::new(
        vec![
            "tpep_pickup_datetime".to_string(),
            "tpep_dropoff_datetime".to_string(),
            "trip_distance".to_string(),
        ],
        trips,
    )
}

fn create_test_csv(count: usize) -> String {
    let mut csv = String::from("tpep_pickup_datetime,tpep_dropoff_datetime,trip_distance\n");
    for trip in create_test_trips(count).records() {
        csv.push_str(&format!(
            "{},{},{}\n",
            trip.pickup.format("%Y-%m-%d %H:%M:%S"),
            trip.dropoff.format("%Y-%m-%d %H:%M:%S"),
            trip.trip_distance
        ));
    }
    csv
}

fn benchmark_csv_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parsing");

    for size in [1_000, 10_000].iter() {
        let csv = create_test_csv(*size);
        let reader = TripReader::new();

        group.bench_with_input(BenchmarkId::new("read_taxi_trips", size), &csv, |b, csv| {
            b.iter(|| black_box(reader.read_taxi_trips_from(csv.as_bytes()).unwrap()))
        });
    }

    group.finish();
}

fn benchmark_enrichment(c: &mut Criterion) {
    let mut group = c.benchmark_group("enrichment");

    for workers in [1, 4].iter() {
        let enricher = Enricher::new(*workers);
        let trips = create_test_trips(50_000);

        group.bench_with_input(BenchmarkId::new("enrich_trips", workers), &trips, |b, trips| {
            b.iter(|| black_box(enricher.enrich_trips(trips.clone()).unwrap()))
        });
    }

    group.finish();
}

fn benchmark_aggregation(c: &mut Criterion) {
    let enriched: Vec<EnrichedTrip> = Enricher::default()
        .enrich_trips(create_test_trips(50_000))
        .unwrap()
        .into_records();

    let count_query = GroupQuery::new(Field::MinutePickup).with_range(Field::HourPickup, 8.0, 22.0);
    c.bench_function("count_by_minute", |b| {
        b.iter(|| black_box(count_by_group(&enriched, &count_query).unwrap()))
    });

    let mean_query = GroupQuery::new(Field::HourPickup);
    c.bench_function("mean_speed_by_hour", |b| {
        b.iter(|| {
            black_box(
                mean_by_group(&enriched, &mean_query, Field::AverageSpeed, Field::HourPickup.domain())
                    .unwrap(),
            )
        })
    });
}

criterion_group!(
    benches,
    benchmark_csv_parsing,
    benchmark_enrichment,
    benchmark_aggregation
);
criterion_main!(benches);
