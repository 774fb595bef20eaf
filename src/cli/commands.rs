use crate::analyzers::{RideDashboard, TripDashboard};
use crate::cli::args::{Cli, Commands, SourceKind};
use crate::config::Settings;
use crate::error::Result;
use crate::models::{Dataset, EnrichedRide, EnrichedTrip, Field, FieldAccess};
use crate::processors::{count_by_group, mean_by_group, GroupQuery, QualityChecker, RangeFilter};
use crate::readers::{CachedLoader, ConcurrentLoader};
use crate::utils::filename::generate_default_export_filename;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ParquetWriter, ReportFormat, ReportWriter};
use std::path::Path;
use std::sync::Arc;

/// A loaded source of either kind.
enum Loaded {
    Rides(Arc<Dataset<EnrichedRide>>),
    Trips(Arc<Dataset<EnrichedTrip>>),
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    let verbose = cli.verbose || settings.logging.verbose;
    let log_file = cli.log_file.clone().or_else(|| settings.logging.file.clone());
    let _guard = init_logging(verbose, log_file.as_deref())?;
    log_settings(&settings);

    match cli.command {
        Commands::Inspect {
            input,
            kind,
            delimiter,
            head,
            format,
        } => {
            apply_delimiter(&mut settings, delimiter);
            let report = ReportWriter::new(format);
            let loaded = load(&settings, &input, kind, format)?;

            match loaded {
                Loaded::Rides(rides) => {
                    println!("{}", report.render_shape("Rides", &rides.shape())?);
                    println!("{}", report.render_rides(rides.head(head))?);
                }
                Loaded::Trips(trips) => {
                    println!("{}", report.render_shape("Taxi trips", &trips.shape())?);
                    println!("{}", report.render_trips(trips.head(head))?);

                    let checker = QualityChecker::new();
                    let quality = checker.check_trips(trips.records());
                    if !quality.is_clean() {
                        println!("{}", checker.generate_summary(&quality));
                    }
                }
            }
        }

        Commands::Count {
            input,
            kind,
            delimiter,
            group_by,
            filter,
            format,
        } => {
            apply_delimiter(&mut settings, delimiter);
            let query = build_query(group_by, filter);
            let title = format!("Count by {}", group_by);

            let counts = match load(&settings, &input, kind, format)? {
                Loaded::Rides(rides) => count_by_group(rides.records(), &query)?,
                Loaded::Trips(trips) => count_by_group(trips.records(), &query)?,
            };
            println!("{}", ReportWriter::new(format).render_counts(&title, &counts)?);
        }

        Commands::Mean {
            input,
            kind,
            delimiter,
            group_by,
            value,
            filter,
            dense,
            format,
        } => {
            apply_delimiter(&mut settings, delimiter);
            let query = build_query(group_by, filter);
            let domain = if dense { group_by.domain() } else { None };
            let title = format!("Mean {} by {}", value, group_by);

            let means = match load(&settings, &input, kind, format)? {
                Loaded::Rides(rides) => mean_by_group(rides.records(), &query, value, domain)?,
                Loaded::Trips(trips) => mean_by_group(trips.records(), &query, value, domain)?,
            };
            println!("{}", ReportWriter::new(format).render_means(&title, &means)?);
        }

        Commands::Dashboard {
            rides,
            trips,
            start_day,
            end_day,
            day,
            hour_start,
            hour_end,
            format,
        } => {
            let rides_path = rides.unwrap_or_else(|| settings.sources.rides.clone());
            let trips_path = trips.unwrap_or_else(|| settings.sources.trips.clone());
            let defaults = &settings.dashboard;
            let start_day = start_day.unwrap_or(defaults.start_day);
            let end_day = end_day.unwrap_or(defaults.end_day);
            let day = day.unwrap_or(defaults.breakdown_day);
            let hour_start = hour_start.unwrap_or(defaults.hour_start);
            let hour_end = hour_end.unwrap_or(defaults.hour_end);

            let progress = spinner("Loading rides and taxi trips...", format);
            let loader = ConcurrentLoader::new(Arc::new(settings.loader()?));
            let (ride_data, trip_data) = loader.load_both(rides_path, trips_path).await?;
            progress.finish_with_message(&format!(
                "Loaded {} rides and {} taxi trips",
                ride_data.len(),
                trip_data.len()
            ));

            let report = ReportWriter::new(format);
            let rides = RideDashboard::new(&ride_data);
            let trips = TripDashboard::new(&trip_data);

            println!(
                "{}",
                report.render_counts(
                    &format!("Rides per day ({}-{})", start_day, end_day),
                    &rides.frequency_by_day(start_day, end_day)?
                )?
            );
            println!(
                "{}",
                report.render_counts(
                    &format!(
                        "Rides per minute on day {} ({}:00-{}:59)",
                        day, hour_start, hour_end
                    ),
                    &rides.minute_breakdown(day, hour_start, hour_end)?
                )?
            );
            match rides.pickup_midpoint(hour_start)? {
                Some(centre) => println!(
                    "Map centre for pick-ups at {}:00: {:.5}, {:.5} ({} points)\n",
                    hour_start,
                    centre.latitude,
                    centre.longitude,
                    rides.pickup_points(hour_start)?.len()
                ),
                None => println!("No pick-up coordinates at {}:00\n", hour_start),
            }
            println!(
                "{}",
                report.render_counts(
                    &format!("Taxi pick-ups per hour ({}-{})", hour_start, hour_end),
                    &trips.pickups_by_hour(hour_start, hour_end)?
                )?
            );
            println!(
                "{}",
                report.render_counts(
                    "Taxi pick-ups per minute",
                    &trips.pickups_by_minute(hour_start, hour_end)?
                )?
            );
            println!(
                "{}",
                report.render_means(
                    "Average speed per pick-up hour",
                    &trips.average_speed_by_hour(hour_start, hour_end)?
                )?
            );
        }

        Commands::Export {
            input,
            kind,
            delimiter,
            output_file,
            compression,
        } => {
            apply_delimiter(&mut settings, delimiter);
            let output_file =
                output_file.unwrap_or_else(|| generate_default_export_filename(&input));
            let compression = compression.unwrap_or_else(|| settings.export.compression.clone());
            let writer = ParquetWriter::new()
                .with_compression(&compression)?
                .with_row_group_size(settings.export.row_group_size);

            let loaded = load(&settings, &input, kind, ReportFormat::Table)?;

            if let Some(parent) = output_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let progress = ProgressReporter::new_spinner("Writing Parquet file...", false);
            match loaded {
                Loaded::Rides(rides) => writer.write_rides(&rides, &output_file)?,
                Loaded::Trips(trips) => writer.write_trips(&trips, &output_file)?,
            }
            progress.finish_with_message(&format!("Wrote {}", output_file.display()));

            let file_info = writer.get_file_info(&output_file)?;
            println!("\n{}", file_info.summary());
        }
    }

    Ok(())
}

/// Settings are read before the subscriber exists, so they are logged here.
fn log_settings(settings: &Settings) {
    tracing::debug!("Loaded settings: {:?}", settings);
}

fn apply_delimiter(settings: &mut Settings, delimiter: Option<char>) {
    if let Some(delimiter) = delimiter {
        settings.sources.delimiter = delimiter;
    }
}

fn build_query(group_by: Field, filters: Vec<RangeFilter>) -> GroupQuery {
    filters
        .into_iter()
        .fold(GroupQuery::new(group_by), GroupQuery::with_filter)
}

/// Silent when the report is JSON so the terminal only shows the document.
fn spinner(message: &str, format: ReportFormat) -> ProgressReporter {
    ProgressReporter::new_spinner(message, format == ReportFormat::Json)
}

fn load(settings: &Settings, input: &Path, kind: SourceKind, format: ReportFormat) -> Result<Loaded> {
    let loader: CachedLoader = settings.loader()?;
    let progress = spinner(&format!("Loading {}...", input.display()), format);

    let loaded = match kind {
        SourceKind::Rides => Loaded::Rides(loader.rides(input)?),
        SourceKind::Trips => Loaded::Trips(loader.trips(input)?),
    };

    let (rows, record_type) = match &loaded {
        Loaded::Rides(rides) => (rides.len(), EnrichedRide::RECORD_TYPE),
        Loaded::Trips(trips) => (trips.len(), EnrichedTrip::RECORD_TYPE),
    };
    progress.finish_with_message(&format!("Loaded {} {} records", rows, record_type));
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_settings_are_logged_at_debug() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || log_settings(&Settings::default()));

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Loaded settings"), "{}", output);
        assert!(output.contains("max_workers"), "{}", output);
    }

    #[test]
    fn test_build_query_applies_every_filter() {
        let query = build_query(
            Field::MinutePickup,
            vec![
                RangeFilter::new(Field::HourPickup, 8.0, 22.0),
                RangeFilter::equals(Field::DayPickup, 15.0),
            ],
        );
        assert_eq!(query.group_by(), Field::MinutePickup);
        assert_eq!(query.filters().len(), 2);
    }
}
