use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::calendar::CalendarFields;
use crate::models::field::{Field, FieldAccess};

/// A taxi trip with pickup and dropoff timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxiTrip {
    pub pickup: NaiveDateTime,
    pub dropoff: NaiveDateTime,
    pub trip_distance: f64,
}

impl TaxiTrip {
    pub fn new(pickup: NaiveDateTime, dropoff: NaiveDateTime, trip_distance: f64) -> Self {
        Self {
            pickup,
            dropoff,
            trip_distance,
        }
    }
}

/// A taxi trip with calendar features for both ends plus duration and speed.
///
/// `trip_duration` is `dropoff - pickup` in minutes and is not checked for
/// sign. `average_speed` is `trip_distance / (trip_duration / 60)` and is
/// infinite or NaN when the duration is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTrip {
    pub trip: TaxiTrip,
    pub pickup: CalendarFields,
    pub dropoff: CalendarFields,
    #[serde(with = "crate::utils::float_serde")]
    pub trip_duration: f64,
    #[serde(with = "crate::utils::float_serde")]
    pub average_speed: f64,
}

const TRIP_SCHEMA: [Field; 11] = [
    Field::TripDistance,
    Field::DayPickup,
    Field::WeekdayPickup,
    Field::HourPickup,
    Field::MinutePickup,
    Field::DayDropoff,
    Field::WeekdayDropoff,
    Field::HourDropoff,
    Field::MinuteDropoff,
    Field::TripDuration,
    Field::AverageSpeed,
];

impl EnrichedTrip {
    pub fn from_trip(trip: TaxiTrip) -> Self {
        let pickup = CalendarFields::from_timestamp(&trip.pickup);
        let dropoff = CalendarFields::from_timestamp(&trip.dropoff);
        let trip_duration = duration_minutes(&trip.pickup, &trip.dropoff);
        let average_speed = trip.trip_distance / (trip_duration / 60.0);

        Self {
            trip,
            pickup,
            dropoff,
            trip_duration,
            average_speed,
        }
    }
}

/// Signed difference `end - start` in minutes. Nanosecond precision unless
/// the span is too long to count in nanoseconds (about 292 years).
pub fn duration_minutes(start: &NaiveDateTime, end: &NaiveDateTime) -> f64 {
    let delta = *end - *start;
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 60_000_000_000.0,
        None => match delta.num_microseconds() {
            Some(micros) => micros as f64 / 60_000_000.0,
            None => delta.num_milliseconds() as f64 / 60_000.0,
        },
    }
}

impl FieldAccess for EnrichedTrip {
    const RECORD_TYPE: &'static str = "taxi trip";

    fn schema() -> &'static [Field] {
        &TRIP_SCHEMA
    }

    fn field_value(&self, field: Field) -> Option<f64> {
        let value = match field {
            Field::TripDistance => self.trip.trip_distance,
            Field::DayPickup => self.pickup.day as f64,
            Field::WeekdayPickup => self.pickup.weekday as f64,
            Field::HourPickup => self.pickup.hour as f64,
            Field::MinutePickup => self.pickup.minute as f64,
            Field::DayDropoff => self.dropoff.day as f64,
            Field::WeekdayDropoff => self.dropoff.weekday as f64,
            Field::HourDropoff => self.dropoff.hour as f64,
            Field::MinuteDropoff => self.dropoff.minute as f64,
            Field::TripDuration => self.trip_duration,
            Field::AverageSpeed => self.average_speed,
            _ => return None,
        };
        Some(value)
    }
}
