use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::calendar::CalendarFields;
use crate::models::field::{Field, FieldAccess};

/// A ride-hailing pickup with a single timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRecord {
    pub timestamp: NaiveDateTime,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub base: Option<String>,
}

impl RideRecord {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            latitude: None,
            longitude: None,
            base: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A ride with its calendar features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRide {
    pub ride: RideRecord,
    pub calendar: CalendarFields,
}

const RIDE_SCHEMA: [Field; 6] = [
    Field::Lat,
    Field::Lon,
    Field::Day,
    Field::Weekday,
    Field::Hour,
    Field::Minute,
];

impl EnrichedRide {
    pub fn from_ride(ride: RideRecord) -> Self {
        let calendar = CalendarFields::from_timestamp(&ride.timestamp);
        Self { ride, calendar }
    }

    pub fn day(&self) -> u32 {
        self.calendar.day
    }

    pub fn weekday(&self) -> u32 {
        self.calendar.weekday
    }

    pub fn hour(&self) -> u32 {
        self.calendar.hour
    }

    pub fn minute(&self) -> u32 {
        self.calendar.minute
    }
}

impl FieldAccess for EnrichedRide {
    const RECORD_TYPE: &'static str = "ride";

    fn schema() -> &'static [Field] {
        &RIDE_SCHEMA
    }

    fn field_value(&self, field: Field) -> Option<f64> {
        match field {
            Field::Day => Some(self.calendar.day as f64),
            Field::Weekday => Some(self.calendar.weekday as f64),
            Field::Hour => Some(self.calendar.hour as f64),
            Field::Minute => Some(self.calendar.minute as f64),
            Field::Lat => Some(self.ride.latitude.unwrap_or(f64::NAN)),
            Field::Lon => Some(self.ride.longitude.unwrap_or(f64::NAN)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ride() -> RideRecord {
        let ts = NaiveDate::from_ymd_opt(2014, 4, 4)
            .unwrap()
            .and_hms_opt(17, 45, 0)
            .unwrap();
        RideRecord::new(ts)
            .with_coordinates(40.7588, -73.9776)
            .with_base("B02512")
    }

    #[test]
    fn test_enriched_ride_fields() {
        let enriched = EnrichedRide::from_ride(ride());
        assert_eq!(enriched.field_value(Field::Day), Some(4.0));
        assert_eq!(enriched.field_value(Field::Weekday), Some(4.0));
        assert_eq!(enriched.field_value(Field::Hour), Some(17.0));
        assert_eq!(enriched.field_value(Field::Minute), Some(45.0));
        assert_eq!(enriched.field_value(Field::Lat), Some(40.7588));
        assert_eq!(enriched.field_value(Field::HourPickup), None);
    }

    #[test]
    fn test_missing_coordinates_read_as_nan() {
        let mut raw = ride();
        raw.latitude = None;
        let enriched = EnrichedRide::from_ride(raw);
        assert!(enriched.field_value(Field::Lat).unwrap().is_nan());
        assert!(enriched.ride.coordinates().is_none());
    }

    #[test]
    fn test_schema_check() {
        assert!(EnrichedRide::ensure_field(Field::Hour).is_ok());
        let err = EnrichedRide::ensure_field(Field::AverageSpeed).unwrap_err();
        assert!(err.is_field_error());
        assert_eq!(
            EnrichedRide::derived_columns(),
            vec!["day", "weekday", "hour", "minute"]
        );
    }
}
