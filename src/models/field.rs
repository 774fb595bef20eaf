use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{PipelineError, Result};

/// Named numeric fields that filters and group-by queries can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Day,
    Weekday,
    Hour,
    Minute,
    DayPickup,
    WeekdayPickup,
    HourPickup,
    MinutePickup,
    DayDropoff,
    WeekdayDropoff,
    HourDropoff,
    MinuteDropoff,
    TripDuration,
    AverageSpeed,
    TripDistance,
    Lat,
    Lon,
}

impl Field {
    pub const ALL: [Field; 17] = [
        Field::Day,
        Field::Weekday,
        Field::Hour,
        Field::Minute,
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
        Field::TripDistance,
        Field::Lat,
        Field::Lon,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Day => "day",
            Field::Weekday => "weekday",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::DayPickup => "day_pickup",
            Field::WeekdayPickup => "weekday_pickup",
            Field::HourPickup => "hour_pickup",
            Field::MinutePickup => "minute_pickup",
            Field::DayDropoff => "day_dropoff",
            Field::WeekdayDropoff => "weekday_dropoff",
            Field::HourDropoff => "hour_dropoff",
            Field::MinuteDropoff => "minute_dropoff",
            Field::TripDuration => "trip_duration",
            Field::AverageSpeed => "average_speed",
            Field::TripDistance => "trip_distance",
            Field::Lat => "lat",
            Field::Lon => "lon",
        }
    }

    /// Inclusive range of values a calendar field can take. `None` for
    /// continuous fields.
    pub fn domain(&self) -> Option<RangeInclusive<i64>> {
        match self {
            Field::Day | Field::DayPickup | Field::DayDropoff => Some(1..=31),
            Field::Weekday | Field::WeekdayPickup | Field::WeekdayDropoff => Some(0..=6),
            Field::Hour | Field::HourPickup | Field::HourDropoff => Some(0..=23),
            Field::Minute | Field::MinutePickup | Field::MinuteDropoff => Some(0..=59),
            _ => None,
        }
    }

    /// Calendar fields take integral values and can be grouped on.
    pub fn is_discrete(&self) -> bool {
        self.domain().is_some()
    }

    /// Fields computed by enrichment rather than read from the source file.
    pub fn is_derived(&self) -> bool {
        !matches!(self, Field::TripDistance | Field::Lat | Field::Lon)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| PipelineError::UnknownField(wanted.to_string()))
    }
}

/// Access to the named fields of an enriched record.
pub trait FieldAccess {
    /// Record type name used in error messages.
    const RECORD_TYPE: &'static str;

    /// Fields this record type exposes, in column order.
    fn schema() -> &'static [Field];

    /// Value of `field`, or `None` when the field is not part of the schema.
    /// Optional source values that are absent read as NaN.
    fn field_value(&self, field: Field) -> Option<f64>;

    fn ensure_field(field: Field) -> Result<Field> {
        if Self::schema().contains(&field) {
            Ok(field)
        } else {
            Err(PipelineError::FieldNotInSchema {
                field: field.name(),
                record_type: Self::RECORD_TYPE,
            })
        }
    }

    /// Names of the derived columns that enrichment appends.
    fn derived_columns() -> Vec<&'static str> {
        Self::schema()
            .iter()
            .filter(|f| f.is_derived())
            .map(|f| f.name())
            .collect()
    }
}
