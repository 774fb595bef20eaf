use crate::analyzers::check_range;
use crate::error::Result;
use crate::models::{Dataset, EnrichedTrip, Field};
use crate::processors::{count_by_group, mean_by_group, Aggregation, GroupQuery, MeanAggregation};

/// Queries behind the taxi-trip views. All of them select trips by pickup
/// hour.
pub struct TripDashboard<'a> {
    trips: &'a Dataset<EnrichedTrip>,
}

impl<'a> TripDashboard<'a> {
    pub fn new(trips: &'a Dataset<EnrichedTrip>) -> Self {
        Self { trips }
    }

    pub fn pickups_by_hour(&self, hour_start: u32, hour_end: u32) -> Result<Aggregation<usize>> {
        count_by_group(self.trips.records(), &self.query(Field::HourPickup, hour_start, hour_end)?)
    }

    pub fn pickups_by_minute(&self, hour_start: u32, hour_end: u32) -> Result<Aggregation<usize>> {
        count_by_group(
            self.trips.records(),
            &self.query(Field::MinutePickup, hour_start, hour_end)?,
        )
    }

    /// Mean speed per pickup hour. Hours whose mean is undefined (every trip
    /// had a zero-by-zero speed) take the mean of the other hours.
    pub fn average_speed_by_hour(&self, hour_start: u32, hour_end: u32) -> Result<MeanAggregation> {
        mean_by_group(
            self.trips.records(),
            &self.query(Field::HourPickup, hour_start, hour_end)?,
            Field::AverageSpeed,
            None,
        )
    }

    fn query(&self, group_by: Field, hour_start: u32, hour_end: u32) -> Result<GroupQuery> {
        check_range(Field::HourPickup, hour_start, hour_end)?;
        Ok(GroupQuery::new(group_by).with_range(
            Field::HourPickup,
            hour_start as f64,
            hour_end as f64,
        ))
    }
}
