use crate::analyzers::check_range;
use crate::error::Result;
use crate::models::{Coordinates, Dataset, EnrichedRide, Field};
use crate::processors::{count_by_group, Aggregation, GroupQuery, RangeFilter};
use crate::utils::coordinates::midpoint;

/// Queries behind the ride-hailing views.
pub struct RideDashboard<'a> {
    rides: &'a Dataset<EnrichedRide>,
}

impl<'a> RideDashboard<'a> {
    pub fn new(rides: &'a Dataset<EnrichedRide>) -> Self {
        Self { rides }
    }

    /// Rides per day of month for days in `start_day..=end_day`.
    pub fn frequency_by_day(&self, start_day: u32, end_day: u32) -> Result<Aggregation<usize>> {
        check_range(Field::Day, start_day, end_day)?;
        let query =
            GroupQuery::new(Field::Day).with_range(Field::Day, start_day as f64, end_day as f64);
        count_by_group(self.rides.records(), &query)
    }

    /// Rides per minute on `day` between `hour_start:00` and `hour_end:59`.
    pub fn minute_breakdown(
        &self,
        day: u32,
        hour_start: u32,
        hour_end: u32,
    ) -> Result<Aggregation<usize>> {
        check_range(Field::Day, day, day)?;
        check_range(Field::Hour, hour_start, hour_end)?;
        let query = GroupQuery::new(Field::Minute)
            .with_filter(RangeFilter::equals(Field::Day, day as f64))
            .with_range(Field::Hour, hour_start as f64, hour_end as f64);
        count_by_group(self.rides.records(), &query)
    }

    /// Coordinates of every ride picked up during `hour`, in input order.
    /// Rides without coordinates are skipped.
    pub fn pickup_points(&self, hour: u32) -> Result<Vec<Coordinates>> {
        check_range(Field::Hour, hour, hour)?;
        Ok(self
            .rides
            .records()
            .iter()
            .filter(|r| r.hour() == hour)
            .filter_map(|r| r.ride.coordinates())
            .collect())
    }

    /// Map centre for the pick-up points of `hour`.
    pub fn pickup_midpoint(&self, hour: u32) -> Result<Option<Coordinates>> {
        Ok(midpoint(&self.pickup_points(hour)?))
    }
}
