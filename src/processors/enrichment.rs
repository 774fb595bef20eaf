use crate::error::{PipelineError, Result};
use crate::models::{Dataset, EnrichedRide, EnrichedTrip, FieldAccess, RideRecord, TaxiTrip};
use rayon::prelude::*;

/// Derives calendar, duration and speed features. Rows are independent, so
/// the work is spread over a rayon pool; output order matches input order.
pub struct Enricher {
    max_workers: usize,
}

impl Enricher {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn enrich_rides(&self, dataset: Dataset<RideRecord>) -> Result<Dataset<EnrichedRide>> {
        let derived = EnrichedRide::derived_columns();
        let pool = self.pool()?;
        Ok(dataset.map_records(&derived, |rides| {
            pool.install(|| rides.into_par_iter().map(EnrichedRide::from_ride).collect())
        }))
    }

    pub fn enrich_trips(&self, dataset: Dataset<TaxiTrip>) -> Result<Dataset<EnrichedTrip>> {
        let derived = EnrichedTrip::derived_columns();
        let pool = self.pool()?;
        Ok(dataset.map_records(&derived, |trips| {
            pool.install(|| trips.into_par_iter().map(EnrichedTrip::from_trip).collect())
        }))
    }

    fn pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
