use crate::error::Result;
use crate::models::{Dataset, EnrichedRide, EnrichedTrip};
use crate::readers::CachedLoader;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

type Shared<T> = Arc<Dataset<T>>;

/// Loads the ride and taxi-trip sources side by side on the blocking pool.
pub struct ConcurrentLoader {
    loader: Arc<CachedLoader>,
}

impl ConcurrentLoader {
    pub fn new(loader: Arc<CachedLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &CachedLoader {
        &self.loader
    }

    /// Load both sources concurrently; the first failure is returned.
    pub async fn load_both(
        &self,
        rides_path: PathBuf,
        trips_path: PathBuf,
    ) -> Result<(Shared<EnrichedRide>, Shared<EnrichedTrip>)> {
        let rides_loader = Arc::clone(&self.loader);
        let trips_loader = Arc::clone(&self.loader);

        let rides_handle: JoinHandle<Result<Shared<EnrichedRide>>> =
            tokio::task::spawn_blocking(move || rides_loader.rides(&rides_path));
        let trips_handle: JoinHandle<Result<Shared<EnrichedTrip>>> =
            tokio::task::spawn_blocking(move || trips_loader.trips(&trips_path));

        let (rides, trips) = tokio::try_join!(rides_handle, trips_handle)?;
        Ok((rides?, trips?))
    }
}
