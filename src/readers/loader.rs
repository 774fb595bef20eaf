use crate::cache::{CacheStats, DatasetCache, SourceKey};
use crate::error::Result;
use crate::models::{Dataset, EnrichedRide, EnrichedTrip};
use crate::processors::Enricher;
use crate::readers::TripReader;
use crate::utils::timing::timed;
use std::path::Path;
use std::sync::Arc;

/// Read and enrich a source in one step. Each call re-reads the file.
#[derive(Default)]
pub struct DatasetLoader {
    reader: TripReader,
    enricher: Enricher,
}

impl DatasetLoader {
    pub fn new(reader: TripReader, enricher: Enricher) -> Self {
        Self { reader, enricher }
    }

    pub fn reader(&self) -> &TripReader {
        &self.reader
    }

    pub fn load_rides(&self, path: &Path) -> Result<Dataset<EnrichedRide>> {
        timed("load_rides", || {
            let raw = self.reader.read_rides(path)?;
            let enriched = self.enricher.enrich_rides(raw)?;
            tracing::info!("Loaded {} rides from {}", enriched.len(), path.display());
            Ok(enriched)
        })
    }

    pub fn load_trips(&self, path: &Path) -> Result<Dataset<EnrichedTrip>> {
        timed("load_trips", || {
            let raw = self.reader.read_taxi_trips(path)?;
            let enriched = self.enricher.enrich_trips(raw)?;
            tracing::info!("Loaded {} taxi trips from {}", enriched.len(), path.display());
            Ok(enriched)
        })
    }
}

/// [`DatasetLoader`] memoized on (source path, delimiter).
#[derive(Default)]
pub struct CachedLoader {
    loader: DatasetLoader,
    rides: DatasetCache<Dataset<EnrichedRide>>,
    trips: DatasetCache<Dataset<EnrichedTrip>>,
}

impl CachedLoader {
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            rides: DatasetCache::new(),
            trips: DatasetCache::new(),
        }
    }

    pub fn rides(&self, path: &Path) -> Result<Arc<Dataset<EnrichedRide>>> {
        let key = self.key(path);
        self.rides.get_or_load(key, || self.loader.load_rides(path))
    }

    pub fn trips(&self, path: &Path) -> Result<Arc<Dataset<EnrichedTrip>>> {
        let key = self.key(path);
        self.trips.get_or_load(key, || self.loader.load_trips(path))
    }

    pub fn stats(&self) -> (CacheStats, CacheStats) {
        (self.rides.stats(), self.trips.stats())
    }

    pub fn clear(&self) {
        self.rides.clear();
        self.trips.clear();
    }

    fn key(&self, path: &Path) -> SourceKey {
        SourceKey::new(path, self.loader.reader().delimiter())
    }
}
