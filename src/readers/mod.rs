pub mod concurrent_reader;
pub mod loader;
pub mod timestamp;
pub mod trip_reader;

pub use concurrent_reader::ConcurrentLoader;
pub use loader::{CachedLoader, DatasetLoader};
pub use timestamp::TimestampParser;
pub use trip_reader::{delimiter_byte, ColumnMapping, TripReader};
