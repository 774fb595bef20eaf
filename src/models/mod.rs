pub mod calendar;
pub mod dataset;
pub mod field;
pub mod ride;
pub mod trip;

pub use calendar::CalendarFields;
pub use dataset::{Dataset, DatasetShape};
pub use field::{Field, FieldAccess};
pub use ride::{Coordinates, EnrichedRide, RideRecord};
pub use trip::{EnrichedTrip, TaxiTrip};
