pub mod ride_dashboard;
pub mod trip_dashboard;

pub use ride_dashboard::RideDashboard;
pub use trip_dashboard::TripDashboard;

use crate::error::{PipelineError, Result};
use crate::models::Field;

/// Reject ranges that are reversed or fall outside the field's domain.
pub(crate) fn check_range(field: Field, start: u32, end: u32) -> Result<()> {
    if start > end {
        return Err(PipelineError::Config(format!(
            "{} range is reversed: {} > {}",
            field, start, end
        )));
    }
    if let Some(domain) = field.domain() {
        if !domain.contains(&(start as i64)) || !domain.contains(&(end as i64)) {
            return Err(PipelineError::Config(format!(
                "{} range {}..{} is outside {}..{}",
                field,
                start,
                end,
                domain.start(),
                domain.end()
            )));
        }
    }
    Ok(())
}
