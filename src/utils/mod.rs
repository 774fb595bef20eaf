pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod float_serde;
pub mod logging;
pub mod progress;
pub mod timing;

pub use constants::*;
pub use coordinates::midpoint;
pub use filename::generate_default_export_filename;
pub use logging::init_logging;
pub use progress::ProgressReporter;
pub use timing::timed;
