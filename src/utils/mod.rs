pub mod constants;
pub mod coordinates;
pub mod dates;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use coordinates::{parse_hemisphere_coordinate, HemisphereConvention};
pub use dates::fractional_year_to_date;
pub use filename::generate_default_plot_filename;
pub use logging::init_logging;
pub use progress::ProgressReporter;
