pub mod line_chart;

pub use line_chart::{Bounds, LineChart};
