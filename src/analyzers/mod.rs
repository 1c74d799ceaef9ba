pub mod dataset_summary;

pub use dataset_summary::{DatasetAnalyzer, DatasetSummary};
