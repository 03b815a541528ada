pub mod analysis_client;

pub use analysis_client::{AnalysisClient, HttpAnalysisClient, GENERIC_FAILURE_MESSAGE};
