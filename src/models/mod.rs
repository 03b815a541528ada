pub mod item;
pub mod item_store;
pub mod loaders;
pub mod verdict;

pub use item::{Candidate, EmailItem, ItemId};
pub use item_store::{ItemStore, Outcome};
pub use loaders::collect_candidates;
pub use verdict::{AnalysisField, AnalysisResponse, Verdict};
