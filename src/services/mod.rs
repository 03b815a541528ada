pub mod item_validator;
pub mod report_writer;

pub use item_validator::ItemValidator;
pub use report_writer::{render, ReportWriter};
