//! Data module - questionnaire loading and scale mapping

mod loader;
mod processor;
mod table;

pub use loader::{DataLoader, LoaderError, SourceFormat};
pub use processor::{LoadReport, MappedResponses, MappingOptions};
pub use table::{Question, ResponseTable, Score};
