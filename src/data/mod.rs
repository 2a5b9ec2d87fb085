//! Data module - roster loading, normalization and export

pub mod cache;
mod export;
mod loader;
mod processor;
pub mod schema;
mod terms;

#[cfg(test)]
pub mod fixtures;

pub use cache::{CsvCache, NormalizeCache};
pub use export::InstructorCsv;
pub use processor::{ProcessorError, RosterProcessor};
pub use terms::{load_terms, TermTables};

pub(crate) use processor::{count_values, text_values};
