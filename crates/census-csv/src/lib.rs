//! # census-csv
//!
//! CSV loaders for the census row store and table metadata.

mod error;
mod metadata;
mod options;
mod store;

pub use error::{CsvError, CsvResult};
pub use metadata::CsvTableMetadata;
pub use options::CsvReadOptions;
pub use store::{CsvRowStore, StoredRow};
