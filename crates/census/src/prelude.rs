//! Prelude module - common imports for census users
//!
//! ```rust
//! use census::prelude::*;
//! ```

pub use crate::{
    ColumnLocation,
    // I/O types
    CsvReadOptions,
    CsvRowStore,
    CsvTableMetadata,
    // Main types
    Dataset,
    // Error types
    Error,
    FormulaError,
    FormulaResult,
    Geography,
    StoredRow,
    Table,
    Value,
    Vintage,
};
