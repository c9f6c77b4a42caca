//! # census
//!
//! Evaluate arithmetic formulas over census summary-file tables.
//!
//! Formulas such as `B01001_002 / B01001_001 * 100` are parsed into lazy
//! [`Table`]s. Table identifiers are resolved only when the table is
//! evaluated for a set of [`Geography`] descriptors, with one batched store
//! lookup per identifier.
//!
//! ## Features
//!
//! - Decennial census 2000 (SF1, SF3) and 2010 (PL, SF1) summary files
//! - ACS 5-year estimates (2009, 2010) with margin-of-error propagation
//! - Pluggable row stores and table metadata, with CSV loaders included
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use census::prelude::*;
//!
//! let store = CsvRowStore::from_rows(vec![
//!     StoredRow::new("ACSSF", "ca", "0001", "0000001", vec!["500".into()]).with_file_type("2010e5"),
//!     StoredRow::new("ACSSF", "ca", "0001", "0000001", vec!["20".into()]).with_file_type("2010m5"),
//! ]);
//! let metadata = CsvTableMetadata::from_entries([(
//!     "B01001_001",
//!     ColumnLocation { segment: "0001".into(), column: 6 },
//! )]);
//!
//! let dataset = Dataset::open("acs2010e5", Arc::new(store), Arc::new(metadata)).unwrap();
//! let values = dataset.data("B01001_001 * 2", Geography::new("CA", "0000001")).unwrap();
//!
//! assert_eq!(values[0].magnitude(), Some(1000.into()));
//! ```

pub mod dataset;
pub mod datasources;
pub mod prelude;
pub mod vintage;

pub use dataset::Dataset;
pub use datasources::{AcsSource, DecennialSource};
pub use vintage::Vintage;

// Re-export core types
pub use census_core::{
    ColumnLocation, Decimal, Error, Geographies, Geography, Operator, Result, RowCell, RowQuery,
    RowStore, TableMetadata, Value, AREA_KEY, LOCATOR_KEY,
};

// Re-export formula types
pub use census_formula::{
    data, parse_formula, BinaryOperator, ConstantSource, Datasource, DatasourceRef, FormulaError,
    FormulaExpr, FormulaParser, FormulaResult, Operand, Table, UnaryOperator,
};

// Re-export CSV types
pub use census_csv::{CsvError, CsvReadOptions, CsvResult, CsvRowStore, CsvTableMetadata, StoredRow};
