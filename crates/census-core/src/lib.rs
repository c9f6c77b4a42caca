//! # census-core
//!
//! Core data types for evaluating formulas over census tables.
//!
//! This crate provides:
//! - [`Value`] - a decimal measurement with an optional margin of error
//! - [`Geography`] and [`Geographies`] - descriptors forwarded to datasources
//! - [`RowStore`] and [`TableMetadata`] - the interface to the backing store
//!
//! ## Example
//!
//! ```rust
//! use census_core::Value;
//!
//! let a = Value::with_moe(10, 1);
//! let b = Value::with_moe(20, 2);
//! let sum = a.checked_add(&b).unwrap();
//!
//! assert_eq!(sum.magnitude(), Some(30.into()));
//! assert!(sum.margin_of_error().is_some());
//! ```

pub mod error;
pub mod geography;
pub mod store;
pub mod value;

// Re-exports for convenience
pub use error::{Error, Result};
pub use geography::{Geographies, Geography, AREA_KEY, LOCATOR_KEY};
pub use store::{ColumnLocation, RowCell, RowQuery, RowStore, TableMetadata};
pub use value::{Operator, Value};

pub use rust_decimal::Decimal;
