//! # census-formula
//!
//! Formula parser and lazy evaluator for census table arithmetic.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Folding an AST into a lazy [`Table`] bound to a [`Datasource`]
//! - Evaluation of a [`Table`] for one or more geographies
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use census_core::{Geography, Value};
//! use census_formula::{ConstantSource, FormulaParser};
//!
//! let parser = FormulaParser::new(Arc::new(ConstantSource::new(Value::new(50))));
//! let values = parser.data("P001001 * 2 + 1", Geography::new("CA", "0000001")).unwrap();
//!
//! assert_eq!(values, vec![Value::new(101)]);
//! ```

pub mod ast;
pub mod compile;
pub mod datasource;
pub mod error;
pub mod parser;
pub mod table;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use compile::{data, FormulaParser};
pub use datasource::{ConstantSource, Datasource, DatasourceRef};
pub use error::{FormulaError, FormulaResult};
pub use parser::parse_formula;
pub use table::{Operand, Table};
