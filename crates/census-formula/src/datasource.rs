//! Datasource capability
//!
//! A [`Datasource`] turns a table identifier and a list of geographies into
//! one [`Value`] per geography. Numeric literals go through the same path via
//! [`ConstantSource`].

use std::fmt::Debug;
use std::sync::Arc;

use census_core::{Geography, Value};

use crate::error::FormulaResult;

/// Shared handle to a datasource
pub type DatasourceRef = Arc<dyn Datasource>;

/// Resolves table identifiers to values
pub trait Datasource: Send + Sync + Debug {
    /// Resolve `table` for every geography, preserving input order
    fn resolve(&self, table: &str, geographies: &[Geography]) -> FormulaResult<Vec<Value>>;

    /// Short name used in log output
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A datasource that always yields the same value
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantSource {
    value: Value,
}

impl ConstantSource {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// The bound value
    pub fn value(&self) -> Value {
        self.value
    }
}

impl Datasource for ConstantSource {
    /// Ignores `table`; repeats the bound value once per geography
    fn resolve(&self, _table: &str, geographies: &[Geography]) -> FormulaResult<Vec<Value>> {
        Ok(vec![self.value; geographies.len()])
    }

    fn name(&self) -> &str {
        "constant"
    }
}
