//! Formula evaluation against one vintage

use std::sync::Arc;

use census_core::{Geographies, RowStore, TableMetadata, Value};
use census_formula::{FormulaParser, FormulaResult, Table};

use crate::vintage::Vintage;

/// A vintage bound to its store and metadata, ready to evaluate formulas
#[derive(Debug, Clone)]
pub struct Dataset {
    vintage: Vintage,
    parser: FormulaParser,
}

impl Dataset {
    /// Create a dataset for a vintage
    pub fn new(
        vintage: Vintage,
        store: Arc<dyn RowStore>,
        metadata: Arc<dyn TableMetadata>,
    ) -> FormulaResult<Self> {
        let source = vintage.open(store, metadata)?;
        Ok(Self {
            vintage,
            parser: FormulaParser::new(source),
        })
    }

    /// Create a dataset from a vintage selector such as `acs2010e5`
    pub fn open(
        vintage: &str,
        store: Arc<dyn RowStore>,
        metadata: Arc<dyn TableMetadata>,
    ) -> FormulaResult<Self> {
        Self::new(vintage.parse()?, store, metadata)
    }

    /// The vintage formulas resolve against
    pub fn vintage(&self) -> Vintage {
        self.vintage
    }

    /// Parse a formula without evaluating it
    pub fn parse(&self, formula: &str) -> FormulaResult<Table> {
        self.parser.parse(formula)
    }

    /// Parse a formula and evaluate it for the given geographies
    pub fn data<'g, G: Into<Geographies<'g>>>(
        &self,
        formula: &str,
        geographies: G,
    ) -> FormulaResult<Vec<Value>> {
        self.parser.data(formula, geographies)
    }
}
