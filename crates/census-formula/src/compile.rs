//! Folding parsed formulas into lazy tables

use census_core::{Geographies, Value};

use crate::ast::FormulaExpr;
use crate::datasource::DatasourceRef;
use crate::error::FormulaResult;
use crate::parser::parse_formula;
use crate::table::Table;

/// Parses formulas into [`Table`]s bound to one datasource
#[derive(Debug, Clone)]
pub struct FormulaParser {
    source: DatasourceRef,
}

impl FormulaParser {
    /// Create a parser whose table identifiers resolve through `source`
    pub fn new(source: DatasourceRef) -> Self {
        Self { source }
    }

    /// The datasource table identifiers are bound to
    pub fn source(&self) -> &DatasourceRef {
        &self.source
    }

    /// Parse formula text into an unevaluated table
    pub fn parse(&self, formula: &str) -> FormulaResult<Table> {
        let expr = parse_formula(formula)?;
        tracing::trace!(formula, ?expr, "parsed formula");
        Ok(self.fold(expr))
    }

    /// Parse and evaluate in one step
    pub fn data<'g, G: Into<Geographies<'g>>>(
        &self,
        formula: &str,
        geographies: G,
    ) -> FormulaResult<Vec<Value>> {
        self.parse(formula)?.evaluate(geographies)
    }

    /// Build a table bottom-up from an AST
    pub fn fold(&self, expr: FormulaExpr) -> Table {
        match expr {
            FormulaExpr::Number(n) => Table::literal(Value::new(n)),
            FormulaExpr::Table(name) => Table::reference(self.source.clone(), name),
            FormulaExpr::UnaryOp { op, operand } => self.fold(*operand).unary(op),
            FormulaExpr::BinaryOp { op, left, right } => {
                self.fold(*left).combine(op, self.fold(*right))
            }
        }
    }
}

/// Parse `formula` against `source` and evaluate it for `geographies`
pub fn data<'g, G: Into<Geographies<'g>>>(
    source: DatasourceRef,
    formula: &str,
    geographies: G,
) -> FormulaResult<Vec<Value>> {
    FormulaParser::new(source).data(formula, geographies)
}
