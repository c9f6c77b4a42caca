//! Lazy table nodes
//!
//! A [`Table`] is an evaluation tree built at parse time. Leaves bind a
//! datasource to either a literal or a table identifier; inner nodes hold an
//! operator. Nothing is looked up until [`Table::evaluate`] is called, and a
//! tree can be evaluated any number of times.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use census_core::{Geographies, Geography, Value};

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::datasource::{ConstantSource, DatasourceRef};
use crate::error::{FormulaError, FormulaResult};

/// Payload of a leaf node
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Numeric literal
    Literal(Value),
    /// Table identifier
    Table(String),
}

impl Operand {
    /// Key passed to the datasource
    fn key(&self) -> Cow<'_, str> {
        match self {
            Operand::Literal(value) => Cow::Owned(value.to_string()),
            Operand::Table(name) => Cow::Borrowed(name),
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        source: DatasourceRef,
        operand: Operand,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Table>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Table>,
        right: Box<Table>,
    },
}

/// A lazily evaluated formula
#[derive(Debug, Clone)]
pub struct Table {
    node: Node,
}

impl Table {
    /// A leaf holding a literal value
    pub fn literal(value: Value) -> Self {
        Self {
            node: Node::Leaf {
                source: Arc::new(ConstantSource::new(value)),
                operand: Operand::Literal(value),
            },
        }
    }

    /// A leaf resolving `table` through `source`
    pub fn reference<S: Into<String>>(source: DatasourceRef, table: S) -> Self {
        Self {
            node: Node::Leaf {
                source,
                operand: Operand::Table(table.into()),
            },
        }
    }

    /// Combine two tables with a binary operator
    pub fn combine(self, op: BinaryOperator, rhs: Table) -> Self {
        Self {
            node: Node::Binary {
                op,
                left: Box::new(self),
                right: Box::new(rhs),
            },
        }
    }

    /// Apply a unary operator
    pub fn unary(self, op: UnaryOperator) -> Self {
        Self {
            node: Node::Unary {
                op,
                operand: Box::new(self),
            },
        }
    }

    /// Leaf payload, if this is a leaf
    pub fn operand(&self) -> Option<&Operand> {
        match &self.node {
            Node::Leaf { operand, .. } => Some(operand),
            _ => None,
        }
    }

    /// Distinct table identifiers, in order of first appearance
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match &self.node {
            Node::Leaf {
                operand: Operand::Table(name),
                ..
            } => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Node::Leaf { .. } => {}
            Node::Unary { operand, .. } => operand.collect_references(names),
            Node::Binary { left, right, .. } => {
                left.collect_references(names);
                right.collect_references(names);
            }
        }
    }

    /// Evaluate for one geography or a sequence of them.
    ///
    /// Returns one value per geography, in input order.
    pub fn evaluate<'g, G: Into<Geographies<'g>>>(&self, geographies: G) -> FormulaResult<Vec<Value>> {
        let geographies = geographies.into();
        self.eval(&geographies)
    }

    fn eval(&self, geographies: &[Geography]) -> FormulaResult<Vec<Value>> {
        match &self.node {
            Node::Leaf { source, operand } => {
                tracing::trace!(
                    source = source.name(),
                    operand = %operand.key(),
                    geographies = geographies.len(),
                    "resolving leaf"
                );
                source.resolve(&operand.key(), geographies)
            }
            Node::Unary {
                op: UnaryOperator::Negate,
                operand,
            } => Ok(operand.eval(geographies)?.into_iter().map(|v| -v).collect()),
            Node::Binary { op, left, right } => {
                let lhs = left.eval(geographies)?;
                let rhs = right.eval(geographies)?;
                if lhs.len() != rhs.len() {
                    return Err(FormulaError::Shape {
                        left: lhs.len(),
                        right: rhs.len(),
                    });
                }
                lhs.iter()
                    .zip(&rhs)
                    .map(|(a, b)| a.apply(*op, b).map_err(FormulaError::from))
                    .collect()
            }
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf { operand, .. } => write!(f, "{}", operand.key()),
            Node::Unary {
                op: UnaryOperator::Negate,
                operand,
            } => write!(f, "(-{})", operand),
            Node::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

macro_rules! table_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl std::ops::$trait for Table {
            type Output = Table;

            fn $method(self, rhs: Table) -> Table {
                self.combine($op, rhs)
            }
        }
    };
}

table_op!(Add, add, BinaryOperator::Add);
table_op!(Sub, sub, BinaryOperator::Subtract);
table_op!(Mul, mul, BinaryOperator::Multiply);
table_op!(Div, div, BinaryOperator::Divide);

impl std::ops::Neg for Table {
    type Output = Table;

    fn neg(self) -> Table {
        self.unary(UnaryOperator::Negate)
    }
}
