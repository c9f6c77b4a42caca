//! Interface to the backing row store and table metadata
//!
//! The store holds raw summary-file rows keyed by file id, segment, area
//! code and record locator. Metadata maps a table identifier to the segment
//! and column that hold it. Both are implemented outside the evaluator; see
//! `census-csv` for an in-memory implementation.

use std::fmt::Debug;

use crate::error::Result;

/// A batched lookup of one column across many geographies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowQuery {
    /// File identifier (e.g. `uSF1`, `ACSSF`)
    pub file_id: String,
    /// Accepted file types; empty means any
    pub file_types: Vec<String>,
    /// Segment (sub-file) holding the column
    pub segment: String,
    /// Area codes, matched by membership
    pub areas: Vec<String>,
    /// Record locators, matched by membership
    pub locators: Vec<String>,
    /// Zero-based index into the row's data cells
    pub column: usize,
}

impl RowQuery {
    /// Check whether a row's keys satisfy this query
    pub fn matches(
        &self,
        file_id: &str,
        file_type: Option<&str>,
        segment: &str,
        area: &str,
        locator: &str,
    ) -> bool {
        self.file_id == file_id
            && self.segment == segment
            && (self.file_types.is_empty()
                || file_type.map_or(false, |t| self.file_types.iter().any(|f| f == t)))
            && self.areas.iter().any(|a| a == area)
            && self.locators.iter().any(|l| l == locator)
    }
}

/// One selected cell, with the keys needed to align it to a geography
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCell {
    pub area: String,
    pub locator: String,
    pub file_type: Option<String>,
    /// Raw stored text; `None` if the row has no such column
    pub text: Option<String>,
}

/// Read-only access to stored rows
pub trait RowStore: Send + Sync + Debug {
    /// Fetch one column for every row matching `query`
    fn fetch(&self, query: &RowQuery) -> Result<Vec<RowCell>>;
}

/// Physical location of a table identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnLocation {
    /// Segment (sub-file) code
    pub segment: String,
    /// One-based column position in the published file layout
    pub column: usize,
}

/// Maps table identifiers to their physical location for one vintage
pub trait TableMetadata: Send + Sync + Debug {
    /// Locate a table identifier, failing with [`Error::UnknownTable`](crate::Error::UnknownTable)
    fn locate(&self, table: &str) -> Result<ColumnLocation>;
}
