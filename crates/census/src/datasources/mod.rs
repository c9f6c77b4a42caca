//! Vintage-specific datasources
//!
//! Each source resolves a table identifier by locating its column through
//! [`TableMetadata`] and issuing one batched [`RowStore::fetch`] covering
//! every requested geography.

mod acs;
mod decennial;

pub use acs::AcsSource;
pub use decennial::DecennialSource;

use std::collections::BTreeSet;

use census_core::{ColumnLocation, Error, Geography, Result, RowQuery};

/// Key identifying one geography's row: normalized area code and locator
pub(crate) type RowKey = (String, String);

/// How a vintage stores area codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AreaCase {
    Upper,
    Lower,
}

impl AreaCase {
    pub(crate) fn apply(self, area: &str) -> String {
        match self {
            AreaCase::Upper => area.to_uppercase(),
            AreaCase::Lower => area.to_lowercase(),
        }
    }
}

/// Validate geographies and extract their row keys, in input order
pub(crate) fn row_keys(geographies: &[Geography], case: AreaCase) -> Result<Vec<RowKey>> {
    geographies
        .iter()
        .map(|g| Ok((case.apply(g.area()?), g.locator()?.to_string())))
        .collect()
}

/// Zero-based data cell index for a table, given the key column count
pub(crate) fn data_column(table: &str, location: &ColumnLocation, header_width: usize) -> Result<usize> {
    location
        .column
        .checked_sub(header_width + 1)
        .ok_or_else(|| Error::UnknownTable(format!("{} (column {} is a key column)", table, location.column)))
}

/// Build a membership query covering all `keys`
pub(crate) fn batch_query(
    file_id: &str,
    file_types: &[String],
    location: ColumnLocation,
    column: usize,
    keys: &[RowKey],
) -> RowQuery {
    let areas: BTreeSet<&str> = keys.iter().map(|(a, _)| a.as_str()).collect();
    let locators: BTreeSet<&str> = keys.iter().map(|(_, l)| l.as_str()).collect();

    RowQuery {
        file_id: file_id.to_string(),
        file_types: file_types.to_vec(),
        segment: location.segment,
        areas: areas.into_iter().map(str::to_string).collect(),
        locators: locators.into_iter().map(str::to_string).collect(),
        column,
    }
}
