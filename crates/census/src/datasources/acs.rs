//! American Community Survey 5-year files
//!
//! Every geography has two stored rows sharing a record locator: one with
//! the estimate (`<year>e5`) and one with the margin of error (`<year>m5`).

use std::sync::Arc;

use ahash::AHashMap;
use census_core::{Decimal, Error, Geography, RowStore, TableMetadata, Value};
use census_formula::{Datasource, FormulaResult};

use super::{batch_query, data_column, row_keys, AreaCase, RowKey};

/// Key columns before the data cells: FILEID, FILETYPE, STUSAB, CHARITER, SEQUENCE
const HEADER_WIDTH: usize = 5;

/// Releases with a supported file layout
pub const SUPPORTED_YEARS: [u16; 2] = [2009, 2010];

/// Datasource for a 5-year ACS release
#[derive(Debug, Clone)]
pub struct AcsSource {
    name: String,
    estimate_type: String,
    moe_type: String,
    store: Arc<dyn RowStore>,
    metadata: Arc<dyn TableMetadata>,
}

/// The two halves of one geography's value as they are found
#[derive(Debug, Default, Clone, Copy)]
struct PairedRows {
    /// Outer `None`: no estimate row. Inner `None`: unreadable text.
    estimate: Option<Option<Decimal>>,
    moe: Option<Option<Decimal>>,
}

impl PairedRows {
    /// A missing row counts as zero; a row with unreadable text is unknown
    fn finish(&self) -> Value {
        if self.estimate.is_none() && self.moe.is_none() {
            return Value::unknown();
        }
        Value::from_parts(
            self.estimate.unwrap_or(Some(Decimal::ZERO)),
            self.moe.unwrap_or(Some(Decimal::ZERO)),
        )
    }
}

impl AcsSource {
    /// 5-year release ending in `year`
    pub fn new(
        year: u16,
        store: Arc<dyn RowStore>,
        metadata: Arc<dyn TableMetadata>,
    ) -> census_core::Result<Self> {
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(Error::UnsupportedVintage(format!(
                "ACS {} 5-year is not supported",
                year
            )));
        }
        Ok(Self {
            name: format!("acs{}e5", year),
            estimate_type: format!("{}e5", year),
            moe_type: format!("{}m5", year),
            store,
            metadata,
        })
    }
}

impl Datasource for AcsSource {
    fn resolve(&self, table: &str, geographies: &[Geography]) -> FormulaResult<Vec<Value>> {
        let keys = row_keys(geographies, AreaCase::Lower)?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let location = self.metadata.locate(table)?;
        let column = data_column(table, &location, HEADER_WIDTH)?;
        let file_types = [self.estimate_type.clone(), self.moe_type.clone()];
        let query = batch_query("ACSSF", &file_types, location, column, &keys);
        let cells = self.store.fetch(&query)?;

        tracing::debug!(
            source = %self.name,
            table,
            segment = %query.segment,
            column,
            geographies = keys.len(),
            rows = cells.len(),
            "batched estimate/moe lookup"
        );

        let mut groups: AHashMap<RowKey, PairedRows> = keys
            .iter()
            .map(|key| (key.clone(), PairedRows::default()))
            .collect();

        for cell in cells {
            let key = (AreaCase::Lower.apply(&cell.area), cell.locator);
            let group = match groups.get_mut(&key) {
                Some(group) => group,
                None => {
                    tracing::trace!(area = %key.0, locator = %key.1, "ignoring row outside requested geographies");
                    continue;
                }
            };

            let number = cell.text.as_deref().and_then(Value::parse_number);
            match cell.file_type.as_deref() {
                Some(t) if t == self.estimate_type => group.estimate = Some(number),
                Some(t) if t == self.moe_type => group.moe = Some(number),
                other => {
                    tracing::warn!(file_type = ?other, "unexpected ACS file type");
                }
            }
        }

        Ok(keys
            .iter()
            .map(|key| groups.get(key).map(PairedRows::finish).unwrap_or_default())
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
