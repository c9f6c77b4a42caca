//! Decennial census summary files
//!
//! One stored row per geography holds the value directly.

use std::sync::Arc;

use ahash::AHashMap;
use census_core::{Error, Geography, RowStore, TableMetadata, Value};
use census_formula::{Datasource, FormulaResult};

use super::{batch_query, data_column, row_keys, AreaCase, RowKey};

/// Key columns before the data cells: FILEID, STUSAB, CIFSN, LOGRECNO
const HEADER_WIDTH: usize = 4;

/// Datasource for a decennial census summary file
#[derive(Debug, Clone)]
pub struct DecennialSource {
    name: String,
    file_id: &'static str,
    store: Arc<dyn RowStore>,
    metadata: Arc<dyn TableMetadata>,
}

impl DecennialSource {
    /// Census 2000, summary file `SF1` or `SF3`
    pub fn census2000(
        summary_file: &str,
        store: Arc<dyn RowStore>,
        metadata: Arc<dyn TableMetadata>,
    ) -> census_core::Result<Self> {
        let file_id = match summary_file {
            "SF1" => "uSF1",
            "SF3" => "uSF3",
            other => {
                return Err(Error::UnsupportedVintage(format!(
                    "{} is not a supported 2000 summary file",
                    other
                )))
            }
        };
        Ok(Self {
            name: format!("census2000-{}", summary_file.to_lowercase()),
            file_id,
            store,
            metadata,
        })
    }

    /// Census 2010, file type `pl` or `sf1`
    pub fn census2010(
        file_type: &str,
        store: Arc<dyn RowStore>,
        metadata: Arc<dyn TableMetadata>,
    ) -> census_core::Result<Self> {
        let file_id = match file_type {
            "pl" => "PLST",
            "sf1" => "SF1ST",
            other => {
                return Err(Error::UnsupportedVintage(format!(
                    "{} is not a supported 2010 file type",
                    other
                )))
            }
        };
        Ok(Self {
            name: format!("census2010-{}", file_type),
            file_id,
            store,
            metadata,
        })
    }

    /// File identifier rows are filtered on
    pub fn file_id(&self) -> &str {
        self.file_id
    }
}

impl Datasource for DecennialSource {
    fn resolve(&self, table: &str, geographies: &[Geography]) -> FormulaResult<Vec<Value>> {
        let keys = row_keys(geographies, AreaCase::Upper)?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let location = self.metadata.locate(table)?;
        let column = data_column(table, &location, HEADER_WIDTH)?;
        let query = batch_query(self.file_id, &[], location, column, &keys);
        let cells = self.store.fetch(&query)?;

        tracing::debug!(
            source = %self.name,
            table,
            segment = %query.segment,
            column,
            geographies = keys.len(),
            rows = cells.len(),
            "batched row lookup"
        );

        let mut values: AHashMap<RowKey, Value> = AHashMap::with_capacity(cells.len());
        for cell in cells {
            let key = (AreaCase::Upper.apply(&cell.area), cell.locator);
            let value = cell
                .text
                .as_deref()
                .and_then(Value::from_text)
                .unwrap_or_default();
            values.insert(key, value);
        }

        Ok(keys
            .iter()
            .map(|key| values.get(key).copied().unwrap_or_default())
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
