//! In-memory row store loaded from CSV

use std::fs::File;
use std::io::Read;
use std::path::Path;

use census_core::{Result, RowCell, RowQuery, RowStore};

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;

/// Number of key columns before the data cells
const KEY_COLUMNS: usize = 5;

/// One stored summary-file row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub file_id: String,
    pub file_type: Option<String>,
    pub area: String,
    pub segment: String,
    pub locator: String,
    /// Data cells, after the key columns
    pub cells: Vec<String>,
}

impl StoredRow {
    /// Create a row with no file type
    pub fn new<S: Into<String>>(file_id: S, area: S, segment: S, locator: S, cells: Vec<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_type: None,
            area: area.into(),
            segment: segment.into(),
            locator: locator.into(),
            cells,
        }
    }

    /// Set the file type (e.g. `2010e5`)
    pub fn with_file_type<S: Into<String>>(mut self, file_type: S) -> Self {
        self.file_type = Some(file_type.into());
        self
    }
}

/// Row store holding every row in memory.
///
/// CSV layout: `FILEID,FILETYPE,STUSAB,CIFSN,LOGRECNO,<cells...>`. An empty
/// `FILETYPE` is stored as `None`.
#[derive(Debug, Clone, Default)]
pub struct CsvRowStore {
    rows: Vec<StoredRow>,
}

impl CsvRowStore {
    /// Build a store from rows
    pub fn from_rows(rows: Vec<StoredRow>) -> Self {
        Self { rows }
    }

    /// Read rows from a CSV file
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read rows from CSV
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Self> {
        let mut csv_reader = options.reader(reader);
        let mut rows = Vec::new();

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map_or(idx + 1, |p| p.line() as usize);

            if record.len() < KEY_COLUMNS {
                return Err(CsvError::Parse {
                    row,
                    column: record.len(),
                    message: format!("expected at least {} key columns", KEY_COLUMNS),
                });
            }

            let field = |i: usize| record.get(i).unwrap_or_default().to_string();
            let file_type = field(1);
            rows.push(StoredRow {
                file_id: field(0),
                file_type: (!file_type.is_empty()).then_some(file_type),
                area: field(2),
                segment: field(3),
                locator: field(4),
                cells: record.iter().skip(KEY_COLUMNS).map(str::to_string).collect(),
            });
        }

        tracing::debug!(rows = rows.len(), "loaded row store");
        Ok(Self { rows })
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowStore for CsvRowStore {
    fn fetch(&self, query: &RowQuery) -> Result<Vec<RowCell>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| {
                query.matches(
                    &row.file_id,
                    row.file_type.as_deref(),
                    &row.segment,
                    &row.area,
                    &row.locator,
                )
            })
            .map(|row| RowCell {
                area: row.area.clone(),
                locator: row.locator.clone(),
                file_type: row.file_type.clone(),
                text: row.cells.get(query.column).cloned(),
            })
            .collect())
    }
}
