//! Table metadata loaded from CSV

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use census_core::{ColumnLocation, Error, Result, TableMetadata};

use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;

/// Table identifier → segment and column, for one vintage.
///
/// CSV layout: `TABLE,SEGMENT,COLUMN`, where `COLUMN` is the one-based
/// position of the table in the published segment file.
#[derive(Debug, Clone, Default)]
pub struct CsvTableMetadata {
    tables: HashMap<String, ColumnLocation>,
}

impl CsvTableMetadata {
    /// Build metadata from `(table, location)` pairs
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnLocation)>,
        S: Into<String>,
    {
        Self {
            tables: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Read metadata from a CSV file
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read metadata from CSV
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Self> {
        let mut csv_reader = options.reader(reader);
        let mut tables = HashMap::new();

        for (idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = record
                .position()
                .map_or(idx + 1, |p| p.line() as usize);
            let parse_error = |column: usize, message: String| CsvError::Parse {
                row,
                column,
                message,
            };

            if record.len() < 3 {
                return Err(parse_error(
                    record.len(),
                    "expected TABLE,SEGMENT,COLUMN".into(),
                ));
            }

            let table = record[0].to_string();
            let column = record[2]
                .parse::<usize>()
                .map_err(|e| parse_error(2, format!("invalid column '{}': {}", &record[2], e)))?;
            let location = ColumnLocation {
                segment: record[1].to_string(),
                column,
            };

            if tables.insert(table.clone(), location).is_some() {
                return Err(parse_error(0, format!("duplicate table '{}'", table)));
            }
        }

        tracing::debug!(tables = tables.len(), "loaded table metadata");
        Ok(Self { tables })
    }

    /// Number of known tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if no tables are known
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableMetadata for CsvTableMetadata {
    fn locate(&self, table: &str) -> Result<ColumnLocation> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| Error::UnknownTable(table.to_string()))
    }
}
