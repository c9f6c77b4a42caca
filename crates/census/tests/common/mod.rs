//! Shared fixtures for census integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use census::prelude::*;
use census::{Decimal, Result, RowCell, RowQuery, RowStore};

/// Wraps a store and records every query
#[derive(Debug)]
pub struct RecordingStore {
    inner: CsvRowStore,
    queries: Mutex<Vec<RowQuery>>,
}

impl RecordingStore {
    pub fn new(inner: CsvRowStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<RowQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl RowStore for RecordingStore {
    fn fetch(&self, query: &RowQuery) -> Result<Vec<RowCell>> {
        self.queries.lock().unwrap().push(query.clone());
        self.inner.fetch(query)
    }
}

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn location(segment: &str, column: usize) -> ColumnLocation {
    ColumnLocation {
        segment: segment.into(),
        column,
    }
}

/// Census 2000 SF1/SF3 rows
pub fn decennial_store() -> Arc<RecordingStore> {
    RecordingStore::new(CsvRowStore::from_rows(vec![
        StoredRow::new("uSF1", "CA", "01", "0000001", cells(&["100", "40"])),
        StoredRow::new("uSF1", "CA", "01", "0000002", cells(&["200", "."])),
        StoredRow::new("uSF1", "NV", "01", "0000001", cells(&["300", "150"])),
        StoredRow::new("uSF1", "CA", "02", "0000001", cells(&["7"])),
        StoredRow::new("uSF3", "CA", "01", "0000001", cells(&["999", "999"])),
    ]))
}

/// Metadata for the decennial fixtures (four key columns)
pub fn decennial_metadata() -> Arc<CsvTableMetadata> {
    Arc::new(CsvTableMetadata::from_entries([
        ("P001001", location("01", 5)),
        ("P001002", location("01", 6)),
        ("P003001", location("02", 5)),
        ("P009999", location("01", 3)),
    ]))
}

fn acs_row(file_type: &str, locator: &str, values: &[&str]) -> StoredRow {
    StoredRow::new("ACSSF", "ca", "0001", locator, cells(values)).with_file_type(file_type)
}

/// ACS 2010 5-year rows, with a stray 2009 row
pub fn acs_store() -> Arc<RecordingStore> {
    RecordingStore::new(CsvRowStore::from_rows(vec![
        // Full pair
        acs_row("2010e5", "0000001", &["1000", "480"]),
        acs_row("2010m5", "0000001", &["30", "20"]),
        // Estimate only
        acs_row("2010e5", "0000002", &["500", "250"]),
        // MOE only
        acs_row("2010m5", "0000003", &["12", "5"]),
        // Unreadable cells
        acs_row("2010e5", "0000004", &["(X)", "10"]),
        acs_row("2010m5", "0000004", &["15", "**"]),
        // Other release
        acs_row("2009e5", "0000001", &["1", "1"]),
    ]))
}

/// Metadata for the ACS fixtures (five key columns)
pub fn acs_metadata() -> Arc<CsvTableMetadata> {
    Arc::new(CsvTableMetadata::from_entries([
        ("B01001_001", location("0001", 6)),
        ("B01001_002", location("0001", 7)),
    ]))
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Assert a decimal is within 1e-9 of `expected`
pub fn assert_close(actual: Option<Decimal>, expected: &str) {
    let actual = actual.expect("expected a value");
    assert!(
        (actual - dec(expected)).abs() < dec("0.000000001"),
        "{} != {}",
        actual,
        expected
    );
}
