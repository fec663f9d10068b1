//! External metadata tables and their loader.
//!
//! A [`MetadataTable`] is read once from a delimited file, every cell kept as
//! plain text, and is never mutated afterwards. The merge engine only ever
//! sees an already-parsed table.

use std::{collections::HashMap, path::Path};

use encoding_rs::Encoding;
use log::info;

use crate::{
    error::{MetagenError, MetagenResult},
    io_utils,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    records: Vec<Vec<String>>,
}

/// A borrowed view of one metadata record.
#[derive(Debug, Clone, Copy)]
pub struct MetadataRecord<'a> {
    table: &'a MetadataTable,
    values: &'a [String],
}

impl MetadataTable {
    /// Records shorter than the column list are padded with empty cells and
    /// longer ones truncated.
    pub fn new(columns: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            positions.entry(column.clone()).or_insert(idx);
        }
        let width = columns.len();
        let records = records
            .into_iter()
            .map(|mut record| {
                record.resize(width, String::new());
                record
            })
            .collect();
        MetadataTable {
            columns,
            positions,
            records,
        }
    }

    /// Convenience constructor from string slices.
    pub fn from_rows<C, R, V>(columns: &[C], rows: &[R]) -> Self
    where
        C: AsRef<str>,
        R: AsRef<[V]>,
        V: AsRef<str>,
    {
        let columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let records = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|v| v.as_ref().to_string()).collect())
            .collect();
        Self::new(columns, records)
    }

    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> MetagenResult<Self> {
        let load_error = |reason: String| MetagenError::MetadataLoad {
            path: path.to_path_buf(),
            reason,
        };
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)
            .map_err(|err| load_error(format!("{err:#}")))?;
        let columns = io_utils::reader_headers(&mut reader, encoding)
            .map_err(|err| load_error(format!("{err:#}")))?;
        if columns.iter().all(|column| column.is_empty()) {
            return Err(load_error("no header row".to_string()));
        }

        let mut records = Vec::new();
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record =
                record.map_err(|err| load_error(format!("row {}: {err}", row_idx + 2)))?;
            let decoded = io_utils::decode_record(&record, encoding)
                .map_err(|err| load_error(format!("row {}: {err:#}", row_idx + 2)))?;
            records.push(decoded);
        }
        info!(
            "Loaded {} metadata record(s) with {} column(s) from {path:?}",
            records.len(),
            columns.len()
        );
        Ok(Self::new(columns, records))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// First position of `column`; later duplicates are shadowed.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, idx: usize) -> Option<MetadataRecord<'_>> {
        self.records.get(idx).map(|values| MetadataRecord {
            table: self,
            values,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = MetadataRecord<'_>> {
        self.records.iter().map(move |values| MetadataRecord {
            table: self,
            values,
        })
    }

    pub(crate) fn column_values(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.records.iter().map(move |record| record[idx].as_str())
    }
}

impl<'a> MetadataRecord<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let values = self.values;
        self.table
            .column_index(column)
            .map(|idx| values[idx].as_str())
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }

    /// `(column, value)` pairs in table column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + use<'a> {
        let (table, values) = (self.table, self.values);
        table
            .columns
            .iter()
            .map(String::as_str)
            .zip(values.iter().map(String::as_str))
    }
}
