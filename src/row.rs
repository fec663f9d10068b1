//! Metadata rows bound to a [`Schema`].
//!
//! A [`Row`] stores one value per schema field, in schema order, so it always
//! carries exactly the schema's key set. Values are plain strings; an empty
//! string means "not yet populated".

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use encoding_rs::Encoding;

use crate::{
    error::{MetagenError, MetagenResult},
    io_utils,
    schema::Schema,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    schema: Arc<Schema>,
    values: Vec<String>,
}

impl Row {
    /// A row with every schema field set to the empty string.
    pub fn blank(schema: &Arc<Schema>) -> Self {
        Row {
            schema: Arc::clone(schema),
            values: vec![String::new(); schema.len()],
        }
    }

    /// Builds a row from `(field, value)` pairs naming every schema field once.
    pub fn from_pairs<K, V>(schema: &Arc<Schema>, pairs: &[(K, V)]) -> MetagenResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let headers = pairs
            .iter()
            .map(|(key, _)| key.as_ref().to_string())
            .collect::<Vec<_>>();
        let mapping = schema.align_headers(&headers)?;
        let values = mapping
            .iter()
            .map(|idx| pairs[*idx].1.as_ref().to_string())
            .collect();
        Ok(Row {
            schema: Arc::clone(schema),
            values,
        })
    }

    /// Builds a row from a record laid out per `mapping` (see [`Schema::align_headers`]).
    pub fn from_aligned(schema: &Arc<Schema>, mapping: &[usize], record: &[String]) -> Self {
        let values = mapping
            .iter()
            .map(|idx| record.get(*idx).cloned().unwrap_or_default())
            .collect();
        Row {
            schema: Arc::clone(schema),
            values,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.schema
            .position(field)
            .map(|idx| self.values[idx].as_str())
    }

    /// Overwrites `field`; returns false when the schema has no such field.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.schema.position(field) {
            Some(idx) => {
                self.values[idx] = value.into();
                true
            }
            None => false,
        }
    }

    /// Writes `value` at `position` only when the slot is empty and `value` is not.
    pub fn fill_if_empty_at(&mut self, position: usize, value: &str) -> bool {
        match self.values.get_mut(position) {
            Some(slot) if slot.is_empty() && !value.is_empty() => {
                value.clone_into(slot);
                true
            }
            _ => false,
        }
    }

    pub fn fill_if_empty(&mut self, field: &str, value: &str) -> bool {
        self.schema
            .position(field)
            .is_some_and(|idx| self.fill_if_empty_at(idx, value))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schema
            .fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn populated_count(&self) -> usize {
        self.values.iter().filter(|value| !value.is_empty()).count()
    }
}

/// Re-reads a previously exported row set, validating its header against `schema`.
pub fn load_rows(
    path: &Path,
    schema: &Arc<Schema>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<Row>> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mapping = schema
        .align_headers(&headers)
        .with_context(|| format!("Validating headers for {path:?}"))?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {} in {path:?}", row_idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)?;
        rows.push(Row::from_aligned(schema, &mapping, &decoded));
    }
    Ok(rows)
}

pub(crate) fn ensure_schema(schema: &Arc<Schema>, rows: &[Row]) -> MetagenResult<()> {
    match rows.iter().find(|row| row.schema() != schema) {
        Some(row) => Err(MetagenError::RowShape {
            reason: format!(
                "row built for {} field(s) does not belong to this {}-field schema",
                row.schema().len(),
                schema.len()
            ),
        }),
        None => Ok(()),
    }
}
