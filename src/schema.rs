//! Heading schema for generated metadata rows.
//!
//! A [`Schema`] is the ordered list of field names read from the first row of
//! a headings file (for example the Alma-D verified CSV headings). It is
//! loaded once and then shared read-only, typically behind an `Arc`, by every
//! [`Row`](crate::row::Row) built against it.

use std::{collections::HashMap, path::Path};

use encoding_rs::Encoding;
use log::debug;

use crate::{
    error::{MetagenError, MetagenResult},
    io_utils,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from in-memory field names.
    pub fn new<I, S>(fields: I) -> MetagenResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect::<Vec<_>>();
        Self::validated(fields).map_err(|reason| MetagenError::SchemaLoad {
            origin: "inline headings".to_string(),
            reason,
        })
    }

    /// Reads the first row of a delimited headings file as the field list.
    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> MetagenResult<Self> {
        let load_error = |reason: String| MetagenError::SchemaLoad {
            origin: format!("{path:?}"),
            reason,
        };
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)
            .map_err(|err| load_error(format!("{err:#}")))?;
        let headers = io_utils::reader_headers(&mut reader, encoding)
            .map_err(|err| load_error(format!("{err:#}")))?;
        let schema = Self::validated(headers).map_err(load_error)?;
        debug!("Loaded {} heading(s) from {path:?}", schema.len());
        Ok(schema)
    }

    fn validated(fields: Vec<String>) -> Result<Self, String> {
        if fields.is_empty() || fields.iter().all(|field| field.is_empty()) {
            return Err("headings file contains no field names".to_string());
        }
        let mut positions = HashMap::with_capacity(fields.len());
        for (idx, field) in fields.iter().enumerate() {
            if field.is_empty() {
                return Err(format!("heading {} is blank", idx + 1));
            }
            if positions.insert(field.clone(), idx).is_some() {
                return Err(format!("duplicate heading '{field}'"));
            }
        }
        Ok(Schema { fields, positions })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.positions.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.positions.contains_key(field)
    }

    /// Maps each schema field to its index within `headers`.
    ///
    /// The header set must equal the schema's field set exactly; order may
    /// differ.
    pub fn align_headers(&self, headers: &[String]) -> MetagenResult<Vec<usize>> {
        let mut header_positions: HashMap<&str, usize> = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if header_positions.insert(header.as_str(), idx).is_some() {
                return Err(MetagenError::RowShape {
                    reason: format!("column '{header}' appears more than once"),
                });
            }
        }

        let missing = self
            .fields
            .iter()
            .filter(|field| !header_positions.contains_key(field.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        let extra = headers
            .iter()
            .filter(|header| !self.contains(header))
            .cloned()
            .collect::<Vec<_>>();
        if !missing.is_empty() || !extra.is_empty() {
            let mut parts = Vec::new();
            if !missing.is_empty() {
                parts.push(format!("missing {missing:?}"));
            }
            if !extra.is_empty() {
                parts.push(format!("unexpected {extra:?}"));
            }
            return Err(MetagenError::RowShape {
                reason: parts.join("; "),
            });
        }

        Ok(self
            .fields
            .iter()
            .map(|field| header_positions[field.as_str()])
            .collect())
    }
}
