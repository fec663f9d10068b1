//! Metadata merge engine.
//!
//! Given generated rows and an external [`MetadataTable`], the engine picks a
//! join column from an ordered [`MatchPriority`] list, finds the first
//! matching record for each row (exact value first, then normalized key), and
//! copies metadata values into empty row fields. Populated fields are never
//! overwritten and rows are never dropped.
//!
//! The engine works on a copy of the input rows; on error nothing is
//! returned and the caller's rows are untouched.

use std::{collections::HashMap, fmt};

use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    error::{MetagenError, MetagenResult},
    metadata::MetadataTable,
    normalize::normalize_key,
    profile::FieldRoles,
    row::Row,
};

/// Generic column names tried after the role-derived ones.
pub const FALLBACK_MATCH_COLUMNS: [&str; 4] = ["Title", "title", "Filename", "filename"];

/// Ordered list of metadata column names accepted as the join column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPriority {
    candidates: Vec<String>,
}

impl MatchPriority {
    /// Blank names are dropped and repeats keep their first position.
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = candidates
            .into_iter()
            .map(Into::into)
            .map(|name: String| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unique()
            .collect();
        MatchPriority { candidates }
    }

    /// `[filename, identifier, title, "Title", "title", "Filename", "filename"]`.
    pub fn from_roles(roles: &FieldRoles) -> Self {
        Self::new(
            [
                roles.filename.as_str(),
                roles.identifier.as_str(),
                roles.title.as_str(),
            ]
            .into_iter()
            .chain(FALLBACK_MATCH_COLUMNS),
        )
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// First candidate present among `columns`.
    pub fn select<'a>(&'a self, columns: &[String]) -> MetagenResult<&'a str> {
        self.candidates
            .iter()
            .find(|candidate| columns.contains(candidate))
            .map(String::as_str)
            .ok_or_else(|| MetagenError::NoMatchColumn {
                tried: self.candidates.clone(),
            })
    }
}

impl Default for MatchPriority {
    fn default() -> Self {
        Self::from_roles(&FieldRoles::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Normalized,
}

/// Lookup maps over one metadata column, keeping the first record per key.
#[derive(Debug)]
pub struct MatchIndex<'a> {
    exact: HashMap<&'a str, usize>,
    normalized: HashMap<String, usize>,
    shadowed: usize,
}

impl<'a> MatchIndex<'a> {
    pub fn build(metadata: &'a MetadataTable, column: usize) -> Self {
        let mut exact = HashMap::with_capacity(metadata.len());
        let mut normalized = HashMap::with_capacity(metadata.len());
        let mut shadowed = 0usize;
        for (record_idx, value) in metadata.column_values(column).enumerate() {
            if value.is_empty() {
                continue;
            }
            exact.entry(value).or_insert(record_idx);
            let key = normalize_key(value);
            if key.is_empty() {
                continue;
            }
            match normalized.get(&key) {
                Some(first) => {
                    shadowed += 1;
                    debug!(
                        "Metadata record {} shares normalized key '{key}' with record {}; keeping the first",
                        record_idx + 2,
                        first + 2
                    );
                }
                None => {
                    normalized.insert(key, record_idx);
                }
            }
        }
        MatchIndex {
            exact,
            normalized,
            shadowed,
        }
    }

    pub fn lookup(&self, filename: &str) -> Option<(usize, MatchKind)> {
        if let Some(idx) = self.exact.get(filename) {
            return Some((*idx, MatchKind::Exact));
        }
        let key = normalize_key(filename);
        if key.is_empty() {
            return None;
        }
        self.normalized
            .get(&key)
            .map(|idx| (*idx, MatchKind::Normalized))
    }

    /// Records hidden behind an earlier record with the same normalized key.
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }
}

/// Counts reported after a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub match_column: String,
    pub total_rows: usize,
    /// Rows that received at least one field.
    pub merged_rows: usize,
    pub merged_fields: usize,
    pub exact_matches: usize,
    pub normalized_matches: usize,
    pub unmatched_rows: usize,
    /// Rows with an empty filename field.
    pub skipped_rows: usize,
}

impl MergeSummary {
    pub fn matched_rows(&self) -> usize {
        self.exact_matches + self.normalized_matches
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Merged {} field(s) into {} of {} row(s) using column '{}'",
            self.merged_fields, self.merged_rows, self.total_rows, self.match_column
        )
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub rows: Vec<Row>,
    pub summary: MergeSummary,
}

/// Merges `metadata` into a copy of `rows`, joining on `filename_field`.
pub fn merge(
    rows: &[Row],
    metadata: &MetadataTable,
    priority: &MatchPriority,
    filename_field: &str,
) -> MetagenResult<MergeOutcome> {
    let match_column = priority.select(metadata.columns())?;
    let column_idx = metadata
        .column_index(match_column)
        .ok_or_else(|| MetagenError::NoMatchColumn {
            tried: priority.candidates().to_vec(),
        })?;
    debug!("Matching rows on metadata column '{match_column}'");
    if rows
        .first()
        .is_some_and(|row| !row.schema().contains(filename_field))
    {
        warn!("Filename field '{filename_field}' is not in the schema; no row can be matched");
    }

    let index = MatchIndex::build(metadata, column_idx);
    let mut summary = MergeSummary {
        match_column: match_column.to_string(),
        total_rows: rows.len(),
        ..MergeSummary::default()
    };
    let mut merged = rows.to_vec();

    for (row_idx, row) in merged.iter_mut().enumerate() {
        let filename = row.get(filename_field).unwrap_or_default();
        if filename.is_empty() {
            summary.skipped_rows += 1;
            debug!("Row {} has no '{filename_field}' value; skipped", row_idx + 1);
            continue;
        }
        let Some((record_idx, kind)) = index.lookup(filename) else {
            summary.unmatched_rows += 1;
            debug!("Row {} ('{filename}') matched no metadata record", row_idx + 1);
            continue;
        };
        match kind {
            MatchKind::Exact => summary.exact_matches += 1,
            MatchKind::Normalized => summary.normalized_matches += 1,
        }
        debug!(
            "Row {} ('{filename}') matched metadata record {} ({kind:?})",
            row_idx + 1,
            record_idx + 2
        );

        let copied = merge_record(row, metadata, record_idx);
        if copied > 0 {
            summary.merged_rows += 1;
            summary.merged_fields += copied;
        }
    }

    if index.shadowed() > 0 {
        debug!(
            "{} metadata record(s) were unreachable behind duplicate normalized keys",
            index.shadowed()
        );
    }
    info!("{summary}");
    Ok(MergeOutcome {
        rows: merged,
        summary,
    })
}

fn merge_record(row: &mut Row, metadata: &MetadataTable, record_idx: usize) -> usize {
    let Some(record) = metadata.record(record_idx) else {
        return 0;
    };
    let mut copied = 0usize;
    for (column, value) in record.iter() {
        let Some(position) = row.schema().position(column) else {
            continue;
        };
        if row.fill_if_empty_at(position, value) {
            copied += 1;
        }
    }
    copied
}
