//! Session state: the current row snapshot plus the schema it belongs to.
//!
//! All mutation goes through a single lock and replaces the snapshot
//! wholesale, so a failed generate or merge leaves the previous rows in
//! place.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::info;

use crate::{
    error::MetagenResult,
    export,
    generate::generate_rows,
    merge::{self, MatchPriority, MergeSummary},
    metadata::MetadataTable,
    profile::{FieldRoles, Profile},
    row::{self, Row},
    schema::Schema,
};

#[derive(Debug)]
pub struct Session {
    schema: Arc<Schema>,
    roles: FieldRoles,
    priority: MatchPriority,
    rows: Mutex<Vec<Row>>,
}

impl Session {
    pub fn new(schema: Arc<Schema>, profile: &Profile) -> Self {
        Session {
            schema,
            roles: profile.roles.clone(),
            priority: profile.match_priority(),
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn roles(&self) -> &FieldRoles {
        &self.roles
    }

    pub fn match_priority(&self) -> &MatchPriority {
        &self.priority
    }

    // The snapshot is only ever swapped whole, so a poisoned lock still guards
    // consistent data. Nothing under the lock panics in practice; the unit
    // test below poisons it by hand.
    fn lock(&self) -> MutexGuard<'_, Vec<Row>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the snapshot with fresh rows; returns how many were generated.
    pub fn generate<P: AsRef<Path>>(&self, paths: &[P]) -> MetagenResult<usize> {
        let mut rows = self.lock();
        let generated = generate_rows(&self.schema, &self.roles, paths)?;
        *rows = generated;
        info!("Generated {} CSV row(s)", rows.len());
        Ok(rows.len())
    }

    /// Replaces the snapshot with rows read elsewhere.
    pub fn replace_rows(&self, replacement: Vec<Row>) -> MetagenResult<usize> {
        row::ensure_schema(&self.schema, &replacement)?;
        let mut rows = self.lock();
        *rows = replacement;
        Ok(rows.len())
    }

    pub fn merge(&self, metadata: &MetadataTable) -> MetagenResult<MergeSummary> {
        let mut rows = self.lock();
        let outcome = merge::merge(&rows, metadata, &self.priority, &self.roles.filename)?;
        *rows = outcome.rows;
        Ok(outcome.summary)
    }

    /// Drops every row; returns how many were held.
    pub fn clear(&self) -> usize {
        let mut rows = self.lock();
        let cleared = rows.len();
        rows.clear();
        info!("Cleared {cleared} generated row(s)");
        cleared
    }

    pub fn rows(&self) -> Vec<Row> {
        self.lock().clone()
    }

    pub fn row_count(&self) -> usize {
        self.lock().len()
    }

    pub fn export(&self, dest: Option<&Path>, delimiter: Option<u8>) -> MetagenResult<Option<PathBuf>> {
        let rows = self.lock();
        export::export_rows(&self.schema, &rows, dest, delimiter)
    }
}
