//! Error taxonomy shared by the generator, merge engine, and their collaborators.
//!
//! Every variant is recoverable at the command level: the failing operation
//! leaves previously generated rows untouched and can simply be retried.

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetagenError {
    /// Heading file missing, unreadable, empty, or carrying duplicate names.
    #[error("Failed to load CSV headings from {origin}: {reason}")]
    SchemaLoad { origin: String, reason: String },

    /// Generation was requested without any file paths.
    #[error("No files selected; supply paths, --files-from, or --dir")]
    NoSelection,

    /// External metadata table could not be read or parsed.
    #[error("Failed to load metadata from {path:?}: {reason}")]
    MetadataLoad { path: PathBuf, reason: String },

    /// None of the accepted join columns appear in the metadata table.
    #[error(
        "Metadata has no column to match on; expected one of: {}",
        .tried.iter().map(|name| format!("'{name}'")).join(", ")
    )]
    NoMatchColumn { tried: Vec<String> },

    /// A row set does not carry exactly the schema's key set.
    #[error("Row columns do not match the schema: {reason}")]
    RowShape { reason: String },

    #[error("Failed to export rows to {path:?}: {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("Failed to load profile from {path:?}: {reason}")]
    Profile { path: PathBuf, reason: String },
}

pub type MetagenResult<T> = std::result::Result<T, MetagenError>;
