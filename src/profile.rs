//! Field roles and match configuration, optionally loaded from a YAML profile.
//!
//! ```yaml
//! headings: _data/verified_CSV_headings_for_Alma-D.csv
//! roles:
//!   filename: file_name_1
//!   title: dc:title
//!   identifier: dc:identifier
//! match_columns: [file_name_1, Filename]
//! ```
//!
//! Every key is optional; omitted keys fall back to the Alma-D defaults.

use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::{
    error::{MetagenError, MetagenResult},
    merge::MatchPriority,
};

pub const DEFAULT_FILENAME_FIELD: &str = "file_name_1";
pub const DEFAULT_TITLE_FIELD: &str = "dc:title";
pub const DEFAULT_IDENTIFIER_FIELD: &str = "dc:identifier";

/// Schema fields with a designated purpose during generation and matching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldRoles {
    /// Receives the file's name, extension included; also the join key for merging.
    pub filename: String,
    /// Receives the file's name without extension.
    pub title: String,
    pub identifier: String,
}

impl Default for FieldRoles {
    fn default() -> Self {
        FieldRoles {
            filename: DEFAULT_FILENAME_FIELD.to_string(),
            title: DEFAULT_TITLE_FIELD.to_string(),
            identifier: DEFAULT_IDENTIFIER_FIELD.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// Headings file used when `--schema` is not given.
    pub headings: Option<PathBuf>,
    pub roles: FieldRoles,
    /// Replaces the default metadata join-column priority list.
    pub match_columns: Option<Vec<String>>,
}

impl Profile {
    pub fn load(path: &Path) -> MetagenResult<Self> {
        let profile_error = |reason: String| MetagenError::Profile {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|err| profile_error(err.to_string()))?;
        let profile: Profile = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| profile_error(err.to_string()))?;
        if let Some(columns) = &profile.match_columns {
            if columns.iter().all(|column| column.trim().is_empty()) {
                return Err(profile_error(
                    "match_columns must name at least one column".to_string(),
                ));
            }
        }
        Ok(profile)
    }

    pub fn match_priority(&self) -> MatchPriority {
        match &self.match_columns {
            Some(columns) => MatchPriority::new(columns.iter().cloned()),
            None => MatchPriority::from_roles(&self.roles),
        }
    }
}
