//! Row generation from selected file paths.
//!
//! Each path yields one blank row with the filename field set to the file's
//! name and the title field set to its stem. Only the path strings are used;
//! files are never opened.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    error::{MetagenError, MetagenResult},
    io_utils,
    normalize::file_stem,
    profile::FieldRoles,
    row::Row,
    schema::Schema,
};

pub fn generate_rows<P>(
    schema: &Arc<Schema>,
    roles: &FieldRoles,
    paths: &[P],
) -> MetagenResult<Vec<Row>>
where
    P: AsRef<Path>,
{
    if paths.is_empty() {
        return Err(MetagenError::NoSelection);
    }
    let rows = paths
        .iter()
        .map(|path| row_for_path(schema, roles, path.as_ref()))
        .collect::<Vec<_>>();
    debug!("Generated {} row(s) from file paths", rows.len());
    Ok(rows)
}

fn row_for_path(schema: &Arc<Schema>, roles: &FieldRoles, path: &Path) -> Row {
    let filename = file_name_of(path);
    let mut row = Row::blank(schema);
    row.set(&roles.filename, filename.as_str());
    row.set(&roles.title, file_stem(&filename));
    row
}

fn file_name_of(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// Where the command line gathers file paths from.
#[derive(Debug, Default, Clone)]
pub struct PathSources<'a> {
    pub paths: &'a [PathBuf],
    pub files_from: Option<&'a Path>,
    pub dir: Option<&'a Path>,
    pub extensions: &'a [String],
}

/// Collects paths in order: explicit paths, then the list file, then the directory scan.
pub fn collect_paths(sources: &PathSources<'_>) -> Result<Vec<PathBuf>> {
    let mut collected = sources.paths.to_vec();
    if let Some(list) = sources.files_from {
        let listed = io_utils::read_path_list(list)?;
        info!("Read {} path(s) from {list:?}", listed.len());
        collected.extend(listed);
    }
    if let Some(dir) = sources.dir {
        let scanned = scan_directory(dir, sources.extensions)?;
        info!("Found {} file(s) in {dir:?}", scanned.len());
        collected.extend(scanned);
    }
    Ok(collected)
}

/// Lists regular, non-hidden files directly inside `dir`, sorted by name.
pub fn scan_directory(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let wanted = extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect::<Vec<_>>();

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Reading directory {dir:?}"))? {
        let entry = entry.with_context(|| format!("Reading entry in {dir:?}"))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || !path.is_file() {
            continue;
        }
        if !wanted.is_empty() {
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
            if !extension.is_some_and(|ext| wanted.contains(&ext)) {
                continue;
            }
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}
