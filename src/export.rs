//! CSV export of generated rows.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;

use crate::{
    error::{MetagenError, MetagenResult},
    io_utils,
    row::Row,
    schema::Schema,
};

const EXPORT_FILE_PREFIX: &str = "generated_metadata";

/// A directory destination gets a timestamped file inside it.
pub fn resolve_destination(dest: &Path, now: DateTime<Local>) -> PathBuf {
    if dest.is_dir() {
        dest.join(format!(
            "{EXPORT_FILE_PREFIX}_{}.csv",
            now.format("%Y%m%d_%H%M%S")
        ))
    } else {
        dest.to_path_buf()
    }
}

/// Writes the header plus one line per row; `None` or `-` writes to stdout.
///
/// Returns the file written, if any.
pub fn export_rows(
    schema: &Schema,
    rows: &[Row],
    dest: Option<&Path>,
    delimiter: Option<u8>,
) -> MetagenResult<Option<PathBuf>> {
    let target = dest
        .filter(|path| !io_utils::is_dash(path))
        .map(|path| resolve_destination(path, Local::now()));
    let export_error = |reason: String| MetagenError::Export {
        path: target.clone().unwrap_or_else(|| PathBuf::from("-")),
        reason,
    };
    if rows.is_empty() {
        return Err(export_error("no rows to export".to_string()));
    }
    let delimiter = io_utils::resolve_output_delimiter(target.as_deref(), delimiter);

    let mut writer = io_utils::open_csv_writer(target.as_deref(), delimiter)
        .map_err(|err| export_error(format!("{err:#}")))?;
    writer
        .write_record(schema.fields())
        .map_err(|err| export_error(format!("writing header: {err}")))?;
    for (idx, row) in rows.iter().enumerate() {
        if row.schema().as_ref() != schema {
            return Err(export_error(format!(
                "row {} was not built for this schema",
                idx + 1
            )));
        }
        writer
            .write_record(row.values())
            .map_err(|err| export_error(format!("writing row {}: {err}", idx + 1)))?;
    }
    writer
        .flush()
        .map_err(|err| export_error(format!("flushing output: {err}")))?;

    match &target {
        Some(path) => info!("Exported {} row(s) to {path:?}", rows.len()),
        None => info!("Exported {} row(s) to stdout", rows.len()),
    }
    Ok(target)
}
