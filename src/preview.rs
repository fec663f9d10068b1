//! Terminal preview of a row set, limited to columns that carry data.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::PreviewArgs, io_utils, row::Row, table};

/// Columns shown when every column is empty.
const EMPTY_PREVIEW_COLUMNS: usize = 5;

/// Indices of columns with at least one non-empty value, or the first few
/// columns when the whole set is blank.
pub fn visible_columns(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let populated = (0..headers.len())
        .filter(|idx| {
            rows.iter()
                .any(|row| row.get(*idx).is_some_and(|value| !value.is_empty()))
        })
        .collect::<Vec<_>>();
    if populated.is_empty() {
        (0..headers.len().min(EMPTY_PREVIEW_COLUMNS)).collect()
    } else {
        populated
    }
}

/// Renders up to `limit` rows (0 = all) of the visible columns.
pub fn render_preview(
    headers: &[String],
    rows: &[Vec<String>],
    limit: usize,
    max_width: usize,
) -> String {
    let columns = visible_columns(headers, rows);
    let shown = if limit == 0 { rows.len() } else { limit.min(rows.len()) };
    let project = |row: &[String]| {
        columns
            .iter()
            .map(|idx| row.get(*idx).cloned().unwrap_or_default())
            .collect::<Vec<_>>()
    };
    let visible_headers = project(headers);
    let visible_rows = rows[..shown]
        .iter()
        .map(|row| project(row.as_slice()))
        .collect::<Vec<_>>();
    let mut rendered = table::render_table(&visible_headers, &visible_rows, max_width);
    if shown < rows.len() {
        rendered.push_str(&format!("… {} more row(s)\n", rows.len() - shown));
    }
    rendered
}

pub fn render_rows(rows: &[Row], limit: usize, max_width: usize) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers = first.schema().fields().to_vec();
    let values = rows.iter().map(|row| row.values().to_vec()).collect::<Vec<_>>();
    render_preview(&headers, &values, limit, max_width)
}

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let mut reader = io_utils::open_csv_reader_from_path(&args.input, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        rows.push(io_utils::decode_record(&record, encoding)?);
    }

    print!("{}", render_preview(&headers, &rows, args.rows, args.max_width));
    info!(
        "Previewed {} of {} row(s) from {:?}",
        if args.rows == 0 { rows.len() } else { args.rows.min(rows.len()) },
        rows.len(),
        args.input
    );
    Ok(())
}
