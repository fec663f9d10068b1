use std::borrow::Cow;
use std::fmt::Write as _;

const ELLIPSIS: char = '…';
const COLUMN_GAP: &str = "  ";

/// Renders an aligned plain-text table.
///
/// Cells wider than `max_width` characters are cut and end in `…`; a
/// `max_width` of 0 disables truncation.
pub fn render_table(headers: &[String], rows: &[Vec<String>], max_width: usize) -> String {
    let headers = headers
        .iter()
        .map(|header| fit_cell(header, max_width))
        .collect::<Vec<_>>();
    let rows = rows
        .iter()
        .map(|row| {
            row.iter()
                .take(headers.len())
                .map(|cell| fit_cell(cell, max_width))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut widths = headers
        .iter()
        .map(|header| display_width(header).max(3))
        .collect::<Vec<_>>();
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(&headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str(COLUMN_GAP);
        }
        let cell = cell.as_ref();
        line.push_str(cell);
        let padding = width.saturating_sub(display_width(cell));
        line.extend(std::iter::repeat_n(' ', padding));
    }
    line.truncate(line.trim_end().len());
    line
}

fn fit_cell(value: &str, max_width: usize) -> String {
    let sanitized = sanitize_cell(value);
    if max_width == 0 || display_width(&sanitized) <= max_width {
        return sanitized.into_owned();
    }
    let mut cut = sanitized
        .chars()
        .take(max_width.saturating_sub(1))
        .collect::<String>();
    cut.push(ELLIPSIS);
    cut
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
