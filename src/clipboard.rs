use log::warn;

use crate::error::ExportError;
use crate::grid::{CellEdit, Grid};

/// Parse text copied from a spreadsheet into rows of cell values
///
/// Spreadsheet applications put tab-separated rows on the clipboard. Fields that
/// contain tabs, newlines or quotes are wrapped in double quotes, with inner quotes
/// doubled. Line endings may be `\n` or `\r\n`, and a trailing line break is ignored.
///
/// # Arguments
/// * `text` - Clipboard contents
///
/// # Returns
/// * `Vec<Vec<String>>` - One entry per pasted row
///
/// # Examples
/// ```
/// use dimgrid::clipboard::parse_clipboard;
///
/// let rows = parse_clipboard("a\tb\r\nc\td\r\n");
/// assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
/// ```
pub fn parse_clipboard(text: &str) -> Vec<Vec<String>> {
    parse_delimited(text, b'\t')
}

/// Parse delimited text (CSV with `b','`, TSV with `b'\t'`) into rows of fields.
///
/// Rows may have different lengths. Blank lines carry no fields and are skipped.
pub fn parse_delimited(text: &str, delimiter: u8) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            Err(e) => warn!("skipping unreadable pasted row {}: {}", line + 1, e),
        }
    }
    rows
}

/// Turn a pasted block anchored at (`row`, `col`) into cell edits.
///
/// A position past `usize::MAX` is clamped to `usize::MAX`, which lies beyond
/// every row and column limit, so the grid reports it instead of wrapping to 0.
pub fn block_to_edits(block: &[Vec<String>], row: usize, col: usize) -> Vec<CellEdit> {
    block
        .iter()
        .enumerate()
        .flat_map(|(r, values)| {
            let target_row = row.checked_add(r).unwrap_or(usize::MAX);
            values.iter().enumerate().map(move |(c, value)| CellEdit {
                row: target_row,
                col: col.checked_add(c).unwrap_or(usize::MAX),
                value: value.clone(),
            })
        })
        .collect()
}

/// Render the table as delimited text
///
/// The first line holds the column labels, then one line per row with the
/// display values. Fields containing the delimiter, quotes or line breaks are
/// quoted and inner quotes doubled.
///
/// # Arguments
/// * `grid` - The table to render
/// * `delimiter` - Field separator, `b','` for CSV or `b'\t'` for the clipboard
///
/// # Returns
/// * `Result<String, ExportError>` - Delimited text ending with a newline
pub fn to_delimited(grid: &Grid, delimiter: u8) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(grid.headers().iter().map(|h| h.label.as_str()))?;
    for row in grid.data() {
        writer.write_record(row.iter().map(|c| c.value.as_str()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn to_csv(grid: &Grid) -> Result<String, ExportError> {
    to_delimited(grid, b',')
}
