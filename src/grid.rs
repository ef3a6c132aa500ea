use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::cell::{Cell, ColumnDescriptor, DataType, MIN_COLUMN_WIDTH, default_column_label};
use crate::error::GridError;

/// Default row cap of a table
pub const DEFAULT_MAX_ROWS: usize = 500;
/// A table never has fewer columns than this
pub const MIN_COLUMNS: usize = 2;
/// Default column cap of a table
pub const DEFAULT_MAX_COLUMNS: usize = 256;
/// Columns in a freshly seeded table
pub const SEED_COLUMNS: usize = 3;

/// One cell write requested by the user, either typed or pasted.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CellEdit {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

impl CellEdit {
    pub fn new(row: usize, col: usize, value: &str) -> Self {
        CellEdit {
            row,
            col,
            value: value.to_string(),
        }
    }
}

/// Outcome of [`Grid::apply_cell_edits`]. Rejected edits never abort the batch.
#[derive(Clone, Serialize, Debug, Default, PartialEq, Eq)]
pub struct EditReport {
    pub applied: usize,
    pub skipped_read_only: usize,
    /// Rows at or beyond the row cap, each listed once
    pub rejected_rows: Vec<usize>,
    /// Columns beyond the headers for a non-paste edit, or at or beyond the
    /// column cap for a paste, each listed once
    pub rejected_columns: Vec<usize>,
}

impl EditReport {
    pub fn exceeded_capacity(&self) -> bool {
        !self.rejected_rows.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected_rows.is_empty() && self.rejected_columns.is_empty()
    }
}

/// New title and type for a column, as submitted from the column settings form.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ColumnUpdate {
    pub title: String,
    pub data_type: DataType,
    #[serde(default)]
    pub date_format: Option<String>,
}

/// Body handed to the save-configuration endpoint: column definitions and raw inputs.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TablePayload {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Vec<String>>,
}

/// The table being edited: column descriptors and rows of cells, kept as one value.
///
/// Fields are private so every change goes through a mutator. Every mutator checks
/// first and mutates after, so a rejected operation leaves the grid untouched and
/// each row always has exactly one cell per header.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Grid {
    headers: Vec<ColumnDescriptor>,
    data: Vec<Vec<Cell>>,
    max_rows: usize,
    max_columns: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(DEFAULT_MAX_ROWS)
    }
}

impl Grid {
    /// Seed table: three default columns and one empty row.
    pub fn new(max_rows: usize) -> Self {
        let headers = (1..=SEED_COLUMNS)
            .map(|position| ColumnDescriptor::new(&default_column_label(position)))
            .collect();
        let mut grid = Grid {
            headers,
            data: Vec::new(),
            max_rows,
            max_columns: DEFAULT_MAX_COLUMNS,
        };
        if max_rows > 0 {
            grid.data.push(grid.default_row());
        }
        grid
    }

    /// Same grid with a different column cap. The cap never drops below the
    /// current column count or the column floor.
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns.max(self.headers.len()).max(MIN_COLUMNS);
        self
    }

    /// Build a grid from existing parts, padding short rows with default cells.
    ///
    /// Rows longer than the headers get extra default columns, so no input is lost.
    /// The column cap starts at the default or the resulting width, whichever is larger.
    pub fn from_parts(
        headers: Vec<ColumnDescriptor>,
        data: Vec<Vec<Cell>>,
        max_rows: usize,
    ) -> Result<Self, GridError> {
        if data.len() > max_rows {
            return Err(GridError::CapacityExceeded { max_rows });
        }

        let mut grid = Grid {
            headers,
            data,
            max_rows,
            max_columns: DEFAULT_MAX_COLUMNS,
        };
        let widest = grid.data.iter().map(Vec::len).max().unwrap_or(0);
        grid.extend_columns(widest.max(MIN_COLUMNS));
        grid.max_columns = grid.max_columns.max(grid.headers.len());
        Ok(grid)
    }

    pub fn headers(&self) -> &[ColumnDescriptor] {
        &self.headers
    }

    pub fn data(&self) -> &[Vec<Cell>] {
        &self.data
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.headers.len()
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn max_columns(&self) -> usize {
        self.max_columns
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    pub fn is_full(&self) -> bool {
        self.data.len() >= self.max_rows
    }

    fn default_row(&self) -> Vec<Cell> {
        vec![Cell::create(); self.headers.len()]
    }

    fn check_row(&self, at: usize) -> Result<(), GridError> {
        if at >= self.data.len() {
            return Err(GridError::RowOutOfBounds(at, self.data.len()));
        }
        Ok(())
    }

    fn check_col(&self, at: usize) -> Result<(), GridError> {
        if at >= self.headers.len() {
            return Err(GridError::ColumnOutOfBounds(at, self.headers.len()));
        }
        Ok(())
    }

    fn check_column_capacity(&self) -> Result<(), GridError> {
        if self.headers.len() >= self.max_columns {
            return Err(GridError::ColumnLimitExceeded {
                max_columns: self.max_columns,
            });
        }
        Ok(())
    }

    fn check_capacity(&self) -> Result<(), GridError> {
        if self.is_full() {
            return Err(GridError::CapacityExceeded {
                max_rows: self.max_rows,
            });
        }
        Ok(())
    }

    fn has_label(&self, label: &str, except: Option<usize>) -> bool {
        let key = label_key(label);
        self.headers
            .iter()
            .enumerate()
            .any(|(i, h)| Some(i) != except && label_key(&h.label) == key)
    }

    fn next_default_label(&self) -> String {
        let mut position = self.headers.len() + 1;
        loop {
            let label = default_column_label(position);
            if !self.has_label(&label, None) {
                return label;
            }
            position += 1;
        }
    }

    /// Append default columns until there are at least `width` of them, then pad every row.
    /// Labels are picked in one pass over a set of the labels already taken.
    fn extend_columns(&mut self, width: usize) {
        if self.headers.len() < width {
            let mut taken: HashSet<String> =
                self.headers.iter().map(|h| label_key(&h.label)).collect();
            let mut position = self.headers.len() + 1;
            while self.headers.len() < width {
                let label = default_column_label(position);
                position += 1;
                if taken.insert(label_key(&label)) {
                    self.headers.push(ColumnDescriptor::new(&label));
                }
            }
        }

        let width = self.headers.len();
        for row in self.data.iter_mut() {
            if row.len() < width {
                row.resize(width, Cell::create());
            }
        }
    }

    /// Insert an empty row above (`before`) or below row `at`.
    /// On an empty table only `at == 0` is accepted.
    pub fn insert_row(&mut self, at: usize, before: bool) -> Result<(), GridError> {
        self.check_capacity()?;
        let index = if self.data.is_empty() && at == 0 {
            0
        } else {
            self.check_row(at)?;
            if before { at } else { at + 1 }
        };

        let row = self.default_row();
        self.data.insert(index, row);
        debug!("inserted row at {}", index);
        Ok(())
    }

    pub fn add_row(&mut self) -> Result<(), GridError> {
        self.check_capacity()?;
        let row = self.default_row();
        self.data.push(row);
        Ok(())
    }

    pub fn delete_row(&mut self, at: usize) -> Result<(), GridError> {
        self.check_row(at)?;
        self.data.remove(at);
        debug!("deleted row {}", at);
        Ok(())
    }

    pub fn clear_row(&mut self, at: usize) -> Result<(), GridError> {
        self.check_row(at)?;
        self.data[at].iter_mut().for_each(Cell::clear);
        Ok(())
    }

    /// Insert a default column before or after column `at`, plus a default cell in every row.
    pub fn insert_column(&mut self, at: usize, before: bool) -> Result<(), GridError> {
        self.check_col(at)?;
        self.check_column_capacity()?;
        let index = if before { at } else { at + 1 };
        self.insert_column_at(index);
        debug!("inserted column at {}", index);
        Ok(())
    }

    pub fn add_column(&mut self) -> Result<(), GridError> {
        self.check_column_capacity()?;
        let index = self.headers.len();
        self.insert_column_at(index);
        Ok(())
    }

    fn insert_column_at(&mut self, index: usize) {
        let label = self.next_default_label();
        self.headers.insert(index, ColumnDescriptor::new(&label));
        for row in self.data.iter_mut() {
            row.insert(index, Cell::create());
        }
    }

    pub fn delete_column(&mut self, at: usize) -> Result<(), GridError> {
        self.check_col(at)?;
        if self.headers.len() <= MIN_COLUMNS {
            return Err(GridError::MinColumnsViolation {
                min_columns: MIN_COLUMNS,
            });
        }

        self.headers.remove(at);
        for row in self.data.iter_mut() {
            row.remove(at);
        }
        debug!("deleted column {}", at);
        Ok(())
    }

    pub fn clear_column(&mut self, at: usize) -> Result<(), GridError> {
        self.check_col(at)?;
        for row in self.data.iter_mut() {
            row[at].clear();
        }
        Ok(())
    }

    /// Rename and retype a column, then redisplay its cells from their raw input.
    pub fn update_column(&mut self, index: usize, update: &ColumnUpdate) -> Result<(), GridError> {
        self.check_col(index)?;
        let title = update.title.trim();
        if title.is_empty() {
            return Err(GridError::EmptyColumnName);
        }
        if self.has_label(title, Some(index)) {
            return Err(GridError::DuplicateColumnName(title.to_string()));
        }

        let column = &mut self.headers[index];
        column.label = title.to_string();
        column.data_type = update.data_type;
        column.date_format = update
            .date_format
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let column = &self.headers[index];
        for row in self.data.iter_mut() {
            row[index].recoerce(column);
        }
        Ok(())
    }

    pub fn resize_column(&mut self, index: usize, width: u32) -> Result<(), GridError> {
        self.check_col(index)?;
        self.headers[index].width = width.max(MIN_COLUMN_WIDTH);
        Ok(())
    }

    /// Drag-and-drop row reorder: the row at `from` ends up at index `to`.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<(), GridError> {
        self.check_row(from)?;
        self.check_row(to)?;
        let row = self.data.remove(from);
        self.data.insert(to, row);
        Ok(())
    }

    /// Drag-and-drop column reorder. The descriptor and every row's cell move together.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), GridError> {
        self.check_col(from)?;
        self.check_col(to)?;
        let header = self.headers.remove(from);
        self.headers.insert(to, header);
        for row in self.data.iter_mut() {
            let cell = row.remove(from);
            row.insert(to, cell);
        }
        Ok(())
    }

    pub fn set_read_only(&mut self, row: usize, col: usize, read_only: bool) -> Result<(), GridError> {
        self.check_row(row)?;
        self.check_col(col)?;
        self.data[row][col].read_only = read_only;
        Ok(())
    }

    /// Write a batch of edits.
    ///
    /// Edits at or past the row cap are reported and skipped; the rest still apply.
    /// Missing rows are created on demand. Missing columns are created only for a
    /// paste, since a typed edit always targets an existing column, and never at
    /// or past the column cap.
    pub fn apply_cell_edits(&mut self, edits: &[CellEdit], is_paste: bool) -> EditReport {
        let mut report = EditReport::default();

        for edit in edits {
            if edit.row >= self.max_rows {
                if !report.rejected_rows.contains(&edit.row) {
                    report.rejected_rows.push(edit.row);
                }
                continue;
            }

            if edit.col >= self.headers.len() {
                if !is_paste || edit.col >= self.max_columns {
                    if !report.rejected_columns.contains(&edit.col) {
                        report.rejected_columns.push(edit.col);
                    }
                    continue;
                }
                self.extend_columns(edit.col + 1);
            }

            while self.data.len() <= edit.row {
                let row = self.default_row();
                self.data.push(row);
            }

            let column = &self.headers[edit.col];
            let cell = &mut self.data[edit.row][edit.col];
            if cell.read_only {
                report.skipped_read_only += 1;
                continue;
            }
            cell.set_input(&edit.value, column);
            report.applied += 1;
        }

        if report.exceeded_capacity() {
            warn!(
                "{} row(s) beyond the limit of {} were not written",
                report.rejected_rows.len(),
                self.max_rows
            );
        }
        if is_paste && !report.rejected_columns.is_empty() {
            warn!(
                "{} column(s) beyond the limit of {} were not written",
                report.rejected_columns.len(),
                self.max_columns
            );
        }
        report
    }

    /// Raw inputs row by row, as typed by the user.
    pub fn raw_values(&self) -> Vec<Vec<String>> {
        self.data
            .iter()
            .map(|row| row.iter().map(|c| c.real_value.clone()).collect())
            .collect()
    }

    /// Display values row by row.
    pub fn display_values(&self) -> Vec<Vec<String>> {
        self.data
            .iter()
            .map(|row| row.iter().map(|c| c.value.clone()).collect())
            .collect()
    }

    pub fn to_payload(&self) -> TablePayload {
        TablePayload {
            columns: self.headers.clone(),
            rows: self.raw_values(),
        }
    }
}

/// Labels compare trimmed and case-insensitively.
fn label_key(label: &str) -> String {
    label.trim().to_lowercase()
}
