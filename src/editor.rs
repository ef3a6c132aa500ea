use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, ColumnDescriptor};
use crate::api::DimensionApi;
use crate::clipboard;
use crate::config::{
    MAX_COLUMNS_PLACEHOLDER, MAX_ROWS_PLACEHOLDER, MIN_COLUMNS_PLACEHOLDER, Messages,
    NAME_PLACEHOLDER, render_template,
};
use crate::error::{ExportError, GridError, RemoteError};
use crate::grid::{CellEdit, ColumnUpdate, EditReport, Grid};

/// Entries of the row context menu.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    InsertAbove,
    InsertBelow,
    Delete,
    Clear,
}

/// Entries of the column context menu.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAction {
    InsertBefore,
    InsertAfter,
    Delete,
    Clear,
}

/// A rejected intent together with the message shown to the user.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Notice {
    #[serde(skip)]
    pub error: GridError,
    pub message: String,
    /// Form field the message belongs to, for inline validation errors
    pub field: Option<&'static str>,
}

/// Result of a paste or cell edit that went through.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    pub report: EditReport,
    /// Set once when part of the batch fell beyond the row or column limit
    pub warning: Option<String>,
}

/// Headers and rows handed to the view, always taken together.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct GridSnapshot {
    pub revision: u64,
    pub headers: Vec<ColumnDescriptor>,
    pub data: Vec<Vec<Cell>>,
}

/// Controller behind the table editor of the process wizard
///
/// Every intent runs against a working copy of the grid. The copy replaces the
/// current grid only when the operation succeeds, so headers and rows are always
/// swapped together and observers never see one without the other.
#[derive(Clone, Debug)]
pub struct GridEditor {
    grid: Grid,
    messages: Messages,
    revision: u64,
    saving: bool,
}

impl GridEditor {
    pub fn new(max_rows: usize, messages: Messages) -> Self {
        GridEditor::with_grid(Grid::new(max_rows), messages)
    }

    pub fn with_grid(grid: Grid, messages: Messages) -> Self {
        GridEditor {
            grid,
            messages,
            revision: 0,
            saving: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True while a save request is in flight.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            revision: self.revision,
            headers: self.grid.headers().to_vec(),
            data: self.grid.data().to_vec(),
        }
    }

    fn row_limit_message(&self) -> String {
        render_template(
            &self.messages.row_limit,
            MAX_ROWS_PLACEHOLDER,
            &self.grid.max_rows().to_string(),
        )
    }

    fn column_limit_message(&self) -> String {
        render_template(
            &self.messages.column_limit,
            MAX_COLUMNS_PLACEHOLDER,
            &self.grid.max_columns().to_string(),
        )
    }

    fn notice(&self, error: GridError) -> Notice {
        let (message, field) = match &error {
            GridError::CapacityExceeded { .. } => (self.row_limit_message(), None),
            GridError::ColumnLimitExceeded { .. } => (self.column_limit_message(), None),
            GridError::MinColumnsViolation { min_columns } => (
                render_template(
                    &self.messages.min_columns,
                    MIN_COLUMNS_PLACEHOLDER,
                    &min_columns.to_string(),
                ),
                None,
            ),
            GridError::DuplicateColumnName(name) => (
                render_template(&self.messages.duplicate_column, NAME_PLACEHOLDER, name),
                Some("title"),
            ),
            GridError::EmptyColumnName => (self.messages.empty_column.clone(), Some("title")),
            GridError::RowOutOfBounds(..) | GridError::ColumnOutOfBounds(..) => {
                (error.to_string(), None)
            }
        };
        warn!("rejected table edit: {}", error);
        Notice {
            error,
            message,
            field,
        }
    }

    fn commit_with<F>(&mut self, op: F) -> Result<(), Notice>
    where
        F: FnOnce(&mut Grid) -> Result<(), GridError>,
    {
        let mut next = self.grid.clone();
        if let Err(e) = op(&mut next) {
            return Err(self.notice(e));
        }
        self.grid = next;
        self.revision += 1;
        Ok(())
    }

    pub fn row_action(&mut self, index: usize, action: RowAction) -> Result<(), Notice> {
        self.commit_with(|grid| match action {
            RowAction::InsertAbove => grid.insert_row(index, true),
            RowAction::InsertBelow => grid.insert_row(index, false),
            RowAction::Delete => grid.delete_row(index),
            RowAction::Clear => grid.clear_row(index),
        })
    }

    pub fn column_action(&mut self, index: usize, action: ColumnAction) -> Result<(), Notice> {
        self.commit_with(|grid| match action {
            ColumnAction::InsertBefore => grid.insert_column(index, true),
            ColumnAction::InsertAfter => grid.insert_column(index, false),
            ColumnAction::Delete => grid.delete_column(index),
            ColumnAction::Clear => grid.clear_column(index),
        })
    }

    pub fn add_row(&mut self) -> Result<(), Notice> {
        self.commit_with(Grid::add_row)
    }

    pub fn add_column(&mut self) -> Result<(), Notice> {
        self.commit_with(Grid::add_column)
    }

    pub fn update_column(&mut self, index: usize, update: &ColumnUpdate) -> Result<(), Notice> {
        self.commit_with(|grid| grid.update_column(index, update))
    }

    pub fn resize_column(&mut self, index: usize, width: u32) -> Result<(), Notice> {
        self.commit_with(|grid| grid.resize_column(index, width))
    }

    pub fn move_row(&mut self, from: usize, to: usize) -> Result<(), Notice> {
        self.commit_with(|grid| grid.move_row(from, to))
    }

    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), Notice> {
        self.commit_with(|grid| grid.move_column(from, to))
    }

    /// Single typed cell edit.
    pub fn edit_cell(&mut self, row: usize, col: usize, value: &str) -> Result<EditOutcome, Notice> {
        let edit = CellEdit::new(row, col, value);
        let mut next = self.grid.clone();
        let report = next.apply_cell_edits(std::slice::from_ref(&edit), false);

        if report.exceeded_capacity() {
            return Err(self.notice(GridError::CapacityExceeded {
                max_rows: self.grid.max_rows(),
            }));
        }
        if !report.rejected_columns.is_empty() {
            return Err(self.notice(GridError::ColumnOutOfBounds(col, self.grid.cols())));
        }

        self.grid = next;
        self.revision += 1;
        Ok(EditOutcome {
            report,
            warning: None,
        })
    }

    /// Apply a batch of edits. Whatever fits is written; overflow warns once.
    ///
    /// Rows past the row limit take precedence in the warning over pasted
    /// columns past the column limit.
    pub fn apply_edits(&mut self, edits: &[CellEdit], is_paste: bool) -> EditOutcome {
        let mut next = self.grid.clone();
        let report = next.apply_cell_edits(edits, is_paste);
        self.grid = next;
        self.revision += 1;

        let warning = if report.exceeded_capacity() {
            Some(self.row_limit_message())
        } else if is_paste && !report.rejected_columns.is_empty() {
            Some(self.column_limit_message())
        } else {
            None
        };
        EditOutcome { report, warning }
    }

    /// Paste clipboard text with its top-left value at (`row`, `col`).
    pub fn paste(&mut self, row: usize, col: usize, text: &str) -> EditOutcome {
        let block = clipboard::parse_clipboard(text);
        let edits = clipboard::block_to_edits(&block, row, col);
        info!(
            "pasting {} value(s) in {} row(s) at ({}, {})",
            edits.len(),
            block.len(),
            row,
            col
        );
        self.apply_edits(&edits, true)
    }

    /// Tab-separated text for the clipboard.
    pub fn copy_text(&self) -> Result<String, ExportError> {
        clipboard::to_delimited(&self.grid, b'\t')
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        clipboard::to_csv(&self.grid)
    }

    /// Send the table configuration of dimension `id` to the server.
    ///
    /// The grid is not touched either way. Returns the server's message on success.
    pub async fn save<A: DimensionApi>(
        &mut self,
        api: &A,
        id: &str,
    ) -> Result<Option<String>, RemoteError> {
        let payload = self.grid.to_payload();
        self.saving = true;
        let result = api.save_configuration(id, &payload).await;
        self.saving = false;

        match result {
            Ok(reply) => {
                info!(
                    "saved table configuration of {} ({} row(s), {} column(s))",
                    id,
                    payload.rows.len(),
                    payload.columns.len()
                );
                Ok(reply.message)
            }
            Err(e) => {
                error!("saving table configuration of {} failed: {}", id, e);
                Err(e)
            }
        }
    }
}
