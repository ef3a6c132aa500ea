/*!
# Dimension Grid

State and behaviour behind the dimension-management screens and the table
editor of the process-building wizard, built in Rust.

## Overview

The crate keeps every piece of view state that carries rules: the editable
table with its typed columns, the per-row action menu of the dimension list,
the paginated list itself and the time-dimension wizard. Views render what
these types expose and forward user intents to them.

## Architecture

### Table editor
- **Cell Storage** - Column descriptors and rows of cells held as one value,
  so every row always has one cell per column
- **Type Coercion** - Amount, number and date display values derived from the
  raw input, which is kept for re-coercion
- **Editor Controller** - Row/column menus, paste, drag-and-drop moves and the
  messages shown to the user
- **Clipboard** - Tab-separated paste parsing and CSV export

### Dimension management
- **Action Menu** - Per-row menu with a capability table keyed by dimension type
- **List Controller** - Scroll-driven pagination with retry-safe page counter
- **Time Dimension Wizard** - Fiscal calendar setup with period preview
- **Remote API** - Endpoint templates and a `reqwest` client

### Web Layer (feature `web`)
- **Technologies**: Rust, axum
- Serves a table editing session over JSON

## Limits

- A table holds at most 500 rows by default (configurable)
- A table never has fewer than 2 columns
- A table holds at most 256 columns by default (configurable); pasted columns past the cap are dropped and reported

## REST API Endpoints (feature `web`)

- `GET /api/grid` - Current headers and rows
- `POST /api/grid/rows`, `POST /api/grid/columns` - Append a row or column
- `POST /api/grid/rows/{index}`, `POST /api/grid/columns/{index}` - Row/column menu actions
- `PUT /api/grid/columns/{index}` - Rename and retype a column
- `POST /api/grid/cells` - Write a batch of cell edits
- `POST /api/grid/paste` - Paste clipboard text at a cell
- `POST /api/grid/move` - Drag-and-drop row or column move
- `GET /api/grid/export` - CSV download
*/

pub mod action_menu;
pub mod api;
pub mod cell;
pub mod clipboard;
pub mod coercion;
pub mod config;
pub mod dimension;
pub mod editor;
pub mod error;
pub mod grid;
pub mod listing;
pub mod time_dimension;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the most used types at the crate root
pub use action_menu::{ActionMenu, ActionOutcome, MenuState};
pub use api::{DimensionApi, HttpDimensionApi};
pub use cell::{Cell, ColumnDescriptor, DataType};
pub use config::AppConfig;
pub use dimension::{Dimension, DimensionAction, DimensionKind, ListIntent, Route};
pub use editor::{ColumnAction, GridEditor, RowAction};
pub use error::{ConfigError, GridError, RemoteError};
pub use grid::{CellEdit, ColumnUpdate, Grid};
pub use listing::DimensionListController;
pub use time_dimension::{TimeDimensionConfig, TimeDimensionWizard};
