use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::coercion;

/// Default width of a newly created column, in pixels
pub const DEFAULT_COLUMN_WIDTH: u32 = 150;
/// Columns cannot be resized below this width
pub const MIN_COLUMN_WIDTH: u32 = 40;

/// Data type tag of a column. Drives how cell input is displayed.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Alphanumeric,
    Amount,
    Number,
    Date,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub label: String,
    pub data_type: DataType,
    pub date_format: Option<String>,
    pub width: u32,
}

impl ColumnDescriptor {
    pub fn new(label: &str) -> Self {
        ColumnDescriptor {
            label: label.to_string(),
            data_type: DataType::Alphanumeric,
            date_format: None,
            width: DEFAULT_COLUMN_WIDTH,
        }
    }

    pub fn with_type(label: &str, data_type: DataType, date_format: Option<&str>) -> Self {
        ColumnDescriptor {
            label: label.to_string(),
            data_type,
            date_format: date_format.map(str::to_string),
            width: DEFAULT_COLUMN_WIDTH,
        }
    }

    /// Display value for `raw` under this column's type and date format.
    pub fn coerce(&self, raw: &str) -> String {
        coercion::coerce(raw, self.data_type, self.date_format.as_deref())
    }
}

/// Presentation-only attributes (class names, alignment hints). Never read by grid logic.
pub type CellAttributes = BTreeMap<String, String>;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Cell {
    pub value: String,
    pub real_value: String,
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: CellAttributes,
}

impl Cell {
    pub fn create() -> Self {
        Cell::default()
    }

    /// A cell holding `raw`, displayed through `column`.
    pub fn with_input(raw: &str, column: &ColumnDescriptor) -> Self {
        let mut cell = Cell::create();
        cell.set_input(raw, column);
        cell
    }

    pub fn set_input(&mut self, raw: &str, column: &ColumnDescriptor) {
        self.real_value = raw.to_string();
        self.value = column.coerce(raw);
    }

    /// Recompute `value` from the preserved `real_value`.
    pub fn recoerce(&mut self, column: &ColumnDescriptor) {
        self.value = column.coerce(&self.real_value);
    }

    pub fn is_empty(&self) -> bool {
        self.real_value.is_empty()
    }

    /// Back to the default empty cell. The read-only flag is kept.
    pub fn clear(&mut self) {
        let read_only = self.read_only;
        *self = Cell::create();
        self.read_only = read_only;
    }
}

pub fn col_to_letter(col: usize) -> String {
    let mut col = col;
    let mut result = String::new();
    while col > 0 {
        col -= 1;
        result.push(((col % 26) as u8 + b'A') as char);
        col /= 26;
    }
    result.chars().rev().collect()
}

/// Label used for seeded and inserted columns, e.g. `Column C` for the third column.
pub fn default_column_label(position: usize) -> String {
    format!("Column {}", col_to_letter(position))
}
