//! In-memory sheet, for tests and for callers that build tasks by hand

use std::collections::BTreeMap;

use crate::{CellValue, SheetSource};

/// Sparse sheet addressed by 1-based `(row, column)`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemorySheet {
    name: String,
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Set a cell; setting `CellValue::Empty` clears it
    pub fn set(&mut self, row: u32, column: u32, value: impl Into<CellValue>) {
        match value.into() {
            CellValue::Empty => {
                self.cells.remove(&(row, column));
            }
            value => {
                self.cells.insert((row, column), value);
            }
        }
    }

    /// Builder-style variant of [`set`](Self::set)
    pub fn with(mut self, row: u32, column: u32, value: impl Into<CellValue>) -> Self {
        self.set(row, column, value);
        self
    }

    /// Last row holding a value
    pub fn last_row(&self) -> Option<u32> {
        self.cells.keys().map(|(row, _)| *row).max()
    }
}

impl SheetSource for MemorySheet {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn cell(&self, row: u32, column: u32) -> CellValue {
        self.cells.get(&(row, column)).cloned().unwrap_or_default()
    }
}
