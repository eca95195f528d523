//! # choreshare-reader
//!
//! Loads the task sheet of a workbook into memory and exposes it to the
//! planner through [`SheetSource`].
//!
//! Any format calamine understands works (xlsx, xlsm, xls, ods). The workbook
//! is opened once and the chosen sheet is copied into memory; the file is
//! never written.
//!
//! ## Example
//!
//! ```rust,ignore
//! use choreshare_core::{ChoreConfig, WeekAssigner};
//! use choreshare_reader::WorkbookSource;
//!
//! let config = ChoreConfig::default();
//! let sheet = WorkbookSource::open(&config.workbook_path, config.source_sheet.as_deref())?;
//! let plan = WeekAssigner::new(&config).plan(&sheet)?;
//! ```

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use choreshare_core::{CellValue, SheetSource};
use thiserror::Error;
use tracing::debug;

/// Workbook could not provide the task sheet
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("Workbook {0} has no sheets")]
    NoSheets(PathBuf),

    #[error("Sheet '{sheet}' not found in {path} (available: {available})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: String,
    },

    #[error("Cannot read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        source: calamine::Error,
    },
}

/// One sheet of a workbook, held in memory
#[derive(Clone, Debug)]
pub struct WorkbookSource {
    name: String,
    range: Range<Data>,
}

impl WorkbookSource {
    /// Open `path` and load `sheet`, or the first sheet when `None`
    pub fn open(path: &Path, sheet: Option<&str>) -> Result<Self, SourceError> {
        let mut workbook = open_workbook_auto(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let names = workbook.sheet_names();
        let name = match sheet {
            Some(wanted) => names
                .iter()
                .find(|name| name.as_str() == wanted)
                .cloned()
                .ok_or_else(|| SourceError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: wanted.to_string(),
                    available: names.join(", "),
                })?,
            None => names
                .first()
                .cloned()
                .ok_or_else(|| SourceError::NoSheets(path.to_path_buf()))?,
        };

        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| SourceError::Read {
                sheet: name.clone(),
                source,
            })?;

        debug!(
            path = %path.display(),
            sheet = %name,
            rows = range.height(),
            columns = range.width(),
            "loaded task sheet"
        );

        Ok(Self { name, range })
    }

    /// Wrap an already-loaded range
    pub fn from_range(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }
}

impl SheetSource for WorkbookSource {
    fn sheet_name(&self) -> &str {
        &self.name
    }

    fn cell(&self, row: u32, column: u32) -> CellValue {
        match (row.checked_sub(1), column.checked_sub(1)) {
            (Some(r), Some(c)) => self
                .range
                .get_value((r, c))
                .map(cell_value)
                .unwrap_or_default(),
            _ => CellValue::Empty,
        }
    }
}

/// Convert a calamine cell to a planner cell.
///
/// Dates keep their serial number; error cells become their text (`#DIV/0!`).
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
