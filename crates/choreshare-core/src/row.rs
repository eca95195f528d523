//! Row reader: turns spreadsheet rows into tasks

use tracing::trace;

use crate::config::{ChoreConfig, ColumnMap, ShiftMode};
use crate::{CellValue, ChoreError, SheetSource, Task};

/// Read the task on a 1-based row.
///
/// Returns `Ok(None)` when the row has no year frequency (empty, blank or
/// zero): such rows are not tasks. A present frequency must be a positive
/// number.
///
/// Hidden rows are never scheduled, so their time and shift are read as-is and
/// fall back to zero. On visible rows the time must be a number, and the shift
/// must be a whole number of weeks only under [`ShiftMode::Phase`]; otherwise
/// it is rounded and carried along.
pub fn read_task<S>(
    sheet: &S,
    row: u32,
    columns: &ColumnMap,
    shift_mode: ShiftMode,
) -> Result<Option<Task>, ChoreError>
where
    S: SheetSource + ?Sized,
{
    let frequency_cell = sheet.cell(row, columns.year_frequency);
    if frequency_cell.is_blank() || !frequency_cell.is_truthy() {
        return Ok(None);
    }

    let year_frequency = number(sheet, row, "year_frequency", &frequency_cell)?;
    if year_frequency.is_nan() || year_frequency <= 0.0 {
        return Err(ChoreError::InvalidFrequency {
            sheet: sheet.sheet_name().to_string(),
            row,
            value: year_frequency,
        });
    }

    let hide = sheet.cell(row, columns.hide).is_truthy();
    let time_cell = sheet.cell(row, columns.time);
    let shift_cell = sheet.cell(row, columns.shift);

    let (time, shift) = if hide {
        (time_cell.as_number().unwrap_or(0.0), loose_shift(&shift_cell))
    } else {
        let time = number(sheet, row, "time", &time_cell)?;
        let shift = match shift_mode {
            ShiftMode::Ignore => loose_shift(&shift_cell),
            ShiftMode::Phase => whole_shift(sheet, row, &shift_cell)?,
        };
        (time, shift)
    };

    Ok(Some(Task {
        row,
        name: sheet.cell(row, columns.name).to_string(),
        year_frequency,
        time,
        penibility: sheet.cell(row, columns.penibility),
        attributed: sheet.cell(row, columns.attributed).to_string(),
        shift,
        hide,
    }))
}

/// Read every task between `first_row` and `max_rows` (excluded).
///
/// Rows without a year frequency are skipped; the scan always runs to the
/// row bound.
pub fn read_tasks<S>(sheet: &S, config: &ChoreConfig) -> Result<Vec<Task>, ChoreError>
where
    S: SheetSource + ?Sized,
{
    let mut tasks = Vec::new();
    for row in config.first_row..config.max_rows {
        match read_task(sheet, row, &config.columns, config.shift_mode)? {
            Some(task) => tasks.push(task),
            None => trace!(row, "no year frequency, skipping row"),
        }
    }
    Ok(tasks)
}

fn number<S>(sheet: &S, row: u32, field: &'static str, cell: &CellValue) -> Result<f64, ChoreError>
where
    S: SheetSource + ?Sized,
{
    cell.as_number().ok_or_else(|| ChoreError::NotANumber {
        sheet: sheet.sheet_name().to_string(),
        row,
        field,
        value: cell.to_string(),
    })
}

/// Shift that only travels with the task: rounded, zero when unusable
fn loose_shift(cell: &CellValue) -> i64 {
    cell.as_number()
        .filter(|value| value.is_finite())
        .map_or(0, |value| value.round() as i64)
}

fn whole_shift<S>(sheet: &S, row: u32, cell: &CellValue) -> Result<i64, ChoreError>
where
    S: SheetSource + ?Sized,
{
    if !cell.is_truthy() || cell.is_blank() {
        return Ok(0);
    }

    match cell.as_number() {
        Some(value) if value.is_finite() && value.fract() == 0.0 => Ok(value as i64),
        _ => Err(ChoreError::InvalidShift {
            sheet: sheet.sheet_name().to_string(),
            row,
            value: cell.to_string(),
        }),
    }
}
