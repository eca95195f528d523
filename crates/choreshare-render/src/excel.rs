//! Excel chore chart renderer
//!
//! Writes a fresh workbook with a single sheet: one column per participant,
//! one row per planned week.
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Details
//! |                  | To do: Maxime            | To do: Morgane           |
//! |------------------|--------------------------|--------------------------|
//! | Week of 14 Apr   | Total time: 45 minutes   | Total time: 45 minutes   |
//! |                  |                          |                          |
//! | to 20 Apr 2021   | ☐ Dishes (30min)         | ☐ Laundry (45min)        |
//! |                  | ☐ Trash (15min)          |                          |
//! ```
//!
//! Cells wrap their text; task rows are tall enough for a long checklist.

use std::path::Path;

use choreshare_core::report::format_participant_header;
use choreshare_core::{format_tasks_with, ChorePlan, Labels, RenderError, Renderer};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

const BLACK: u32 = 0x000000;
const GREY: u32 = 0x808080;

/// Excel chore chart renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Name of the only sheet in the workbook
    pub sheet_name: String,
    /// Display templates for headers, labels and reports
    pub labels: Labels,
    /// Height of the participant header row (points)
    pub header_row_height: f64,
    /// Height of each week row (points)
    pub task_row_height: f64,
    /// Width of the week label column (characters)
    pub week_column_width: f64,
    /// Width of each participant column (characters)
    pub task_column_width: f64,
    /// Keep the header row and label column visible while scrolling
    pub freeze_panes: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Details".into(),
            labels: Labels::default(),
            header_row_height: 40.0,
            task_row_height: 280.0,
            week_column_width: 30.0,
            task_column_width: 80.0,
            freeze_panes: false,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output sheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Use these display templates
    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the height of week rows
    pub fn task_row_height(mut self, height: f64) -> Self {
        self.task_row_height = height;
        self
    }

    /// Set the height of the header row
    pub fn header_row_height(mut self, height: f64) -> Self {
        self.header_row_height = height;
        self
    }

    /// Set the width of the participant columns
    pub fn task_column_width(mut self, width: f64) -> Self {
        self.task_column_width = width;
        self
    }

    /// Set the width of the week label column
    pub fn week_column_width(mut self, width: f64) -> Self {
        self.week_column_width = width;
        self
    }

    /// Freeze the header row and the label column
    pub fn with_frozen_panes(mut self) -> Self {
        self.freeze_panes = true;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, plan: &ChorePlan) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = Self::create_formats();

        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name).map_err(format_error)?;
        self.write_header(sheet, plan, &formats)?;
        self.write_weeks(sheet, plan, &formats)?;

        if self.freeze_panes {
            sheet.set_freeze_panes(1, 1).map_err(format_error)?;
        }

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Render and write the workbook to `path`
    pub fn save(&self, plan: &ChorePlan, path: &Path) -> Result<(), RenderError> {
        let bytes = self.render(plan)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn create_formats() -> ChartFormats {
        let participant = Format::new()
            .set_font_size(20.0)
            .set_font_color(BLACK)
            .set_border(FormatBorder::Thin)
            .set_border_color(BLACK)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let week = Format::new()
            .set_font_size(14.0)
            .set_font_color(GREY)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let task = Format::new()
            .set_font_size(12.0)
            .set_font_color(BLACK)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        ChartFormats {
            participant,
            week,
            task,
        }
    }

    /// Participant names across the first row
    fn write_header(
        &self,
        sheet: &mut Worksheet,
        plan: &ChorePlan,
        formats: &ChartFormats,
    ) -> Result<(), RenderError> {
        sheet
            .set_row_height(0, self.header_row_height)
            .map_err(format_error)?;
        sheet
            .set_column_width(0, self.week_column_width)
            .map_err(format_error)?;

        for (index, participant) in plan.participants.iter().enumerate() {
            let col = participant_column(index)?;
            sheet
                .set_column_width(col, self.task_column_width)
                .map_err(format_error)?;
            sheet
                .write_string_with_format(
                    0,
                    col,
                    format_participant_header(&self.labels, &participant.name),
                    &formats.participant,
                )
                .map_err(format_error)?;
        }

        Ok(())
    }

    /// One row per week: label, then each participant's report
    fn write_weeks(
        &self,
        sheet: &mut Worksheet,
        plan: &ChorePlan,
        formats: &ChartFormats,
    ) -> Result<(), RenderError> {
        for (index, week) in plan.weeks.iter().enumerate() {
            let row = u32::try_from(index + 1)
                .map_err(|_| RenderError::InvalidData("Too many weeks".into()))?;

            sheet
                .write_string_with_format(row, 0, &week.label, &formats.week)
                .map_err(format_error)?;

            for (position, participant) in plan.participants.iter().enumerate() {
                let report = format_tasks_with(week.tasks_for(&participant.code), &self.labels);
                sheet
                    .write_string_with_format(row, participant_column(position)?, report, &formats.task)
                    .map_err(format_error)?;
            }

            sheet
                .set_row_height(row, self.task_row_height)
                .map_err(format_error)?;
        }

        Ok(())
    }
}

/// Reusable Excel formats
struct ChartFormats {
    participant: Format,
    week: Format,
    task: Format,
}

/// Column of the participant at `index`; column A holds week labels
fn participant_column(index: usize) -> Result<u16, RenderError> {
    u16::try_from(index + 1).map_err(|_| RenderError::InvalidData("Too many participants".into()))
}

fn format_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, plan: &ChorePlan) -> Result<Vec<u8>, RenderError> {
        if plan.participants.is_empty() {
            return Err(RenderError::InvalidData("No participants to render".into()));
        }
        if plan.weeks.is_empty() {
            return Err(RenderError::InvalidData("No weeks to render".into()));
        }
        self.render_to_bytes(plan)
    }
}
