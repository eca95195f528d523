//! # choreshare-core
//!
//! Core domain model and planning logic for the choreshare chore planner.
//!
//! This crate provides:
//! - Domain types: `Task`, `Participant`, `WeekBucket`, `ChorePlan`
//! - Recurrence rules deciding which week a task is due
//! - The week assigner that spreads due tasks over participants
//! - Report formatting (total time + checklist)
//! - Core traits: `SheetSource`, `Renderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use choreshare_core::{ChoreConfig, MemorySheet, WeekAssigner};
//!
//! let config = ChoreConfig::default();
//! let mut sheet = MemorySheet::new("Tasks");
//! sheet.set(5, config.columns.name, "Dishes");
//! sheet.set(5, config.columns.year_frequency, 52);
//! sheet.set(5, config.columns.time, 30);
//! sheet.set(5, config.columns.attributed, "x");
//!
//! let plan = WeekAssigner::new(&config).plan(&sheet).unwrap();
//! assert_eq!(plan.weeks[0].tasks_for("x").len(), 1);
//! ```

pub mod assign;
pub mod config;
pub mod memory;
pub mod recurrence;
pub mod report;
pub mod row;

pub use assign::WeekAssigner;
pub use config::{ChoreConfig, ColumnMap, Labels, ShiftMode, UnknownParticipantPolicy};
pub use memory::MemorySheet;
pub use recurrence::{rest_after_division, should_do_task, Recurrence};
pub use report::{format_tasks, format_tasks_with};
pub use row::{read_task, read_tasks};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Cell values
// ============================================================================

/// Content of a single spreadsheet cell, as seen by the row reader
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty cell or text made only of whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Spreadsheet truthiness: empty, `false`, zero and `""` are false
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Bool(b) => *b,
            CellValue::Int(i) => *i != 0,
            CellValue::Float(f) => *f != 0.0,
            CellValue::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric value of the cell, parsing numeric text
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Empty | CellValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value.into())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

// ============================================================================
// Task
// ============================================================================

/// A recurring chore read from one row of the source sheet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// 1-based source row
    pub row: u32,
    /// Human-readable label
    pub name: String,
    /// Occurrences per year (52 = weekly, 1 = yearly)
    pub year_frequency: f64,
    /// Minutes needed to complete the task
    pub time: f64,
    /// Difficulty score, carried through untouched
    pub penibility: CellValue,
    /// Participant code(s), matched case-insensitively
    pub attributed: String,
    /// Week offset within the recurrence cycle
    pub shift: i64,
    /// Hidden tasks are never scheduled
    pub hide: bool,
}

impl Task {
    /// Create a weekly task with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            row: 0,
            name: name.into(),
            year_frequency: 52.0,
            time: 0.0,
            penibility: CellValue::Empty,
            attributed: String::new(),
            shift: 0,
            hide: false,
        }
    }

    /// Set the source row
    pub fn row(mut self, row: u32) -> Self {
        self.row = row;
        self
    }

    /// Set the number of occurrences per year
    pub fn frequency(mut self, year_frequency: f64) -> Self {
        self.year_frequency = year_frequency;
        self
    }

    /// Set the duration in minutes
    pub fn time(mut self, minutes: f64) -> Self {
        self.time = minutes;
        self
    }

    pub fn penibility(mut self, penibility: impl Into<CellValue>) -> Self {
        self.penibility = penibility.into();
        self
    }

    /// Set the participant code(s)
    pub fn attributed(mut self, code: impl Into<String>) -> Self {
        self.attributed = code.into();
        self
    }

    pub fn shift(mut self, shift: i64) -> Self {
        self.shift = shift;
        self
    }

    /// Mark as hidden
    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }
}

// ============================================================================
// Participant
// ============================================================================

/// Someone who receives tasks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Lookup code searched for in a task's `attributed` value
    pub code: String,
    /// Display name
    pub name: String,
}

impl Participant {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Whether an `attributed` value designates this participant.
    ///
    /// The comparison is case-insensitive and looks for the code inside the
    /// value, so `"xo"` designates both `x` and `o`. Codes that contain one
    /// another would both match; [`ChoreConfig::validate`] rejects them.
    pub fn matches(&self, attributed: &str) -> bool {
        !self.code.is_empty()
            && attributed
                .to_lowercase()
                .contains(&self.code.to_lowercase())
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Tasks given to one participant during one week
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantTasks {
    pub code: String,
    pub tasks: Vec<Task>,
}

/// All assignments for one calendar week
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeekBucket {
    /// First day of the week
    pub start: NaiveDate,
    /// Last day of the week (start + 6 days)
    pub end: NaiveDate,
    /// ISO week number of `start`
    pub week_number: u32,
    /// Display label
    pub label: String,
    /// One entry per participant, in configuration order
    pub assignments: Vec<ParticipantTasks>,
}

impl WeekBucket {
    /// Tasks assigned to the participant with `code` (empty if unknown)
    pub fn tasks_for(&self, code: &str) -> &[Task] {
        self.assignments
            .iter()
            .find(|a| a.code == code)
            .map(|a| a.tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Number of assignments across all participants
    pub fn assignment_count(&self) -> usize {
        self.assignments.iter().map(|a| a.tasks.len()).sum()
    }
}

/// Complete output of the week assigner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChorePlan {
    pub participants: Vec<Participant>,
    /// Weeks in ascending date order
    pub weeks: Vec<WeekBucket>,
}

impl ChorePlan {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Read access to a sheet of task definitions
pub trait SheetSource {
    /// Sheet name, used in error messages
    fn sheet_name(&self) -> &str;

    /// Value of the cell at a 1-based row and column
    fn cell(&self, row: u32, column: u32) -> CellValue;
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a plan to the output format
    fn render(&self, plan: &ChorePlan) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Bad data in the task sheet
#[derive(Debug, Error)]
pub enum ChoreError {
    #[error("Sheet '{sheet}', row {row}: {field} must be a number, got {value:?}")]
    NotANumber {
        sheet: String,
        row: u32,
        field: &'static str,
        value: String,
    },

    #[error("Sheet '{sheet}', row {row}: year frequency must be positive, got {value}")]
    InvalidFrequency { sheet: String, row: u32, value: f64 },

    #[error("Sheet '{sheet}', row {row}: shift must be a whole number of weeks, got {value:?}")]
    InvalidShift {
        sheet: String,
        row: u32,
        value: String,
    },

    #[error("Sheet '{sheet}', row {row}: unknown participant code {code:?} for task {task:?}")]
    UnknownParticipant {
        sheet: String,
        row: u32,
        code: String,
        task: String,
    },
}

/// Configuration loading or validation error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
