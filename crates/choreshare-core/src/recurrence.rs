//! Recurrence rules
//!
//! A task done `f` times a year is due on ISO week `w` when `w` lands within
//! one week after a multiple of `weeks_in_year / f`. Real division is used, so
//! frequencies that do not divide the cycle still spread out evenly, and week
//! 53 needs no special case.

use crate::config::ShiftMode;
use crate::Task;

/// Default length of the recurrence cycle
pub const WEEKS_IN_YEAR: u32 = 52;

/// Remainder of a truncating division: `a - trunc(a / b) * b`
pub fn rest_after_division(to_divide: f64, divide_by: f64) -> f64 {
    to_divide - (to_divide / divide_by).trunc() * divide_by
}

/// Whether a task with `year_frequency` is due on `week_number`.
///
/// The shift is reserved: it is accepted for callers that track it but never
/// moves the task. Use [`Recurrence`] with [`ShiftMode::Phase`] for staggered
/// tasks.
pub fn should_do_task(year_frequency: f64, week_number: u32, _shift: i64) -> bool {
    rest_after_division(
        f64::from(week_number),
        f64::from(WEEKS_IN_YEAR) / year_frequency,
    ) < 1.0
}

/// Recurrence test bound to a cycle length and shift handling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recurrence {
    pub weeks_in_year: u32,
    pub shift_mode: ShiftMode,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            weeks_in_year: WEEKS_IN_YEAR,
            shift_mode: ShiftMode::Ignore,
        }
    }
}

impl Recurrence {
    pub fn new(weeks_in_year: u32, shift_mode: ShiftMode) -> Self {
        Self {
            weeks_in_year,
            shift_mode,
        }
    }

    /// Weeks between two occurrences
    pub fn period(&self, year_frequency: f64) -> f64 {
        f64::from(self.weeks_in_year) / year_frequency
    }

    pub fn is_due(&self, task: &Task, week_number: u32) -> bool {
        self.is_due_raw(task.year_frequency, week_number, task.shift)
    }

    pub fn is_due_raw(&self, year_frequency: f64, week_number: u32, shift: i64) -> bool {
        let period = self.period(year_frequency);
        let week = f64::from(week_number);
        let rest = match self.shift_mode {
            ShiftMode::Ignore => rest_after_division(week, period),
            // Floor-based so a shift larger than the week number wraps into the cycle
            ShiftMode::Phase => {
                let shifted = week - shift as f64;
                shifted - (shifted / period).floor() * period
            }
        };
        rest < 1.0
    }
}
