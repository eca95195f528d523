//! Week assigner
//!
//! Walks the planning window one week at a time and hands every due, visible
//! task to the participants its `attributed` code designates.
//!
//! The window starts one week before `first_day`; the cursor is advanced
//! before each week is built and the walk continues while the cursor is
//! before `last_day`. The first week therefore starts on `first_day`, and the
//! last one is the first week starting on or after `last_day`.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::{ChoreConfig, UnknownParticipantPolicy};
use crate::recurrence::Recurrence;
use crate::report::format_week_label;
use crate::row::read_tasks;
use crate::{ChoreError, ChorePlan, ParticipantTasks, SheetSource, Task, WeekBucket};

/// Spreads tasks over the weeks of the configured window
#[derive(Clone, Copy, Debug)]
pub struct WeekAssigner<'a> {
    config: &'a ChoreConfig,
    recurrence: Recurrence,
}

impl<'a> WeekAssigner<'a> {
    pub fn new(config: &'a ChoreConfig) -> Self {
        Self {
            config,
            recurrence: Recurrence::new(config.weeks_in_year, config.shift_mode),
        }
    }

    /// Read the sheet and plan every week of the window
    pub fn plan<S>(&self, sheet: &S) -> Result<ChorePlan, ChoreError>
    where
        S: SheetSource + ?Sized,
    {
        let tasks = read_tasks(sheet, self.config)?;
        info!(
            sheet = sheet.sheet_name(),
            tasks = tasks.len(),
            "read task definitions"
        );
        self.plan_tasks(sheet.sheet_name(), &tasks)
    }

    /// Plan already-read tasks; `sheet_name` is only used in errors
    pub fn plan_tasks(&self, sheet_name: &str, tasks: &[Task]) -> Result<ChorePlan, ChoreError> {
        let mut weeks = Vec::new();
        let mut warned_rows = HashSet::new();

        for start in week_starts(self.config.first_day, self.config.last_day) {
            let end = start + Duration::days(6);
            let week_number = start.iso_week().week();
            let mut assignments: Vec<ParticipantTasks> = self
                .config
                .participants
                .iter()
                .map(|p| ParticipantTasks {
                    code: p.code.clone(),
                    tasks: Vec::new(),
                })
                .collect();

            for task in tasks {
                if task.hide || !self.recurrence.is_due(task, week_number) {
                    continue;
                }

                let mut assigned = false;
                for (participant, slot) in self.config.participants.iter().zip(&mut assignments) {
                    if participant.matches(&task.attributed) {
                        slot.tasks.push(task.clone());
                        assigned = true;
                    }
                }

                if !assigned {
                    match self.config.unknown_participant {
                        UnknownParticipantPolicy::Error => {
                            return Err(ChoreError::UnknownParticipant {
                                sheet: sheet_name.to_string(),
                                row: task.row,
                                code: task.attributed.clone(),
                                task: task.name.clone(),
                            });
                        }
                        UnknownParticipantPolicy::Skip => {
                            if warned_rows.insert(task.row) {
                                warn!(
                                    row = task.row,
                                    code = %task.attributed,
                                    task = %task.name,
                                    "no participant matches, task left unassigned"
                                );
                            }
                        }
                    }
                }
            }

            let week = WeekBucket {
                start,
                end,
                week_number,
                label: format_week_label(&self.config.labels, start, end),
                assignments,
            };
            debug!(
                start = %week.start,
                week_number,
                assignments = week.assignment_count(),
                "planned week"
            );
            weeks.push(week);
        }

        info!(weeks = weeks.len(), "planned chore weeks");
        Ok(ChorePlan {
            participants: self.config.participants.clone(),
            weeks,
        })
    }
}

/// Start of every planned week, in ascending order
pub fn week_starts(first_day: NaiveDate, last_day: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let one_week = Duration::days(7);
    let mut cursor = first_day - one_week;
    std::iter::from_fn(move || {
        if cursor < last_day {
            cursor = cursor + one_week;
            Some(cursor)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Participant, ShiftMode};
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn default_window_has_39_weeks() {
        let starts: Vec<NaiveDate> = week_starts(date(2021, 4, 14), date(2021, 12, 31)).collect();
        assert_eq!(starts.len(), 39);
        assert_eq!(starts[0], date(2021, 4, 14));
        assert_eq!(starts[38], date(2022, 1, 5));
        assert!(starts.windows(2).all(|w| w[1] - w[0] == Duration::days(7)));
    }

    #[test]
    fn window_of_one_day() {
        let starts: Vec<NaiveDate> = week_starts(date(2021, 1, 4), date(2021, 1, 5)).collect();
        assert_eq!(starts, vec![date(2021, 1, 4), date(2021, 1, 11)]);
    }

    #[test]
    fn weeks_carry_label_and_iso_number() {
        let config = ChoreConfig::default();
        let plan = WeekAssigner::new(&config).plan_tasks("Tasks", &[]).unwrap();

        let first = &plan.weeks[0];
        assert_eq!(first.start, date(2021, 4, 14));
        assert_eq!(first.end, date(2021, 4, 20));
        assert_eq!(first.week_number, 15);
        assert_eq!(first.label, "Week of 14 Apr\n\nto 20 Apr 2021");
        assert_eq!(first.assignments.len(), 2);
        assert!(first.tasks_for("x").is_empty());
    }

    #[test]
    fn shared_code_goes_to_everyone() {
        let config = ChoreConfig::default();
        let tasks = vec![Task::new("Groceries").row(5).time(60.0).attributed("xo")];
        let plan = WeekAssigner::new(&config).plan_tasks("Tasks", &tasks).unwrap();

        for week in &plan.weeks {
            assert_eq!(week.tasks_for("x").len(), 1);
            assert_eq!(week.tasks_for("o").len(), 1);
        }
    }

    #[test]
    fn unknown_code_fails_by_default() {
        let config = ChoreConfig::default();
        let tasks = vec![Task::new("Garden").row(12).attributed("z")];
        let err = WeekAssigner::new(&config)
            .plan_tasks("Tasks", &tasks)
            .unwrap_err();

        match err {
            ChoreError::UnknownParticipant { sheet, row, code, task } => {
                assert_eq!(sheet, "Tasks");
                assert_eq!(row, 12);
                assert_eq!(code, "z");
                assert_eq!(task, "Garden");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_code_in_hidden_task_is_ignored() {
        let config = ChoreConfig::default();
        let tasks = vec![Task::new("Garden").row(12).attributed("z").hidden()];
        assert!(WeekAssigner::new(&config).plan_tasks("Tasks", &tasks).is_ok());
    }

    #[test]
    fn unknown_code_can_be_skipped() {
        let config = ChoreConfig {
            unknown_participant: UnknownParticipantPolicy::Skip,
            ..ChoreConfig::default()
        };
        let tasks = vec![
            Task::new("Garden").row(5).attributed("z"),
            Task::new("Dishes").row(6).attributed("o"),
        ];
        let plan = WeekAssigner::new(&config).plan_tasks("Tasks", &tasks).unwrap();

        for week in &plan.weeks {
            assert!(week.tasks_for("x").is_empty());
            assert_eq!(week.tasks_for("o")[0].name, "Dishes");
        }
    }

    #[test]
    fn three_participants() {
        let config = ChoreConfig {
            participants: vec![
                Participant::new("a", "Alex"),
                Participant::new("b", "Blake"),
                Participant::new("c", "Casey"),
            ],
            ..ChoreConfig::default()
        };
        let tasks = vec![
            Task::new("Dishes").row(5).attributed("A"),
            Task::new("Trash").row(6).attributed("c"),
        ];
        let plan = WeekAssigner::new(&config).plan_tasks("Tasks", &tasks).unwrap();

        let week = &plan.weeks[0];
        assert_eq!(week.assignments.len(), 3);
        assert_eq!(week.tasks_for("a")[0].name, "Dishes");
        assert!(week.tasks_for("b").is_empty());
        assert_eq!(week.tasks_for("c")[0].name, "Trash");
    }

    #[test]
    fn phase_mode_moves_tasks() {
        let config = ChoreConfig {
            first_day: date(2021, 1, 4),
            last_day: date(2021, 2, 28),
            shift_mode: ShiftMode::Phase,
            ..ChoreConfig::default()
        };
        let tasks = vec![Task::new("Fridge").row(5).frequency(13.0).attributed("x").shift(1)];
        let plan = WeekAssigner::new(&config).plan_tasks("Tasks", &tasks).unwrap();

        let due: Vec<u32> = plan
            .weeks
            .iter()
            .filter(|week| !week.tasks_for("x").is_empty())
            .map(|week| week.week_number)
            .collect();
        assert_eq!(due, vec![1, 5, 9]);
    }
}
