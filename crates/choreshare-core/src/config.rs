//! Planner configuration
//!
//! Every constant the planner needs lives in [`ChoreConfig`]. The defaults
//! describe the household workbook the tool was written for; any of them can
//! be overridden from a TOML file, where missing keys keep their default:
//!
//! ```toml
//! workbook_path = "chores.xlsx"
//! first_day = "2022-01-03"
//! last_day = "2022-12-31"
//! unknown_participant = "skip"
//!
//! [[participants]]
//! code = "a"
//! name = "Alex"
//!
//! [[participants]]
//! code = "b"
//! name = "Sam"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ConfigError, Participant};

/// Immutable planner configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreConfig {
    /// Workbook holding the task definitions
    pub workbook_path: PathBuf,
    /// Sheet to read; the first sheet when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sheet: Option<String>,
    /// Workbook written by `generate`
    pub output_path: PathBuf,
    /// Name of the single output sheet
    pub output_sheet: String,
    /// First row holding a task (1-based)
    pub first_row: u32,
    /// Row bound, excluded from the scan
    pub max_rows: u32,
    /// Length of the recurrence cycle
    pub weeks_in_year: u32,
    /// Start of the first planned week
    pub first_day: NaiveDate,
    /// Planning stops once a week starts on or after this day
    pub last_day: NaiveDate,
    pub shift_mode: ShiftMode,
    pub unknown_participant: UnknownParticipantPolicy,
    pub columns: ColumnMap,
    pub labels: Labels,
    pub participants: Vec<Participant>,
}

impl Default for ChoreConfig {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from("chores.xlsx"),
            source_sheet: None,
            output_path: PathBuf::from("out.xlsx"),
            output_sheet: "Details".into(),
            first_row: 5,
            max_rows: 100,
            weeks_in_year: 52,
            first_day: NaiveDate::from_ymd_opt(2021, 4, 14).unwrap_or_default(),
            last_day: NaiveDate::from_ymd_opt(2021, 12, 31).unwrap_or_default(),
            shift_mode: ShiftMode::default(),
            unknown_participant: UnknownParticipantPolicy::default(),
            columns: ColumnMap::default(),
            labels: Labels::default(),
            participants: vec![
                Participant::new("x", "Maxime"),
                Participant::new("o", "Morgane"),
            ],
        }
    }
}

impl ChoreConfig {
    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        debug!(
            path = %path.display(),
            participants = config.participants.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parse a TOML document without validating it
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the invariants the planner relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.participants.is_empty() {
            return Err(invalid("at least one participant is required"));
        }

        let mut codes = HashSet::new();
        for participant in &self.participants {
            let code = participant.code.to_lowercase();
            if code.is_empty() {
                return Err(invalid(format!(
                    "participant '{}' has an empty code",
                    participant.name
                )));
            }
            if !codes.insert(code) {
                return Err(invalid(format!(
                    "participant code '{}' is used more than once",
                    participant.code
                )));
            }
        }

        // Codes are matched by containment, so "a" would also claim tasks for "al"
        for (index, first) in self.participants.iter().enumerate() {
            for second in &self.participants[index + 1..] {
                let (a, b) = (first.code.to_lowercase(), second.code.to_lowercase());
                if a.contains(&b) || b.contains(&a) {
                    return Err(invalid(format!(
                        "participant codes '{}' and '{}' overlap",
                        first.code, second.code
                    )));
                }
            }
        }

        if self.first_row == 0 {
            return Err(invalid("first_row is 1-based and cannot be 0"));
        }
        if self.max_rows <= self.first_row {
            return Err(invalid(format!(
                "max_rows ({}) must be greater than first_row ({})",
                self.max_rows, self.first_row
            )));
        }
        if self.weeks_in_year == 0 {
            return Err(invalid("weeks_in_year cannot be 0"));
        }
        if self.first_day >= self.last_day {
            return Err(invalid(format!(
                "first_day ({}) must be before last_day ({})",
                self.first_day, self.last_day
            )));
        }
        if let Some(field) = self.columns.zero_column() {
            return Err(invalid(format!("column for '{field}' is 1-based and cannot be 0")));
        }
        if self.output_sheet.trim().is_empty() {
            return Err(invalid("output_sheet cannot be empty"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

/// How a task's `shift` takes part in the recurrence test
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftMode {
    /// `shift` is read and kept but does not move the task
    #[default]
    Ignore,
    /// The week number is offset by `-shift` before the modular test
    Phase,
}

/// What to do with a due task whose code matches no participant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownParticipantPolicy {
    /// Abort the run
    #[default]
    Error,
    /// Log a warning and leave the task unassigned
    Skip,
}

/// 1-based column of each task field in the source sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: u32,
    pub year_frequency: u32,
    pub time: u32,
    pub penibility: u32,
    pub attributed: u32,
    pub shift: u32,
    pub hide: u32,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: 1,
            year_frequency: 2,
            time: 3,
            penibility: 5,
            attributed: 7,
            shift: 8,
            hide: 9,
        }
    }
}

impl ColumnMap {
    fn zero_column(&self) -> Option<&'static str> {
        [
            ("name", self.name),
            ("year_frequency", self.year_frequency),
            ("time", self.time),
            ("penibility", self.penibility),
            ("attributed", self.attributed),
            ("shift", self.shift),
            ("hide", self.hide),
        ]
        .into_iter()
        .find(|(_, column)| *column == 0)
        .map(|(field, _)| field)
    }
}

/// Display templates.
///
/// Placeholders are written `{name}`; unknown placeholders are left as is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    /// Report header, `{duration}`
    pub total_time: String,
    /// `{hours}` and `{minutes}`
    pub hours_and_minutes: String,
    /// `{minutes}`, used below one hour
    pub minutes_only: String,
    /// Checklist line, `{name}` and `{time}`
    pub task_line: String,
    /// Week label, `{first_day}` and `{last_day}`
    pub week_label: String,
    /// Column header, `{participant}`
    pub participant_header: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            total_time: "Total time: {duration}".into(),
            hours_and_minutes: "{hours} hours and {minutes} minutes".into(),
            minutes_only: "{minutes} minutes".into(),
            task_line: "☐ {name} ({time}min)".into(),
            week_label: "Week of {first_day}\n\nto {last_day}".into(),
            participant_header: "To do: {participant}".into(),
        }
    }
}

impl Labels {
    /// French strings of the household workbook
    pub fn french() -> Self {
        Self {
            total_time: "Temps total : {duration}".into(),
            hours_and_minutes: "{hours} heures et {minutes} minutes".into(),
            minutes_only: "{minutes} minutes".into(),
            task_line: "☐ {name} ({time}min)".into(),
            week_label: "Semaine du {first_day}\n\nau {last_day}".into(),
            participant_header: "à faire {participant}".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ChoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.first_row, 5);
        assert_eq!(config.max_rows, 100);
        assert_eq!(config.weeks_in_year, 52);
        assert_eq!(config.participants.len(), 2);
        assert_eq!(config.columns.attributed, 7);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ChoreConfig::from_toml_str(
            r#"
            first_day = "2022-01-03"
            unknown_participant = "skip"

            [labels]
            total_time = "Time: {duration}"
            "#,
        )
        .unwrap();

        assert_eq!(config.first_day, NaiveDate::from_ymd_opt(2022, 1, 3).unwrap());
        assert_eq!(config.unknown_participant, UnknownParticipantPolicy::Skip);
        assert_eq!(config.labels.total_time, "Time: {duration}");
        assert_eq!(config.labels.minutes_only, "{minutes} minutes");
        assert_eq!(config.columns, ColumnMap::default());
        assert_eq!(config.max_rows, 100);
    }

    #[test]
    fn toml_round_trip() {
        let mut config = ChoreConfig::default();
        config.source_sheet = Some("Tâches".into());
        config.shift_mode = ShiftMode::Phase;
        config.labels = Labels::french();

        let text = config.to_toml_string().unwrap();
        let parsed = ChoreConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            workbook_path = "house.xlsx"

            [[participants]]
            code = "a"
            name = "Alex"
            "#
        )
        .unwrap();

        let config = ChoreConfig::load(file.path()).unwrap();
        assert_eq!(config.workbook_path, PathBuf::from("house.xlsx"));
        assert_eq!(config.participants, vec![Participant::new("a", "Alex")]);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = ChoreConfig::load(Path::new("/nonexistent/choreshare.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_toml_fails() {
        let err = ChoreConfig::from_toml_str("first_row = \"five\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_missing_participants() {
        let config = ChoreConfig {
            participants: vec![],
            ..ChoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_duplicate_codes() {
        let config = ChoreConfig {
            participants: vec![Participant::new("x", "A"), Participant::new("X", "B")],
            ..ChoreConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn rejects_overlapping_codes() {
        let config = ChoreConfig {
            participants: vec![
                Participant::new("a", "Alex"),
                Participant::new("b", "Blake"),
                Participant::new("AL", "Alice"),
            ],
            ..ChoreConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'a' and 'AL' overlap"), "{err}");
    }

    #[test]
    fn rejects_empty_code() {
        let config = ChoreConfig {
            participants: vec![Participant::new("", "A")],
            ..ChoreConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_window() {
        let config = ChoreConfig {
            last_day: NaiveDate::from_ymd_opt(2021, 4, 14).unwrap(),
            ..ChoreConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be before"));
    }

    #[test]
    fn rejects_bad_rows_and_columns() {
        let zero_row = ChoreConfig {
            first_row: 0,
            ..ChoreConfig::default()
        };
        assert!(zero_row.validate().is_err());

        let inverted = ChoreConfig {
            first_row: 10,
            max_rows: 10,
            ..ChoreConfig::default()
        };
        assert!(inverted.validate().is_err());

        let zero_column = ChoreConfig {
            columns: ColumnMap {
                hide: 0,
                ..ColumnMap::default()
            },
            ..ChoreConfig::default()
        };
        let err = zero_column.validate().unwrap_err();
        assert!(err.to_string().contains("'hide'"));

        let no_cycle = ChoreConfig {
            weeks_in_year: 0,
            ..ChoreConfig::default()
        };
        assert!(no_cycle.validate().is_err());
    }
}
