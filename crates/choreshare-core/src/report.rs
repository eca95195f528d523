//! Weekly report text: total time followed by a checklist

use chrono::NaiveDate;

use crate::config::Labels;
use crate::Task;

/// Format a participant's tasks for one week with the default labels
pub fn format_tasks(tasks: &[Task]) -> String {
    format_tasks_with(tasks, &Labels::default())
}

/// Format a participant's tasks for one week.
///
/// The header gives the total time, truncated to whole minutes. Each task then
/// gets a checklist line with its own time rounded to the minute. An empty list
/// yields only the header.
pub fn format_tasks_with(tasks: &[Task], labels: &Labels) -> String {
    let header = fill(
        &labels.total_time,
        &[("duration", format_duration(total_minutes(tasks), labels).as_str())],
    );

    if tasks.is_empty() {
        return header;
    }

    let lines: Vec<String> = tasks
        .iter()
        .map(|task| {
            fill(
                &labels.task_line,
                &[
                    ("name", task.name.as_str()),
                    ("time", format!("{:.0}", task.time).as_str()),
                ],
            )
        })
        .collect();

    format!("{header}\n\n{}", lines.join("\n"))
}

/// Sum of task times, truncated to whole minutes
pub fn total_minutes(tasks: &[Task]) -> i64 {
    tasks.iter().map(|task| task.time).sum::<f64>().trunc() as i64
}

/// "1 hours and 15 minutes", or "45 minutes" under an hour
pub fn format_duration(total_minutes: i64, labels: &Labels) -> String {
    let hours = total_minutes.div_euclid(60);
    let minutes = total_minutes.rem_euclid(60).to_string();

    if hours == 0 {
        fill(&labels.minutes_only, &[("minutes", minutes.as_str())])
    } else {
        fill(
            &labels.hours_and_minutes,
            &[("hours", hours.to_string().as_str()), ("minutes", minutes.as_str())],
        )
    }
}

/// Label of the week starting on `start` and ending on `end`
pub fn format_week_label(labels: &Labels, start: NaiveDate, end: NaiveDate) -> String {
    fill(
        &labels.week_label,
        &[
            ("first_day", start.format("%d %b").to_string().as_str()),
            ("last_day", end.format("%d %b %Y").to_string().as_str()),
        ],
    )
}

/// Column header for a participant
pub fn format_participant_header(labels: &Labels, participant: &str) -> String {
    fill(&labels.participant_header, &[("participant", participant)])
}

/// Substitute `{key}` placeholders in a single pass.
///
/// Substituted values are not scanned again, and unknown placeholders are kept.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substitution = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (close, *value))
        });

        match substitution {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
