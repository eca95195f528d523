//! Plain-text rendering, for previewing a plan in the terminal

use choreshare_core::report::format_participant_header;
use choreshare_core::{format_tasks_with, ChorePlan, Labels, RenderError, Renderer, WeekBucket};

/// Markdown-flavoured text renderer
#[derive(Clone, Debug, Default)]
pub struct TextRenderer {
    pub labels: Labels,
    /// Leave out weeks where nobody has anything to do
    pub skip_empty_weeks: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn skip_empty_weeks(mut self) -> Self {
        self.skip_empty_weeks = true;
        self
    }

    fn render_week(&self, plan: &ChorePlan, week: &WeekBucket, out: &mut String) {
        let label = week.label.split_whitespace().collect::<Vec<_>>().join(" ");
        out.push_str(&format!("## {label} (week {})\n", week.week_number));

        for participant in &plan.participants {
            out.push_str(&format!(
                "\n### {}\n",
                format_participant_header(&self.labels, &participant.name)
            ));
            out.push_str(&format_tasks_with(week.tasks_for(&participant.code), &self.labels));
            out.push('\n');
        }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, plan: &ChorePlan) -> Result<String, RenderError> {
        let mut out = String::new();

        for week in &plan.weeks {
            if self.skip_empty_weeks && week.assignment_count() == 0 {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            self.render_week(plan, week, &mut out);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choreshare_core::{ChoreConfig, Task, WeekAssigner};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_each_participant() {
        let config = ChoreConfig::default();
        let tasks = vec![Task::new("Dishes").row(5).time(30.0).attributed("x")];
        let mut plan = WeekAssigner::new(&config).plan_tasks("Tasks", &tasks).unwrap();
        plan.weeks.truncate(1);

        let text = TextRenderer::new().render(&plan).unwrap();
        assert_eq!(
            text,
            "## Week of 14 Apr to 20 Apr 2021 (week 15)\n\
             \n### To do: Maxime\n\
             Total time: 30 minutes\n\n☐ Dishes (30min)\n\
             \n### To do: Morgane\n\
             Total time: 0 minutes\n"
        );
    }

    #[test]
    fn skips_empty_weeks() {
        let config = ChoreConfig::default();
        // Twice a year: weeks 26 and 52 only
        let tasks = vec![Task::new("Oven").row(5).frequency(2.0).time(60.0).attributed("o")];
        let plan = WeekAssigner::new(&config).plan_tasks("Tasks", &tasks).unwrap();

        let text = TextRenderer::new().skip_empty_weeks().render(&plan).unwrap();
        assert_eq!(text.matches("## Week of").count(), 2);
        assert!(text.contains("(week 26)"));
        assert!(text.contains("(week 52)"));

        let full = TextRenderer::new().render(&plan).unwrap();
        assert_eq!(full.matches("## Week of").count(), plan.weeks.len());
    }
}
