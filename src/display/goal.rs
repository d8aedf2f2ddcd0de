//! Goal display formatting

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{format_percentage, progress_bar, truncate};
use crate::models::Goal;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
}

fn deadline_text(goal: &Goal, today: NaiveDate) -> String {
    if goal.is_complete() {
        return "Reached".to_string();
    }
    match goal.days_left(today) {
        d if d < 0 => format!("{} (passed)", goal.target_date.format("%Y-%m-%d")),
        0 => "Today".to_string(),
        1 => "1 day left".to_string(),
        d => format!("{} days left", d),
    }
}

pub fn format_goal_table(goals: &[Goal], today: NaiveDate) -> String {
    if goals.is_empty() {
        return "No savings goals yet.\n".to_string();
    }

    let rows = goals.iter().map(|g| GoalRow {
        id: g.id.to_string(),
        name: truncate(&g.name, 28),
        saved: g.current_amount.to_string(),
        target: g.target_amount.to_string(),
        progress: format!("{} {}", progress_bar(g.progress(), 10), format_percentage(g.progress())),
        deadline: deadline_text(g, today),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

pub fn format_goal_details(goal: &Goal, today: NaiveDate) -> String {
    let mut output = String::new();
    output.push_str(&format!("Goal:      {} ({})\n", goal.name, goal.id));
    output.push_str(&format!("Saved:     {} of {}\n", goal.current_amount, goal.target_amount));
    output.push_str(&format!("Remaining: {}\n", goal.remaining()));
    output.push_str(&format!(
        "Progress:  {} {}\n",
        progress_bar(goal.progress(), 20),
        format_percentage(goal.progress())
    ));
    output.push_str(&format!(
        "Deadline:  {} ({})\n",
        goal.target_date.format("%Y-%m-%d"),
        deadline_text(goal, today)
    ));
    if let Some(description) = &goal.description {
        output.push_str(&format!("Notes:     {}\n", description));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entity, GoalDraft, GoalId, Money};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_goal_table() {
        let goal = Goal::from_draft(
            GoalId::new(3),
            GoalDraft::new("Vacation", Money::from_units(2_000), date(2025, 7, 1))
                .with_current(Money::from_units(500)),
        );
        let text = format_goal_table(&[goal.clone()], date(2025, 6, 21));
        assert!(text.contains("Vacation"));
        assert!(text.contains("25%"));
        assert!(text.contains("10 days left"));

        let details = format_goal_details(&goal, date(2025, 6, 21));
        assert!(details.contains("Remaining: $1,500.00"));
    }

    #[test]
    fn test_completed_goal_shows_reached() {
        let goal = Goal::from_draft(
            GoalId::new(1),
            GoalDraft::new("Laptop", Money::from_units(100), date(2025, 1, 1))
                .with_current(Money::from_units(100)),
        );
        assert!(format_goal_table(&[goal], date(2025, 6, 1)).contains("Reached"));
    }
}
