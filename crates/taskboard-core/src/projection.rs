//! Data shapes handed to the rendering collaborators.
//!
//! Nothing here draws anything: the calendar widget gets [`CalendarEvent`]s,
//! the chart collaborator gets [`Summary`] tables, and the search sidebar
//! gets [`BacklogEntry`] lines.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::task::{format_time, Priority, Task, DATE_FORMAT};

/// One event for the week-view calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
}

impl CalendarEvent {
    pub fn from_task(task: &Task) -> Self {
        let day = task.due_date.format(DATE_FORMAT);
        Self {
            id: task.id.to_string(),
            title: format!("{} ({})", task.text, task.priority),
            start: format!("{day}T{}", format_time(task.start_time)),
            end: format!("{day}T{}", format_time(task.end_time)),
            all_day: false,
        }
    }
}

/// Calendar events for `rows`, keeping the first of any `(id, start, end)` duplicate.
pub fn calendar_events(rows: &[Task]) -> Vec<CalendarEvent> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|t| seen.insert((t.id, t.start_time, t.end_time)))
        .map(CalendarEvent::from_task)
        .collect()
}

/// Slice of the completion pie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSlice {
    pub status: &'static str,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
    pub due_date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
    pub color: &'static str,
}

/// Fixed bar color per priority.
pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "red",
        Priority::Medium => "orange",
        Priority::Low => "yellow",
    }
}

/// Completed vs Not Completed. Slices with a zero count are left out.
pub fn completion_pie(rows: &[Task]) -> Vec<StatusSlice> {
    let done = rows.iter().filter(|t| t.done).count();
    let pending = rows.len() - done;
    [
        StatusSlice {
            status: "Not Completed",
            count: pending,
            color: "red",
        },
        StatusSlice {
            status: "Completed",
            count: done,
            color: "blue",
        },
    ]
    .into_iter()
    .filter(|s| s.count > 0)
    .collect()
}

/// Task count per due date, oldest first.
pub fn count_by_due_date(rows: &[Task]) -> Vec<DateCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for task in rows {
        *counts.entry(task.due_date).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(due_date, count)| DateCount { due_date, count })
        .collect()
}

/// Task count per priority in High, Medium, Low order, absent priorities omitted.
pub fn count_by_priority(rows: &[Task]) -> Vec<PriorityCount> {
    Priority::ALL
        .into_iter()
        .filter_map(|priority| {
            let count = rows.iter().filter(|t| t.priority == priority).count();
            (count > 0).then(|| PriorityCount {
                priority,
                count,
                color: priority_color(priority),
            })
        })
        .collect()
}

/// All three aggregates for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub completion: Vec<StatusSlice>,
    pub by_due_date: Vec<DateCount>,
    pub by_priority: Vec<PriorityCount>,
}

impl Summary {
    pub fn of(rows: &[Task]) -> Self {
        Self {
            completion: completion_pie(rows),
            by_due_date: count_by_due_date(rows),
            by_priority: count_by_priority(rows),
        }
    }
}

/// A recent task matching the current search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogEntry {
    pub id: i64,
    pub line: String,
}

impl BacklogEntry {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            line: format!(
                "{} {}–{} {} Done={}",
                task.due_date.format(DATE_FORMAT),
                format_time(task.start_time),
                format_time(task.end_time),
                task.priority,
                if task.done { "Yes" } else { "No" }
            ),
        }
    }
}

/// First due date still inside a backlog window of `days` ending `today`.
pub fn backlog_cutoff(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{parse_date, parse_time};

    fn task(id: i64, priority: Priority, due: &str, done: bool) -> Task {
        Task {
            id,
            text: format!("task {id}"),
            priority,
            due_date: parse_date(due).unwrap(),
            start_time: parse_time("09:00").unwrap(),
            end_time: parse_time("10:30").unwrap(),
            done,
        }
    }

    #[test]
    fn calendar_event_shape() {
        let events = calendar_events(&[task(3, Priority::Medium, "2024-01-10", false)]);
        assert_eq!(
            events,
            vec![CalendarEvent {
                id: "3".into(),
                title: "task 3 (Medium)".into(),
                start: "2024-01-10T09:00".into(),
                end: "2024-01-10T10:30".into(),
                all_day: false,
            }]
        );
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["allDay"], false);
    }

    #[test]
    fn calendar_suppresses_duplicates() {
        let a = task(1, Priority::High, "2024-01-10", false);
        let mut moved = a.clone();
        moved.end_time = parse_time("11:00").unwrap();
        let events = calendar_events(&[a.clone(), a, moved]);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn pie_counts_done_and_pending() {
        let rows = vec![
            task(1, Priority::High, "2024-01-10", true),
            task(2, Priority::High, "2024-01-10", false),
            task(3, Priority::Low, "2024-01-11", false),
        ];
        let pie = completion_pie(&rows);
        assert_eq!(pie[0].status, "Not Completed");
        assert_eq!(pie[0].count, 2);
        assert_eq!(pie[1].status, "Completed");
        assert_eq!(pie[1].count, 1);
        assert!(completion_pie(&[]).is_empty());
    }

    #[test]
    fn counts_by_date_ascend() {
        let rows = vec![
            task(1, Priority::High, "2024-02-01", false),
            task(2, Priority::High, "2024-01-10", false),
            task(3, Priority::Low, "2024-02-01", false),
        ];
        let by_date = count_by_due_date(&rows);
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[0].due_date, parse_date("2024-01-10").unwrap());
        assert_eq!(by_date[1].count, 2);
    }

    #[test]
    fn counts_by_priority_use_fixed_colors() {
        let rows = vec![
            task(1, Priority::Low, "2024-01-10", false),
            task(2, Priority::High, "2024-01-10", false),
            task(3, Priority::Low, "2024-01-10", false),
        ];
        let by_priority = count_by_priority(&rows);
        assert_eq!(by_priority.len(), 2);
        assert_eq!(by_priority[0].priority, Priority::High);
        assert_eq!(by_priority[0].color, "red");
        assert_eq!(by_priority[1].priority, Priority::Low);
        assert_eq!(by_priority[1].count, 2);
        assert_eq!(by_priority[1].color, "yellow");
        assert_eq!(priority_color(Priority::Medium), "orange");
    }

    #[test]
    fn backlog_line_format() {
        let entry = BacklogEntry::from_task(&task(9, Priority::Low, "2024-03-05", true));
        assert_eq!(entry.line, "2024-03-05 09:00–10:30 Low Done=Yes");
    }

    #[test]
    fn backlog_cutoff_counts_back_days() {
        let today = parse_date("2024-03-01").unwrap();
        assert_eq!(backlog_cutoff(today, 30), parse_date("2024-01-31").unwrap());
        assert_eq!(backlog_cutoff(today, 0), today);
    }
}
