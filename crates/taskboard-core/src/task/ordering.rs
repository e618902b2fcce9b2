//! Display ordering: base sort, text search, visibility filter and manual reorder.
//!
//! The pipeline is deterministic and never fails. An empty input yields an
//! empty output and the caller renders a neutral "nothing to show" state.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use super::{Priority, Task};
use crate::error::ValidationError;

/// Which tasks the list shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Visibility {
    #[default]
    All,
    /// Only High priority.
    PriorityOnly,
    /// Medium and Low.
    NonPriorityOnly,
}

impl Visibility {
    pub fn keeps(self, task: &Task) -> bool {
        match self {
            Visibility::All => true,
            Visibility::PriorityOnly => task.priority == Priority::High,
            Visibility::NonPriorityOnly => task.priority != Priority::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Visibility::All => "All",
            Visibility::PriorityOnly => "Priority Only",
            Visibility::NonPriorityOnly => "Non-Priority Only",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Visibility {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Visibility {
    type Err = ValidationError;

    /// Accepts both the menu labels ("Priority Only") and kebab-case ("priority-only").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();
        match key.as_str() {
            "all" => Ok(Visibility::All),
            "priority-only" => Ok(Visibility::PriorityOnly),
            "non-priority-only" => Ok(Visibility::NonPriorityOnly),
            _ => Err(ValidationError::UnknownVisibility(s.to_string())),
        }
    }
}

/// UI state that shapes the display sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    pub search: String,
    pub visibility: Visibility,
    /// Ids in the order the user dragged them into.
    pub manual_order: Option<Vec<i64>>,
}

/// Stable sort by `(priority rank, done)`.
///
/// The secondary key is the stored done flag, so pending tasks come before
/// finished ones of the same priority. Due date plays no part.
pub fn base_sort(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (t.priority.rank(), u8::from(t.done)));
}

/// Case-insensitive substring match on the task text. An empty needle matches everything.
pub fn matches_search(task: &Task, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || task.text.to_lowercase().contains(&needle.to_lowercase())
}

/// Parse the id prefix of a reorder label (`"<id>: <text>"`).
pub fn label_id(label: &str) -> Option<i64> {
    let (id, _) = label.split_once(':')?;
    id.trim().parse().ok()
}

pub fn reorder_labels(rows: &[Task]) -> Vec<String> {
    rows.iter().map(Task::reorder_label).collect()
}

/// What the drag-reorder widget is handed for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    /// Unique per render so the widget does not reuse a stale list.
    pub key: String,
    pub labels: Vec<String>,
}

impl ReorderRequest {
    pub fn new(scope: &str, rows: &[Task]) -> Self {
        Self {
            key: format!("{scope}_sort_{}", rows.len()),
            labels: reorder_labels(rows),
        }
    }
}

/// Map a widget permutation back to full rows.
///
/// Labels whose id is unparsable or no longer among `rows` are dropped.
/// Repeated ids are emitted once.
pub fn reconcile<S: AsRef<str>>(labels: &[S], rows: &[Task]) -> Vec<Task> {
    let order: Vec<i64> = labels
        .iter()
        .filter_map(|label| label_id(label.as_ref()))
        .collect();
    reconcile_ids(&order, rows)
}

/// Id-based form of [`reconcile`].
pub fn reconcile_ids(order: &[i64], rows: &[Task]) -> Vec<Task> {
    let by_id: HashMap<i64, &Task> = rows.iter().map(|t| (t.id, t)).collect();
    let mut seen = HashSet::with_capacity(order.len());
    order
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| by_id.get(id).map(|t| (*t).clone()))
        .collect()
}

/// Reorder `rows` by `order`, then append rows the order never mentioned
/// in their incoming sequence.
pub fn apply_manual_order(order: &[i64], rows: &[Task]) -> Vec<Task> {
    let mut ordered = reconcile_ids(order, rows);
    let placed: HashSet<i64> = ordered.iter().map(|t| t.id).collect();
    ordered.extend(rows.iter().filter(|t| !placed.contains(&t.id)).cloned());
    ordered
}

/// Full pipeline: base sort, search, visibility, then manual order.
pub fn display_sequence(tasks: Vec<Task>, query: &TaskQuery) -> Vec<Task> {
    let mut rows = tasks;
    base_sort(&mut rows);
    rows.retain(|t| matches_search(t, &query.search) && query.visibility.keeps(t));
    match &query.manual_order {
        Some(order) => apply_manual_order(order, &rows),
        None => rows,
    }
}
