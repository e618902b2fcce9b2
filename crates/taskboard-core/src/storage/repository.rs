//! Storage seam between the command handlers and the persistence backend.

use chrono::NaiveDate;

use crate::error::DatabaseError;
use crate::task::{NewTask, Task, TaskEdit};

/// Explicit per-entity storage operations.
///
/// Every method is a single self-contained statement. Writes that target a
/// missing task id succeed without effect.
pub trait Repository {
    /// All task rows in storage order.
    fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError>;

    fn get_task(&self, id: i64) -> Result<Option<Task>, DatabaseError>;

    /// Insert a task with `done = false` and return its id.
    fn add_task(&self, task: &NewTask) -> Result<i64, DatabaseError>;

    /// Replace every mutable column of the row.
    fn update_task(&self, id: i64, edit: &TaskEdit) -> Result<(), DatabaseError>;

    fn delete_task(&self, id: i64) -> Result<(), DatabaseError>;

    /// Delete every done task, returning how many rows went away.
    fn clear_completed(&self) -> Result<usize, DatabaseError>;

    /// Tasks whose text contains `needle`, due on or after `since`, newest first.
    fn search_backlog(&self, needle: &str, since: NaiveDate) -> Result<Vec<Task>, DatabaseError>;

    fn get_stars(&self) -> Result<i64, DatabaseError>;

    fn add_stars(&self, n: u32) -> Result<(), DatabaseError>;

    fn add_star(&self) -> Result<(), DatabaseError> {
        self.add_stars(1)
    }

    fn get_reflection(&self, date: NaiveDate) -> Result<Option<String>, DatabaseError>;

    fn upsert_reflection(&self, date: NaiveDate, entry: &str) -> Result<(), DatabaseError>;

    fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError>;

    fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;

    fn kv_delete(&self, key: &str) -> Result<(), DatabaseError>;
}
