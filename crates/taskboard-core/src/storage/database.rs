//! SQLite-backed task storage.
//!
//! Provides persistent storage for:
//! - Tasks (one row per task, full-row updates)
//! - The global star counter
//! - Daily reflections keyed by date
//! - Key-value store for UI state such as the manual task order

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

use super::data_dir;
use super::migrations;
use super::repository::Repository;
use crate::error::{DatabaseError, Result};
use crate::task::{
    format_time, parse_date, parse_time, NewTask, Priority, Task, TaskEdit, DATE_FORMAT,
};

const TASK_COLUMNS: &str = "id, task, priority, due_date, start_time, end_time, done";

fn conversion_error(index: usize, err: crate::error::ValidationError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
}

/// Build a Task from a row selected with [`TASK_COLUMNS`].
fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let priority: String = row.get(2)?;
    let due_date: String = row.get(3)?;
    let start_time: String = row.get(4)?;
    let end_time: String = row.get(5)?;
    let done: Option<i64> = row.get(6)?;

    Ok(Task {
        id: row.get(0)?,
        text: row.get(1)?,
        priority: priority
            .parse::<Priority>()
            .map_err(|e| conversion_error(2, e))?,
        due_date: parse_date(&due_date).map_err(|e| conversion_error(3, e))?,
        start_time: parse_time(&start_time).map_err(|e| conversion_error(4, e))?,
        end_time: parse_time(&end_time).map_err(|e| conversion_error(5, e))?,
        done: done.unwrap_or(0) != 0,
    })
}

/// Decode failures of a task row become [`DatabaseError::CorruptRow`].
fn task_row_error(err: rusqlite::Error) -> DatabaseError {
    match err {
        err @ (rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)) => DatabaseError::CorruptRow {
            table: "tasks",
            message: err.to_string(),
        },
        other => other.into(),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Escape `%`, `_` and the escape char itself for a `LIKE ... ESCAPE '\'` pattern.
fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// SQLite database for tasks, stars and reflections.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/taskboard.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unusable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("taskboard.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn query_tasks(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(task_row_error)?);
        }
        Ok(tasks)
    }
}

impl Repository for Database {
    fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let tasks = self.query_tasks(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"), [])?;
        debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    fn get_task(&self, id: i64) -> Result<Option<Task>, DatabaseError> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()
            .map_err(task_row_error)?;
        Ok(task)
    }

    fn add_task(&self, task: &NewTask) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (task, priority, due_date, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.text,
                task.priority.as_str(),
                format_date(task.due_date),
                format_time(task.start_time),
                format_time(task.end_time),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, priority = %task.priority, "task added");
        Ok(id)
    }

    fn update_task(&self, id: i64, edit: &TaskEdit) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET task = ?1, priority = ?2, due_date = ?3, start_time = ?4, end_time = ?5, done = ?6
             WHERE id = ?7",
            params![
                edit.text,
                edit.priority.as_str(),
                format_date(edit.due_date),
                format_time(edit.start_time),
                format_time(edit.end_time),
                i64::from(edit.done),
                id,
            ],
        )?;
        if changed == 0 {
            debug!(id, "update skipped: task no longer exists");
        }
        Ok(())
    }

    fn delete_task(&self, id: i64) -> Result<(), DatabaseError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!(id, "task deleted");
        }
        Ok(())
    }

    fn clear_completed(&self) -> Result<usize, DatabaseError> {
        let removed = self.conn.execute("DELETE FROM tasks WHERE done = 1", [])?;
        info!(removed, "cleared completed tasks");
        Ok(removed)
    }

    fn search_backlog(&self, needle: &str, since: NaiveDate) -> Result<Vec<Task>, DatabaseError> {
        self.query_tasks(
            &format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE task LIKE ?1 ESCAPE '\\' AND due_date >= ?2
                 ORDER BY due_date DESC, id"
            ),
            params![like_pattern(needle), format_date(since)],
        )
    }

    fn get_stars(&self) -> Result<i64, DatabaseError> {
        let stars = self
            .conn
            .query_row("SELECT stars FROM stats WHERE id = 1", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .flatten()
            .unwrap_or(0);
        Ok(stars)
    }

    fn add_stars(&self, n: u32) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE stats SET stars = COALESCE(stars, 0) + ?1 WHERE id = 1",
            params![n],
        )?;
        Ok(())
    }

    fn get_reflection(&self, date: NaiveDate) -> Result<Option<String>, DatabaseError> {
        let entry = self
            .conn
            .query_row(
                "SELECT entry FROM reflections WHERE date = ?1",
                params![format_date(date)],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(entry.map(Option::unwrap_or_default))
    }

    fn upsert_reflection(&self, date: NaiveDate, entry: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO reflections (date, entry) VALUES (?1, ?2)
             ON CONFLICT(date) DO UPDATE SET entry = excluded.entry",
            params![format_date(date), entry],
        )?;
        info!(%date, "reflection saved");
        Ok(())
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn milk() -> NewTask {
        NewTask {
            text: "Buy milk".to_string(),
            priority: Priority::High,
            due_date: parse_date("2024-01-10").unwrap(),
            start_time: parse_time("09:00").unwrap(),
            end_time: parse_time("10:00").unwrap(),
        }
    }

    #[test]
    fn add_then_list_yields_one_pending_row() {
        let db = Database::open_memory().unwrap();
        let id = db.add_task(&milk()).unwrap();
        assert_eq!(id, 1);

        let tasks = db.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].text, "Buy milk");
        assert_eq!(tasks[0].priority, Priority::High);
        assert!(!tasks[0].done);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let db = Database::open_memory().unwrap();
        let first = db.add_task(&milk()).unwrap();
        db.delete_task(first).unwrap();
        let second = db.add_task(&milk()).unwrap();
        assert!(second > first);
    }

    #[test]
    fn update_replaces_full_row() {
        let db = Database::open_memory().unwrap();
        let id = db.add_task(&milk()).unwrap();
        let edit = TaskEdit {
            text: "Buy oat milk".into(),
            priority: Priority::Low,
            due_date: parse_date("2024-02-01").unwrap(),
            start_time: parse_time("18:00").unwrap(),
            end_time: parse_time("17:00").unwrap(),
            done: true,
        };
        db.update_task(id, &edit).unwrap();

        let task = db.get_task(id).unwrap().unwrap();
        assert_eq!(task.to_edit(), edit);
    }

    #[test]
    fn writes_to_missing_ids_are_silent() {
        let db = Database::open_memory().unwrap();
        let edit = milk();
        let edit = TaskEdit {
            text: edit.text,
            priority: edit.priority,
            due_date: edit.due_date,
            start_time: edit.start_time,
            end_time: edit.end_time,
            done: true,
        };
        db.update_task(42, &edit).unwrap();
        db.delete_task(42).unwrap();
        assert!(db.list_tasks().unwrap().is_empty());
        assert!(db.get_task(42).unwrap().is_none());
    }

    #[test]
    fn clear_completed_only_removes_done_rows() {
        let db = Database::open_memory().unwrap();
        let keep = db.add_task(&milk()).unwrap();
        let finished = db.add_task(&milk()).unwrap();
        let mut edit = db.get_task(finished).unwrap().unwrap().to_edit();
        edit.done = true;
        db.update_task(finished, &edit).unwrap();

        assert_eq!(db.clear_completed().unwrap(), 1);
        assert_eq!(db.clear_completed().unwrap(), 0);
        let ids: Vec<i64> = db.list_tasks().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn stars_accumulate() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.get_stars().unwrap(), 0);
        db.add_star().unwrap();
        db.add_stars(4).unwrap();
        assert_eq!(db.get_stars().unwrap(), 5);
    }

    #[test]
    fn reflection_upsert_keeps_one_entry_per_date() {
        let db = Database::open_memory().unwrap();
        let day = parse_date("2024-05-05").unwrap();
        assert!(db.get_reflection(day).unwrap().is_none());

        db.upsert_reflection(day, "Good day").unwrap();
        db.upsert_reflection(day, "Great day").unwrap();
        assert_eq!(db.get_reflection(day).unwrap().as_deref(), Some("Great day"));

        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM reflections", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn backlog_matches_text_and_cutoff_newest_first() {
        let db = Database::open_memory().unwrap();
        for (text, due) in [
            ("Pay rent", "2024-01-01"),
            ("Pay bills", "2024-03-01"),
            ("Pay taxes", "2023-06-01"),
            ("Walk dog", "2024-03-02"),
        ] {
            let mut task = milk();
            task.text = text.into();
            task.due_date = parse_date(due).unwrap();
            db.add_task(&task).unwrap();
        }

        let hits = db
            .search_backlog("pay", parse_date("2023-12-01").unwrap())
            .unwrap();
        let texts: Vec<&str> = hits.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Pay bills", "Pay rent"]);
    }

    #[test]
    fn backlog_treats_wildcards_literally() {
        let db = Database::open_memory().unwrap();
        let mut task = milk();
        task.text = "50% off".into();
        db.add_task(&task).unwrap();
        db.add_task(&milk()).unwrap();

        let since = parse_date("2000-01-01").unwrap();
        assert_eq!(db.search_backlog("%", since).unwrap().len(), 1);
        assert_eq!(db.search_backlog("_", since).unwrap().len(), 0);
    }

    #[test]
    fn corrupt_priority_is_reported() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO tasks (task, priority, due_date, start_time, end_time)
                 VALUES ('x', 'Urgent', '2024-01-01', '09:00', '10:00')",
                [],
            )
            .unwrap();
        assert!(matches!(
            db.list_tasks(),
            Err(DatabaseError::CorruptRow { table: "tasks", .. })
        ));
        assert!(matches!(
            db.get_task(1),
            Err(DatabaseError::CorruptRow { table: "tasks", .. })
        ));
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn reopening_a_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskboard.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.add_task(&milk()).unwrap();
            db.add_star().unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.list_tasks().unwrap().len(), 1);
        assert_eq!(db.get_stars().unwrap(), 1);
    }
}
