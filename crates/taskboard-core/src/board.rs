//! Command handlers for every user interaction.
//!
//! Each handler runs to completion against the repository and returns a
//! [`Response`] carrying a fresh [`BoardView`]. The caller decides when to
//! redraw; nothing here re-renders on its own.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::projection::{
    backlog_cutoff, calendar_events, BacklogEntry, CalendarEvent, Summary,
};
use crate::session::{Palette, Profile, Session, Theme};
use crate::storage::{Config, Repository};
use crate::task::lifecycle::{self, SaveOutcome};
use crate::task::ordering::{self, ReorderRequest, Visibility};
use crate::task::{NewTask, Task, TaskEdit};

/// kv key under which the manual order survives restarts.
pub const MANUAL_ORDER_KEY: &str = "manual_order";

/// Everything the task page renders.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub rows: Vec<Task>,
    /// True when `rows` is empty; the page shows "No tasks to show." instead of a list.
    pub is_empty: bool,
    pub stars: i64,
    pub theme: Theme,
    pub palette: Palette,
    pub visibility: Visibility,
    pub reorder: ReorderRequest,
    pub calendar: Vec<CalendarEvent>,
    pub summary: Summary,
}

/// What the search sidebar renders.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub search: String,
    pub reorder: ReorderRequest,
    pub backlog: Vec<BacklogEntry>,
}

/// User-facing message produced by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    TaskAdded { id: i64 },
    TaskUpdated { outcome: SaveOutcome },
    TaskDeleted { id: i64 },
    CompletedCleared { removed: usize },
    Reordered { order: Vec<i64> },
    ReflectionSaved { date: NaiveDate },
    ProfileSaved,
    /// The command touched a task that no longer exists.
    Nothing,
}

impl Notice {
    /// One-line message for the status area.
    pub fn message(&self) -> String {
        match self {
            Notice::TaskAdded { id } => format!("Task added! (#{id})"),
            Notice::TaskUpdated { outcome } if outcome.earned_star() => {
                "You earned a star!".to_string()
            }
            Notice::TaskUpdated { .. } => "Task updated!".to_string(),
            Notice::TaskDeleted { id } => format!("Task #{id} deleted"),
            Notice::CompletedCleared { removed } => format!("Cleared {removed} completed task(s)"),
            Notice::Reordered { .. } => "Order saved".to_string(),
            Notice::ReflectionSaved { .. } => "Reflection saved!".to_string(),
            Notice::ProfileSaved => "Profile updated!".to_string(),
            Notice::Nothing => "Nothing to do".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub notice: Notice,
    pub view: BoardView,
}

/// Handler facade owning the repository, the configuration and one session.
pub struct Board<R: Repository> {
    repo: R,
    config: Config,
    session: Session,
}

impl<R: Repository> Board<R> {
    /// Build a board with a fresh logged-out session and the persisted manual order.
    pub fn new(repo: R, config: Config) -> Result<Self> {
        let session = Session::new(&config.ui);
        let mut board = Self {
            repo,
            config,
            session,
        };
        board.session.manual_order = board.load_manual_order()?;
        Ok(board)
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn load_manual_order(&self) -> Result<Option<Vec<i64>>> {
        match self.repo.kv_get(MANUAL_ORDER_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(order) => Ok(Some(order)),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable manual order");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    // --- session ---

    pub fn login(&mut self, email: &str, password: &str, theme: Option<Theme>) -> Result<()> {
        self.session.login(email, password, theme)?;
        self.session.manual_order = self.load_manual_order()?;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Save the settings-page profile.
    ///
    /// # Errors
    /// An out-of-range age is rejected and the previous profile kept.
    pub fn save_profile(&mut self, profile: Profile) -> Result<Response> {
        self.session
            .save_profile(profile)
            .inspect_err(|e| warn!(error = %e, "rejected profile"))?;
        self.respond(Notice::ProfileSaved)
    }

    pub fn set_search(&mut self, text: &str) {
        self.session.search = text.to_string();
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.session.visibility = visibility;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.session.theme = theme;
    }

    /// Ignore the manual order for this session without forgetting it.
    pub fn use_base_order(&mut self) {
        self.session.manual_order = None;
    }

    // --- views ---

    /// Ordered, filtered rows for the current session.
    pub fn rows(&self) -> Result<Vec<Task>> {
        let tasks = self.repo.list_tasks()?;
        Ok(ordering::display_sequence(tasks, &self.session.query()))
    }

    pub fn view(&self) -> Result<BoardView> {
        let rows = self.rows()?;
        let stars = self.repo.get_stars()?;
        debug!(rows = rows.len(), stars, "built board view");
        Ok(BoardView {
            is_empty: rows.is_empty(),
            stars,
            theme: self.session.theme,
            palette: self.session.theme.palette(),
            visibility: self.session.visibility,
            reorder: ReorderRequest::new("task", &rows),
            calendar: calendar_events(&rows),
            summary: Summary::of(&rows),
            rows,
        })
    }

    /// Search sidebar: matching rows for reordering plus the recent backlog.
    pub fn search_view(&self, today: NaiveDate) -> Result<SearchView> {
        let rows = self.rows()?;
        let search = self.session.search.trim().to_string();
        let backlog = if search.is_empty() {
            Vec::new()
        } else {
            let since = backlog_cutoff(today, self.config.backlog_days);
            self.repo
                .search_backlog(&search, since)?
                .iter()
                .map(BacklogEntry::from_task)
                .collect()
        };
        Ok(SearchView {
            reorder: ReorderRequest::new("sidebar", &rows),
            search,
            backlog,
        })
    }

    fn respond(&self, notice: Notice) -> Result<Response> {
        Ok(Response {
            notice,
            view: self.view()?,
        })
    }

    // --- task commands ---

    /// Add-form payload pre-filled from the configured defaults.
    pub fn draft(&self, text: &str, due_date: NaiveDate) -> NewTask {
        let defaults = &self.config.defaults;
        NewTask {
            text: text.to_string(),
            priority: defaults.priority,
            due_date,
            start_time: defaults.start_time,
            end_time: defaults.end_time,
        }
    }

    /// # Errors
    /// Empty text is rejected before anything is written.
    pub fn add_task(&mut self, task: NewTask) -> Result<Response> {
        let task = task.validate().inspect_err(|e| warn!(error = %e, "rejected new task"))?;
        let id = self.repo.add_task(&task)?;
        self.respond(Notice::TaskAdded { id })
    }

    /// Save the edit form of task `id`. A vanished task is a silent no-op.
    pub fn save_task(&mut self, id: i64, edit: TaskEdit) -> Result<Response> {
        let Some(prior) = self.repo.get_task(id)? else {
            debug!(id, "save ignored: task no longer exists");
            return self.respond(Notice::Nothing);
        };
        let outcome = lifecycle::save_task(&self.repo, &prior, edit)?;
        self.respond(Notice::TaskUpdated { outcome })
    }

    pub fn toggle_done(&mut self, id: i64, done: bool) -> Result<Response> {
        let notice = match lifecycle::toggle_done(&self.repo, id, done)? {
            Some(outcome) => Notice::TaskUpdated { outcome },
            None => Notice::Nothing,
        };
        self.respond(notice)
    }

    pub fn delete_task(&mut self, id: i64) -> Result<Response> {
        self.repo.delete_task(id)?;
        self.respond(Notice::TaskDeleted { id })
    }

    pub fn clear_completed(&mut self) -> Result<Response> {
        let removed = self.repo.clear_completed()?;
        self.respond(Notice::CompletedCleared { removed })
    }

    /// Accept the drag widget's output for the rows currently shown.
    pub fn reorder<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<Response> {
        let rows = self.rows()?;
        let order: Vec<i64> = ordering::reconcile(labels, &rows).iter().map(|t| t.id).collect();
        self.store_order(order)
    }

    /// Id form of [`Board::reorder`].
    pub fn reorder_ids(&mut self, ids: &[i64]) -> Result<Response> {
        let rows = self.rows()?;
        let order: Vec<i64> = ordering::reconcile_ids(ids, &rows)
            .iter()
            .map(|t| t.id)
            .collect();
        self.store_order(order)
    }

    fn store_order(&mut self, order: Vec<i64>) -> Result<Response> {
        self.repo
            .kv_set(MANUAL_ORDER_KEY, &serde_json::to_string(&order)?)?;
        info!(len = order.len(), "manual order saved");
        self.session.manual_order = Some(order.clone());
        self.respond(Notice::Reordered { order })
    }

    /// Forget the manual order and fall back to the base sort.
    pub fn reset_order(&mut self) -> Result<Response> {
        self.repo.kv_delete(MANUAL_ORDER_KEY)?;
        self.session.manual_order = None;
        self.respond(Notice::Reordered { order: Vec::new() })
    }

    // --- stars and reflections ---

    pub fn stars(&self) -> Result<i64> {
        Ok(self.repo.get_stars()?)
    }

    /// Reflection text for `date`, empty when none was written.
    pub fn reflection(&self, date: NaiveDate) -> Result<String> {
        Ok(self.repo.get_reflection(date)?.unwrap_or_default())
    }

    /// Persist exactly the text the user edited.
    pub fn save_reflection(&mut self, date: NaiveDate, text: &str) -> Result<Response> {
        self.repo.upsert_reflection(date, text)?;
        self.respond(Notice::ReflectionSaved { date })
    }
}
