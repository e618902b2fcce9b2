//! Done-toggle and edit-save, including the star reward.
//!
//! A task is either Pending or Done. Every save is a full-row replace, so an
//! edit and a done toggle made in the same interaction land together. A
//! Pending→Done edge earns exactly one star; nothing ever takes a star back.
//!
//! The prior state is read and compared without isolation. With more than
//! one writer the reward could be counted twice or not at all.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Task, TaskEdit};
use crate::error::Result;
use crate::storage::Repository;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl From<bool> for TaskStatus {
    fn from(done: bool) -> Self {
        if done {
            TaskStatus::Done
        } else {
            TaskStatus::Pending
        }
    }
}

/// Edge taken by a save.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Pending → Done
    Completed,
    /// Done → Pending
    Reopened,
    /// Done flag unchanged
    Unchanged,
}

impl Transition {
    pub fn between(prior: TaskStatus, next: TaskStatus) -> Self {
        match (prior, next) {
            (TaskStatus::Pending, TaskStatus::Done) => Transition::Completed,
            (TaskStatus::Done, TaskStatus::Pending) => Transition::Reopened,
            _ => Transition::Unchanged,
        }
    }

    /// Stars granted for taking this edge.
    pub fn reward(self) -> u32 {
        match self {
            Transition::Completed => 1,
            Transition::Reopened | Transition::Unchanged => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveOutcome {
    pub task_id: i64,
    pub transition: Transition,
    pub stars_awarded: u32,
}

impl SaveOutcome {
    pub fn earned_star(&self) -> bool {
        self.stars_awarded > 0
    }
}

/// Persist `edit` over `prior` and pay out the reward for the done edge.
///
/// The row is written even when nothing changed. A `prior` whose row has
/// since been deleted is written as a no-op, but the reward still follows
/// the edge the user saw.
///
/// # Errors
/// Returns a validation error (nothing written) when the edited text is
/// empty, or a database error from either write.
pub fn save_task<R: Repository + ?Sized>(repo: &R, prior: &Task, edit: TaskEdit) -> Result<SaveOutcome> {
    let edit = edit.validate().inspect_err(|e| {
        warn!(id = prior.id, error = %e, "rejected task edit");
    })?;

    let transition = Transition::between(prior.done.into(), edit.done.into());
    repo.update_task(prior.id, &edit)?;

    let stars_awarded = transition.reward();
    if stars_awarded > 0 {
        repo.add_stars(stars_awarded)?;
        info!(id = prior.id, stars_awarded, "task completed, star earned");
    }

    Ok(SaveOutcome {
        task_id: prior.id,
        transition,
        stars_awarded,
    })
}

/// Set the done flag of task `id`, keeping every other column.
///
/// Returns `None` when the task no longer exists.
pub fn toggle_done<R: Repository + ?Sized>(repo: &R, id: i64, done: bool) -> Result<Option<SaveOutcome>> {
    let Some(prior) = repo.get_task(id)? else {
        return Ok(None);
    };
    let mut edit = prior.to_edit();
    edit.done = done;
    save_task(repo, &prior, edit).map(Some)
}
