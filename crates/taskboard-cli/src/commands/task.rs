//! Task management commands for CLI.

use clap::Subcommand;
use taskboard_core::task::{parse_date, parse_time};
use taskboard_core::{Notice, Priority, Repository, Visibility};

use super::{open_board, today};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task text
        text: String,
        /// High, Medium or Low (default from config)
        #[arg(long)]
        priority: Option<Priority>,
        /// Due date, YYYY-MM-DD (default: today)
        #[arg(long)]
        due: Option<String>,
        /// Start time, HH:MM (default from config)
        #[arg(long)]
        start: Option<String>,
        /// End time, HH:MM (default from config)
        #[arg(long)]
        end: Option<String>,
    },
    /// List tasks in display order
    List {
        /// all, priority-only or non-priority-only (default from config)
        #[arg(long)]
        filter: Option<Visibility>,
        /// Keep only tasks whose text contains this
        #[arg(long)]
        search: Option<String>,
        /// Ignore the saved manual order
        #[arg(long)]
        no_order: bool,
    },
    /// Edit a task; unset flags keep their current value
    Edit {
        /// Task ID
        id: i64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        done: Option<bool>,
    },
    /// Mark a task done
    Done {
        /// Task ID
        id: i64,
    },
    /// Mark a task not done
    Undone {
        /// Task ID
        id: i64,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
    /// Delete every completed task
    ClearCompleted,
    /// Save a manual order for the listed tasks
    Reorder {
        /// Task IDs in the desired order
        #[arg(required_unless_present = "reset")]
        ids: Vec<i64>,
        /// Forget the saved order
        #[arg(long, conflicts_with = "ids")]
        reset: bool,
    },
    /// Search tasks: reorder labels plus the recent backlog
    Search {
        /// Text to look for
        text: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = open_board()?;

    match action {
        TaskAction::Add {
            text,
            priority,
            due,
            start,
            end,
        } => {
            let due_date = match due {
                Some(d) => parse_date(&d)?,
                None => today(),
            };
            let mut task = board.draft(&text, due_date);
            if let Some(p) = priority {
                task.priority = p;
            }
            if let Some(s) = start {
                task.start_time = parse_time(&s)?;
            }
            if let Some(e) = end {
                task.end_time = parse_time(&e)?;
            }
            let response = board.add_task(task)?;
            println!("{}", response.notice.message());
        }
        TaskAction::List {
            filter,
            search,
            no_order,
        } => {
            if let Some(v) = filter {
                board.set_visibility(v);
            }
            if let Some(s) = search {
                board.set_search(&s);
            }
            if no_order {
                board.use_base_order();
            }
            println!("{}", serde_json::to_string_pretty(&board.rows()?)?);
        }
        TaskAction::Edit {
            id,
            text,
            priority,
            due,
            start,
            end,
            done,
        } => {
            let Some(task) = board.repo().get_task(id)? else {
                println!("Task not found: {id}");
                return Ok(());
            };
            let mut edit = task.to_edit();
            if let Some(t) = text {
                edit.text = t;
            }
            if let Some(p) = priority {
                edit.priority = p;
            }
            if let Some(d) = due {
                edit.due_date = parse_date(&d)?;
            }
            if let Some(s) = start {
                edit.start_time = parse_time(&s)?;
            }
            if let Some(e) = end {
                edit.end_time = parse_time(&e)?;
            }
            if let Some(d) = done {
                edit.done = d;
            }
            let response = board.save_task(id, edit)?;
            println!("{}", response.notice.message());
        }
        TaskAction::Done { id } => {
            let response = board.toggle_done(id, true)?;
            println!("{}", response.notice.message());
        }
        TaskAction::Undone { id } => {
            let response = board.toggle_done(id, false)?;
            println!("{}", response.notice.message());
        }
        TaskAction::Delete { id } => {
            let response = board.delete_task(id)?;
            println!("{}", response.notice.message());
        }
        TaskAction::ClearCompleted => {
            let response = board.clear_completed()?;
            println!("{}", response.notice.message());
        }
        TaskAction::Reorder { ids, reset } => {
            if reset {
                board.reset_order()?;
                println!("Manual order cleared");
            } else {
                let response = board.reorder_ids(&ids)?;
                if let Notice::Reordered { order } = &response.notice {
                    println!("{}", serde_json::to_string(order)?);
                }
            }
        }
        TaskAction::Search { text } => {
            board.set_search(&text);
            let view = board.search_view(today())?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }
    Ok(())
}

/// Print the star counter.
pub fn stars() -> Result<(), Box<dyn std::error::Error>> {
    let board = open_board()?;
    println!("{}", board.stars()?);
    Ok(())
}
