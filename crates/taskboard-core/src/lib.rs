//! # Taskboard Core Library
//!
//! This library provides the business logic for Taskboard, a personal task
//! list with priorities, time windows, star rewards and daily reflections.
//! Every operation is available through the standalone CLI binary; any
//! graphical front end is a thin layer over the same handlers.
//!
//! ## Architecture
//!
//! - **Storage**: SQLite tables for tasks, the star counter, reflections and
//!   a small kv store, behind the [`Repository`] trait; TOML configuration
//! - **Ordering**: priority/done base sort, search, visibility filter and
//!   manual reorder reconciliation
//! - **Lifecycle**: full-row saves that pay one star per completion
//! - **Projection**: calendar events, summary aggregates and search backlog
//!
//! ## Key Components
//!
//! - [`Board`]: command handlers returning a fresh [`BoardView`]
//! - [`Database`]: SQLite implementation of [`Repository`]
//! - [`Session`]: per-session UI state and profile
//! - [`Config`]: application configuration management

pub mod board;
pub mod error;
pub mod projection;
pub mod session;
pub mod storage;
pub mod task;

pub use board::{Board, BoardView, Notice, Response, SearchView};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use projection::{CalendarEvent, Summary};
pub use session::{Gender, Palette, Profile, Session, Theme};
pub use storage::{Config, Database, Repository};
pub use task::lifecycle::{SaveOutcome, TaskStatus, Transition};
pub use task::ordering::{TaskQuery, Visibility};
pub use task::{NewTask, Priority, Task, TaskEdit};
