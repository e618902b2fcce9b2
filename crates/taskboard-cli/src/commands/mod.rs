pub mod completions;
pub mod config;
pub mod reflection;
pub mod stats;
pub mod task;

use chrono::NaiveDate;
use taskboard_core::{Board, Config, CoreError, Database};

/// Board over the on-disk database with the user's configuration.
pub fn open_board() -> Result<Board<Database>, CoreError> {
    let config = Config::load()?;
    let db = Database::open()?;
    Board::new(db, config)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
