use clap::Subcommand;
use taskboard_core::task::parse_date;

use super::{open_board, today};

#[derive(Subcommand)]
pub enum ReflectionAction {
    /// Print the reflection for a day
    Get {
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Write the reflection for a day, replacing any earlier entry
    Set {
        /// Reflection text
        entry: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: ReflectionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = open_board()?;

    match action {
        ReflectionAction::Get { date } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };
            println!("{}", board.reflection(date)?);
        }
        ReflectionAction::Set { entry, date } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today(),
            };
            let response = board.save_reflection(date, &entry)?;
            println!("{}", response.notice.message());
        }
    }
    Ok(())
}
