use clap::Subcommand;
use taskboard_core::projection::{completion_pie, count_by_due_date, count_by_priority};

use super::open_board;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Completed vs not completed
    Pie,
    /// Task count per due date
    ByDate,
    /// Task count per priority
    ByPriority,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let board = open_board()?;
    let rows = board.rows()?;

    match action {
        StatsAction::Pie => {
            println!("{}", serde_json::to_string_pretty(&completion_pie(&rows))?);
        }
        StatsAction::ByDate => {
            println!("{}", serde_json::to_string_pretty(&count_by_due_date(&rows))?);
        }
        StatsAction::ByPriority => {
            println!("{}", serde_json::to_string_pretty(&count_by_priority(&rows))?);
        }
    }
    Ok(())
}

pub fn calendar() -> Result<(), Box<dyn std::error::Error>> {
    let board = open_board()?;
    let view = board.view()?;
    println!("{}", serde_json::to_string_pretty(&view.calendar)?);
    Ok(())
}
