use clap::Args;
use clap_complete::{generate, Shell};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to stdout.
pub fn run(shell: Shell, command: &mut clap::Command) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout();
    generate(shell, command, "taskboard", &mut out);
    Ok(())
}
