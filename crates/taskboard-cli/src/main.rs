use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "taskboard", version, about = "Taskboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Show the star count
    Stars,
    /// Daily reflections
    Reflection {
        #[command(subcommand)]
        action: commands::reflection::ReflectionAction,
    },
    /// Chart aggregates over the visible tasks
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Calendar events for the visible tasks
    Calendar,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TASKBOARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new("taskboard=warn"));

    let format = std::env::var("TASKBOARD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Stars => commands::task::stars(),
        Commands::Reflection { action } => commands::reflection::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Calendar => commands::stats::calendar(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions(args) => {
            commands::completions::run(args.shell, &mut Cli::command())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
