use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "selfcare-cli", version, about = "SelfCare CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit tracking
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Mood logging and analysis
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Recommendation catalog and feedback
    Rec {
        #[command(subcommand)]
        action: commands::rec::RecAction,
    },
    /// Activity history and notification personalization
    Personal {
        #[command(subcommand)]
        action: commands::personal::PersonalAction,
    },
    /// Habit completion reports
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },
    /// Profile, experience and achievements
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr so stdout stays parseable JSON.
    let filter = EnvFilter::try_from_env("SELFCARE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Rec { action } => commands::rec::run(action),
        Commands::Personal { action } => commands::personal::run(action),
        Commands::Report { action } => commands::report::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
