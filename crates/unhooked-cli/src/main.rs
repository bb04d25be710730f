use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "unhooked-cli", version, about = "Unhooked CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tracker management
    Tracker {
        #[command(subcommand)]
        action: commands::tracker::TrackerAction,
    },
    /// Record a defeated urge (may celebrate a new badge)
    Checkin {
        /// Tracker ID (defaults to the active tracker)
        #[arg(long)]
        tracker: Option<String>,
    },
    /// Badge queries
    Badge {
        #[command(subcommand)]
        action: commands::badge::BadgeAction,
    },
    /// Current progress for a tracker
    Status {
        /// Tracker ID (defaults to the active tracker)
        #[arg(long)]
        tracker: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Catch-up badge sync (launch/foreground path)
    Sync {
        /// Tracker ID; omit to sync every tracker
        #[arg(long)]
        tracker: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Tracker { action } => commands::tracker::run(action),
        Commands::Checkin { tracker } => commands::checkin::run(tracker),
        Commands::Badge { action } => commands::badge::run(action),
        Commands::Status { tracker, json } => commands::status::run(tracker, json),
        Commands::Sync { tracker } => commands::sync::run(tracker),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
