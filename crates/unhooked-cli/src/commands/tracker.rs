//! Tracker management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use unhooked_core::Store;

use super::{open_service, parse_date, resolve_tracker};

#[derive(Subcommand)]
pub enum TrackerAction {
    /// Create a new tracker
    Add {
        /// Tracker label ("Nicotine", "Alcohol", ...)
        name: String,
        /// "Sober since" date (RFC3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        start_date: Option<String>,
        /// Make this the active tracker
        #[arg(long)]
        activate: bool,
    },
    /// List trackers
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Make a tracker the active one
    Activate {
        /// Tracker ID
        id: String,
    },
    /// Retroactively change a tracker's start date
    SetDate {
        /// New start date (RFC3339 or YYYY-MM-DD)
        date: String,
        /// Tracker ID (defaults to the active tracker)
        #[arg(long)]
        tracker: Option<String>,
    },
    /// Start over today (resets the start date to now)
    Reset {
        /// Tracker ID (defaults to the active tracker)
        #[arg(long)]
        tracker: Option<String>,
    },
    /// Delete a tracker and all its badges
    Delete {
        /// Tracker ID
        id: String,
    },
}

pub fn run(action: TrackerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = open_service()?;
    let now = Utc::now();

    match action {
        TrackerAction::Add {
            name,
            start_date,
            activate,
        } => {
            let start = match start_date {
                Some(raw) => parse_date(&raw)?,
                None => now,
            };
            let (tracker, sync) = service.create_tracker(name, start, now)?;
            if activate && !tracker.is_active {
                service.switch_active(&tracker.id)?;
            }
            println!("Tracker created: {}", tracker.id);
            if !sync.unlocked.is_empty() {
                let names: Vec<&str> = sync.unlocked.iter().map(|d| d.name.as_str()).collect();
                println!("Badges already earned: {}", names.join(", "));
            }
        }
        TrackerAction::List { json } => {
            let trackers = service.store().load_trackers()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&trackers)?);
            } else {
                for t in trackers {
                    let marker = if t.is_active { "*" } else { " " };
                    println!(
                        "{marker} {}  {}  {} days clean",
                        t.id,
                        t.name,
                        t.days_clean(now)
                    );
                }
            }
        }
        TrackerAction::Activate { id } => {
            if service.switch_active(&id)? {
                println!("Active tracker: {id}");
            } else {
                println!("Tracker not found: {id}");
            }
        }
        TrackerAction::SetDate { date, tracker } => {
            let id = resolve_tracker(&service, tracker)?;
            let new_start = parse_date(&date)?;
            let outcome = service.edit_start_date(&id, new_start, now)?;
            for def in &outcome.locked {
                println!("Locked: {} ({} days)", def.name, def.milestone_days);
            }
            for def in &outcome.unlocked {
                println!("Unlocked: {} ({} days)", def.name, def.milestone_days);
            }
            println!("Start date set to {new_start}");
        }
        TrackerAction::Reset { tracker } => {
            let id = resolve_tracker(&service, tracker)?;
            let outcome = service.reset(&id, now)?;
            println!(
                "Tracker reset; {} badge(s) locked",
                outcome.locked.len()
            );
        }
        TrackerAction::Delete { id } => {
            let events = service.delete_tracker(&id, now)?;
            if events.is_empty() {
                println!("Tracker not found: {id}");
            } else {
                println!("Tracker deleted: {id}");
            }
        }
    }
    Ok(())
}
