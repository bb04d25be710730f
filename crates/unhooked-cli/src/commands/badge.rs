//! Badge query commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use unhooked_core::badge::evaluator;
use unhooked_core::Store;

use super::{open_service, resolve_tracker};

#[derive(Subcommand)]
pub enum BadgeAction {
    /// List unlocked badges for a tracker
    List {
        /// Tracker ID (defaults to the active tracker)
        #[arg(long)]
        tracker: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the next milestone ahead of a tracker
    Next {
        /// Tracker ID (defaults to the active tracker)
        #[arg(long)]
        tracker: Option<String>,
    },
    /// Print the full badge catalog
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: BadgeAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = open_service()?;
    let now = Utc::now();

    match action {
        BadgeAction::List { tracker, json } => {
            let id = resolve_tracker(&service, tracker)?;
            let records = service.store().load_unlocked_badges(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No badges unlocked yet");
            } else {
                for record in &records {
                    let name = service
                        .catalog()
                        .get(&record.badge_id)
                        .map(|d| d.name.as_str())
                        .unwrap_or(record.badge_id.as_str());
                    println!(
                        "{}  unlocked {}",
                        name,
                        record.unlocked_date.format("%Y-%m-%d")
                    );
                }
                if let Some(highest) =
                    evaluator::highest_unlocked_badge(service.catalog(), &id, &records)
                {
                    println!();
                    println!("Highest: {} ({} days)", highest.name, highest.milestone_days);
                }
            }
        }
        BadgeAction::Next { tracker } => {
            let id = resolve_tracker(&service, tracker)?;
            match service.status(&id, now)? {
                Some(status) => match status.next_milestone {
                    Some(def) => {
                        let remaining = i64::from(def.milestone_days) - status.days_clean;
                        println!(
                            "Next: {} at {} days ({} to go)",
                            def.name, def.milestone_days, remaining
                        );
                    }
                    None => println!("All milestones reached"),
                },
                None => println!("Tracker not found: {id}"),
            }
        }
        BadgeAction::Catalog { json } => {
            let defs: Vec<_> = service.catalog().iter().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&defs)?);
            } else {
                for def in defs {
                    println!(
                        "{:>4} days  {}  [{}]",
                        def.milestone_days,
                        def.name,
                        serde_json::to_value(def.rarity)?
                            .as_str()
                            .unwrap_or_default()
                    );
                }
            }
        }
    }
    Ok(())
}
