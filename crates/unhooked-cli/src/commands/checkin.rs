//! Check-in command: log a defeated urge, possibly celebrating a badge.

use chrono::Utc;

use super::{open_service, resolve_tracker};

pub fn run(tracker: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = open_service()?;
    let now = Utc::now();
    let id = resolve_tracker(&service, tracker)?;

    let Some(outcome) = service.check_in(&id, now)? else {
        return Err(format!("Tracker not found: {id}").into());
    };

    println!(
        "Urge defeated. Total: {}, streak high-water: {} days",
        outcome.tracker.urges_defeated, outcome.tracker.current_streak
    );
    if let Some(badge) = outcome.celebrated {
        println!();
        println!("🏅 New badge: {} ({} days)", badge.name, badge.milestone_days);
        println!("   {}", badge.share_quote);
    }
    Ok(())
}
