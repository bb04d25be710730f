//! Status command: the live progress display.

use chrono::Utc;
use serde_json::json;

use super::{open_service, resolve_tracker};

pub fn run(tracker: Option<String>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = open_service()?;
    let now = Utc::now();
    let id = resolve_tracker(&service, tracker)?;

    let Some(status) = service.status(&id, now)? else {
        return Err(format!("Tracker not found: {id}").into());
    };

    if json {
        let value = json!({
            "tracker": status.tracker,
            "days_clean": status.days_clean,
            "breakdown": status.breakdown,
            "unlocked_count": status.unlocked_count,
            "highest_badge": status.highest_badge,
            "next_milestone": status.next_milestone,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let b = status.breakdown;
    println!("{} — {} days clean", status.tracker.name, status.days_clean);
    println!(
        "  {}y {}m {}d {:02}:{:02}:{:02}",
        b.years, b.months, b.days, b.hours, b.minutes, b.seconds
    );
    println!(
        "  urges defeated: {}, streak high-water: {} days",
        status.tracker.urges_defeated, status.tracker.current_streak
    );
    if let Some(highest) = status.highest_badge {
        println!("  highest badge: {} ({} days)", highest.name, highest.milestone_days);
    }
    match status.next_milestone {
        Some(next) => {
            let remaining = i64::from(next.milestone_days) - status.days_clean;
            println!("  next milestone: {} in {} day(s)", next.name, remaining);
        }
        None => println!("  all milestones reached"),
    }
    Ok(())
}
