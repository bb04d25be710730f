//! Catch-up sync command (the app-launch reconciliation path).

use chrono::Utc;

use super::open_service;

pub fn run(tracker: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = open_service()?;
    let now = Utc::now();

    let granted = match tracker {
        Some(id) => service.sync(&id, now)?.unlocked,
        None => service
            .sync_all(now)?
            .into_iter()
            .flat_map(|o| o.unlocked)
            .collect(),
    };

    if granted.is_empty() {
        println!("Everything up to date");
    } else {
        for def in &granted {
            println!("Granted: {} ({} days)", def.name, def.milestone_days);
        }
        println!("{} badge(s) granted", granted.len());
    }
    Ok(())
}
