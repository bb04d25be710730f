//! Configuration management commands for CLI.

use clap::Subcommand;
use unhooked_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Dotted key, e.g. notifications.enabled
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "notifications.enabled" => config.notifications.enabled = value.parse()?,
                "notifications.milestone_alerts" => {
                    config.notifications.milestone_alerts = value.parse()?
                }
                "notifications.daily_reminder" => {
                    config.notifications.daily_reminder =
                        if value.is_empty() { None } else { Some(value) };
                }
                "display.show_seconds" => config.display.show_seconds = value.parse()?,
                "display.calendar_breakdown" => {
                    config.display.calendar_breakdown = value.parse()?
                }
                other => return Err(format!("unknown configuration key: {other}").into()),
            }
            config.save()?;
            println!("Configuration updated: {key}");
        }
    }
    Ok(())
}
