//! # Unhooked Core Library
//!
//! This library provides the core business logic for Unhooked, a
//! habit/sobriety tracker. It implements a CLI-first philosophy where
//! all operations are available via a standalone CLI binary, with any
//! GUI shell being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Progress**: pure calendar arithmetic from a tracker's start date
//!   (whole clean days, "2 months, 3 days" breakdowns), clock injected
//!   by the caller
//! - **Badge engine**: a static milestone catalog, pure unlock-status
//!   evaluation, and an idempotent reconciler that is the only writer
//!   of unlocked-badge state
//! - **Storage**: SQLite-based tracker/badge persistence and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`TrackerService`]: the operation surface UIs call
//! - [`Reconciler`]: catch-up sync, progressive unlock, date-edit
//!   reconciliation
//! - [`Catalog`]: the built-in milestone badge set
//! - [`Database`]: tracker and badge persistence

pub mod badge;
pub mod config;
pub mod error;
pub mod events;
pub mod progress;
pub mod service;
pub mod store;
pub mod tracker;

pub use badge::{BadgeDefinition, Catalog, DateEditOutcome, Rarity, Reconciler, SyncOutcome};
pub use config::Config;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use progress::TimeBreakdown;
pub use service::{CheckInOutcome, StatusSnapshot, TrackerService};
pub use store::{Database, Store};
pub use tracker::{Tracker, UnlockedBadge};
