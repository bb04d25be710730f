//! Milestone badge engine: catalog, evaluation, and reconciliation.

pub mod catalog;
pub mod evaluator;
pub mod reconciler;

pub use catalog::{BadgeDefinition, Catalog, Rarity};
pub use reconciler::{DateEditOutcome, Reconciler, SyncOutcome};
