//! Built-in milestone badge catalog.
//!
//! Badge definitions are fixed at build time: never created, mutated,
//! or destroyed at runtime. Adding a new tier in a future release needs
//! no migration; catch-up sync grants it retroactively to anyone whose
//! elapsed time already qualifies.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Collectibility tier, display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// A single milestone badge definition.
///
/// Only `id` and `milestone_days` participate in evaluation logic; the
/// rest is display metadata for badge grids and share cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    /// Stable string key, unique across the catalog.
    pub id: String,

    /// Full elapsed days required to qualify. Zero is the valid
    /// "day-0 starter" threshold.
    pub milestone_days: u32,

    pub name: String,
    pub description: String,
    pub image_asset: String,
    pub rarity: Rarity,
    pub share_quote: String,
}

/// Ordered badge catalog.
///
/// Insertion order is meaningful: descending milestone queries break
/// ties toward later entries, ascending ones toward earlier entries.
#[derive(Debug, Clone)]
pub struct Catalog {
    defs: Vec<BadgeDefinition>,
}

impl Catalog {
    /// Build a catalog from explicit definitions, rejecting duplicate ids.
    pub fn new(defs: Vec<BadgeDefinition>) -> Result<Self, ValidationError> {
        for (i, def) in defs.iter().enumerate() {
            if defs[..i].iter().any(|d| d.id == def.id) {
                return Err(ValidationError::DuplicateBadgeId(def.id.clone()));
            }
        }
        Ok(Self { defs })
    }

    /// The built-in milestone set shipped with the app.
    pub fn builtin() -> Self {
        // Ids are distinct by construction; skip the duplicate scan.
        Self {
            defs: builtin_defs(),
        }
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.defs.iter().find(|d| d.id == id)
    }

    /// Iterate definitions in catalog insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BadgeDefinition> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

// ============================================================================
// BUILT-IN MILESTONES
// ============================================================================

fn badge(
    id: &str,
    milestone_days: u32,
    name: &str,
    rarity: Rarity,
    description: &str,
    share_quote: &str,
) -> BadgeDefinition {
    BadgeDefinition {
        id: id.to_string(),
        milestone_days,
        name: name.to_string(),
        description: description.trim().to_string(),
        image_asset: format!("badge_{id}"),
        rarity,
        share_quote: share_quote.to_string(),
    }
}

fn builtin_defs() -> Vec<BadgeDefinition> {
    vec![
        badge(
            "day0",
            0,
            "First Step",
            Rarity::Common,
            indoc::indoc! {"
                Deciding to quit is the hardest part, and you already did it.
                This badge marks the moment you started counting.
            "},
            "Day zero. The count starts now.",
        ),
        badge(
            "day1",
            1,
            "24 Hours",
            Rarity::Common,
            indoc::indoc! {"
                One full day behind you. The first day carries the strongest
                cravings, and you made it through anyway.
            "},
            "One day down. Every streak starts here.",
        ),
        badge(
            "day3",
            3,
            "Three Days",
            Rarity::Common,
            indoc::indoc! {"
                Three days is when the body starts to notice the change.
                Keep going; it only gets easier from here.
            "},
            "72 hours clean and counting.",
        ),
        badge(
            "day7",
            7,
            "One Week",
            Rarity::Uncommon,
            indoc::indoc! {"
                A full week. You have now been through every day of the week
                without giving in once.
            "},
            "One week free. Seven small victories.",
        ),
        badge(
            "day14",
            14,
            "Two Weeks",
            Rarity::Uncommon,
            indoc::indoc! {"
                Fourteen days of showing up for yourself. New routines are
                starting to replace the old ones.
            "},
            "Two weeks strong.",
        ),
        badge(
            "day30",
            30,
            "One Month",
            Rarity::Rare,
            indoc::indoc! {"
                A whole month. At this point the streak is no longer an
                experiment; it is a habit of its own.
            "},
            "30 days. This is who I am now.",
        ),
        badge(
            "day60",
            60,
            "Two Months",
            Rarity::Rare,
            indoc::indoc! {"
                Two months clean. The days you don't even think about it are
                starting to outnumber the days you do.
            "},
            "Two months and not looking back.",
        ),
        badge(
            "day90",
            90,
            "Quarter",
            Rarity::Epic,
            indoc::indoc! {"
                Ninety days is the classic recovery milestone: a full quarter
                of a year, long enough to feel like a different life.
            "},
            "90 days. A quarter of a year, reclaimed.",
        ),
        badge(
            "day180",
            180,
            "Half Year",
            Rarity::Epic,
            indoc::indoc! {"
                Six months. Half a year of mornings you woke up free of it.
            "},
            "Six months clean.",
        ),
        badge(
            "day365",
            365,
            "One Year",
            Rarity::Legendary,
            indoc::indoc! {"
                A full trip around the sun without it. Every season, every
                holiday, every hard day: you handled them all clean.
            "},
            "One year. 365 days, one at a time.",
        ),
        badge(
            "day730",
            730,
            "Two Years",
            Rarity::Legendary,
            indoc::indoc! {"
                Two years. The old habit is a story you tell now, not a thing
                you fight.
            "},
            "Two years free.",
        ),
    ]
}
