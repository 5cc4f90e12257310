//! crates/coloc_core/src/scoring.rs
//!
//! The compatibility heuristic used to rank villa listings for a renter.
//!
//! The score is an additive sum of fixed bonuses on top of a base value,
//! clamped to `[SCORE_FLOOR, SCORE_CEILING]`. It is a display and sort-order
//! hint only: pure, deterministic, and non-decreasing in the renter's budget.

use crate::domain::{Villa, Vibe, Zone};
use crate::renter::RenterPreferences;
use serde::Serialize;

pub const SCORE_FLOOR: u8 = 72;
pub const SCORE_CEILING: u8 = 98;

//=========================================================================================
// Score Value
//=========================================================================================

/// A percentage in `[SCORE_FLOOR, SCORE_CEILING]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CompatibilityScore(u8);

impl CompatibilityScore {
    fn clamped(raw: u64) -> Self {
        let bounded = raw.clamp(u64::from(SCORE_FLOOR), u64::from(SCORE_CEILING));
        // Bounded by SCORE_CEILING, so the narrowing cannot truncate.
        Self(bounded as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

//=========================================================================================
// Weights
//=========================================================================================

/// When a listing earns the availability bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityRule {
    /// More than one slot is still open.
    MoreThanOne,
    /// No slot has been taken yet.
    AllOpen,
}

impl AvailabilityRule {
    fn holds(self, villa: &Villa) -> bool {
        match self {
            AvailabilityRule::MoreThanOne => villa.available_slots > 1,
            AvailabilityRule::AllOpen => villa.available_slots == villa.total_capacity,
        }
    }
}

/// Named weights of the heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Starting value before any bonus.
    pub base: u32,
    /// Added when the listing's zone is one of the renter's zones.
    pub zone_bonus: u32,
    /// Counts an empty zone list as matching every zone.
    pub empty_zones_match: bool,
    /// Added when the listing's vibe equals the renter's vibe.
    pub vibe_bonus: u32,
    /// Each full unit of budget surplus (IDR) is worth one point...
    pub budget_unit: u64,
    /// ...up to this many points.
    pub budget_cap: u32,
    pub availability_bonus: u32,
    pub availability: AvailabilityRule,
}

impl ScoringWeights {
    /// Weights for the listing browse view, where the renter's filters are
    /// the criteria.
    pub const fn browse() -> Self {
        Self {
            base: 70,
            zone_bonus: 10,
            empty_zones_match: false,
            vibe_bonus: 8,
            budget_unit: 1_000_000,
            budget_cap: 10,
            availability_bonus: 8,
            availability: AvailabilityRule::MoreThanOne,
        }
    }

    /// Weights for a single listing's detail view, where the criteria come
    /// from the renter's onboarding preferences.
    pub const fn detail() -> Self {
        Self {
            base: 75,
            zone_bonus: 8,
            empty_zones_match: true,
            vibe_bonus: 0,
            budget_unit: 1_000_000,
            budget_cap: 10,
            availability_bonus: 2,
            availability: AvailabilityRule::AllOpen,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::browse()
    }
}

//=========================================================================================
// Criteria
//=========================================================================================

/// The subset of renter input the heuristic looks at. Absent fields
/// contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCriteria {
    pub zones: Vec<Zone>,
    pub vibe: Option<Vibe>,
    /// Monthly budget in IDR.
    pub budget: Option<u64>,
}

impl From<&RenterPreferences> for MatchCriteria {
    fn from(prefs: &RenterPreferences) -> Self {
        Self {
            zones: prefs.zones.clone(),
            vibe: prefs.vibe,
            budget: prefs.budget,
        }
    }
}

//=========================================================================================
// Scoring
//=========================================================================================

/// Scores one listing.
pub fn score(
    criteria: &MatchCriteria,
    villa: &Villa,
    weights: &ScoringWeights,
) -> CompatibilityScore {
    let mut total = u64::from(weights.base);

    let zone_matches = criteria.zones.contains(&villa.zone)
        || (weights.empty_zones_match && criteria.zones.is_empty());
    if zone_matches {
        total += u64::from(weights.zone_bonus);
    }

    if criteria.vibe == Some(villa.vibe) {
        total += u64::from(weights.vibe_bonus);
    }

    if let Some(budget) = criteria.budget {
        if budget >= villa.price_per_person {
            let surplus_units = (budget - villa.price_per_person)
                .checked_div(weights.budget_unit)
                .unwrap_or(0);
            total += surplus_units.min(u64::from(weights.budget_cap));
        }
    }

    if weights.availability.holds(villa) {
        total += u64::from(weights.availability_bonus);
    }

    CompatibilityScore::clamped(total)
}

/// A listing paired with its score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredVilla {
    #[serde(flatten)]
    pub villa: Villa,
    pub compatibility: CompatibilityScore,
}

/// Scores every listing and sorts best match first. Ties keep their input
/// order.
pub fn rank(
    criteria: &MatchCriteria,
    villas: impl IntoIterator<Item = Villa>,
    weights: &ScoringWeights,
) -> Vec<ScoredVilla> {
    let mut scored: Vec<ScoredVilla> = villas
        .into_iter()
        .map(|villa| {
            let compatibility = score(criteria, &villa, weights);
            ScoredVilla {
                villa,
                compatibility,
            }
        })
        .collect();
    scored.sort_by(|a, b| b.compatibility.cmp(&a.compatibility));
    scored
}
