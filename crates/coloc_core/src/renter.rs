//! crates/coloc_core/src/renter.rs
//!
//! The renter's side of the marketplace: stated preferences and the pending
//! booking, bundled into a `RenterContext` that the web layer carries between
//! requests. Nothing here is persisted server-side.

use crate::domain::{Villa, Vibe, Zone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A renter may shortlist at most this many zones.
pub const MAX_PREFERRED_ZONES: usize = 3;

/// Flat reservation fee, in EUR.
pub const BOOKING_FEE_EUR: u64 = 25;

/// Conversion rate used to deduct the fee from the IDR rent.
pub const IDR_PER_EUR: u64 = 17_000;

/// Arrival label used when the renter has not picked a date yet.
pub const UNSCHEDULED_ARRIVAL: &str = "A definir";

//=========================================================================================
// Preferences
//=========================================================================================

/// What the renter told us during onboarding. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenterPreferences {
    #[serde(default)]
    pub zones: Vec<Zone>,
    /// Monthly budget in IDR.
    pub budget: Option<u64>,
    pub vibe: Option<Vibe>,
    #[serde(default)]
    pub lifestyle: Vec<String>,
    pub rhythm: Option<String>,
    pub arrival_date: Option<String>,
    pub duration: Option<String>,
}

/// A partial write. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub zones: Option<Vec<Zone>>,
    pub budget: Option<u64>,
    pub vibe: Option<Vibe>,
    pub lifestyle: Option<Vec<String>>,
    pub rhythm: Option<String>,
    pub arrival_date: Option<String>,
    pub duration: Option<String>,
}

impl RenterPreferences {
    /// Adds a zone to the shortlist. Returns `false` when the zone is already
    /// there or the list is full.
    pub fn add_zone(&mut self, zone: Zone) -> bool {
        if self.zones.contains(&zone) || self.zones.len() >= MAX_PREFERRED_ZONES {
            return false;
        }
        self.zones.push(zone);
        true
    }

    /// Replaces the shortlist, keeping the first occurrences in order.
    pub fn set_zones(&mut self, zones: impl IntoIterator<Item = Zone>) {
        self.zones.clear();
        for zone in zones {
            self.add_zone(zone);
        }
    }

    /// Re-applies the shortlist rules to zones that arrived from outside,
    /// such as a client-held cookie.
    pub fn normalize(&mut self) {
        let zones = std::mem::take(&mut self.zones);
        self.set_zones(zones);
    }

    /// Shallow merge: supplied fields overwrite, the rest stay.
    pub fn merge(&mut self, update: PreferencesUpdate) {
        if let Some(zones) = update.zones {
            self.set_zones(zones);
        }
        if let Some(budget) = update.budget {
            self.budget = Some(budget);
        }
        if let Some(vibe) = update.vibe {
            self.vibe = Some(vibe);
        }
        if let Some(lifestyle) = update.lifestyle {
            self.lifestyle = lifestyle;
        }
        if let Some(rhythm) = update.rhythm {
            self.rhythm = Some(rhythm);
        }
        if let Some(arrival_date) = update.arrival_date {
            self.arrival_date = Some(arrival_date);
        }
        if let Some(duration) = update.duration {
            self.duration = Some(duration);
        }
    }
}

//=========================================================================================
// Booking
//=========================================================================================

/// A reservation the renter has put down on one villa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub villa_id: Uuid,
    pub villa_name: String,
    pub price_per_person: u64,
    pub vibe: Vibe,
    pub dates: String,
    pub booking_fee_eur: u64,
    /// Rent left to pay on arrival once the fee is deducted, in IDR.
    pub due_later_idr: u64,
    pub paid: bool,
}

impl BookingDraft {
    pub fn for_villa(villa: &Villa, arrival: Option<&str>) -> Self {
        let dates = arrival
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .unwrap_or(UNSCHEDULED_ARRIVAL)
            .to_string();

        Self {
            villa_id: villa.id,
            villa_name: villa.name.clone(),
            price_per_person: villa.price_per_person,
            vibe: villa.vibe,
            dates,
            booking_fee_eur: BOOKING_FEE_EUR,
            due_later_idr: villa
                .price_per_person
                .saturating_sub(BOOKING_FEE_EUR * IDR_PER_EUR),
            paid: true,
        }
    }
}

//=========================================================================================
// Context
//=========================================================================================

/// Everything the renter carries from page to page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenterContext {
    pub renter_id: String,
    #[serde(default)]
    pub preferences: RenterPreferences,
    #[serde(default)]
    pub booking: Option<BookingDraft>,
}

impl RenterContext {
    pub fn new() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            renter_id: format!("renter_{}", &id[..9]),
            preferences: RenterPreferences::default(),
            booking: None,
        }
    }
}

impl Default for RenterContext {
    fn default() -> Self {
        Self::new()
    }
}
