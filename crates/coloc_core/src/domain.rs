//! crates/coloc_core/src/domain.rs
//!
//! Defines the pure, core data structures for the marketplace.
//! These structs are independent of any database or HTTP framework.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Identifiers
//=========================================================================================

/// The identifier of an owner account. Opaque to everything but the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OwnerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

//=========================================================================================
// Enumerations
//=========================================================================================

/// The area of Bali a villa sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Canggu,
    Pererenan,
    Seminyak,
    Ubud,
    Other,
}

impl Zone {
    pub const ALL: [Zone; 5] = [
        Zone::Canggu,
        Zone::Pererenan,
        Zone::Seminyak,
        Zone::Ubud,
        Zone::Other,
    ];

    /// The storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Canggu => "CANGGU",
            Zone::Pererenan => "PERERENAN",
            Zone::Seminyak => "SEMINYAK",
            Zone::Ubud => "UBUD",
            Zone::Other => "OTHER",
        }
    }

    /// Case-insensitive lookup. `autre` is the legacy label for `Other`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "canggu" => Some(Zone::Canggu),
            "pererenan" => Some(Zone::Pererenan),
            "seminyak" => Some(Zone::Seminyak),
            "ubud" => Some(Zone::Ubud),
            "other" | "autre" => Some(Zone::Other),
            _ => None,
        }
    }
}

/// The lifestyle a villa advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vibe {
    Work,
    Chill,
    Mix,
    Party,
}

impl Vibe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vibe::Work => "WORK",
            Vibe::Chill => "CHILL",
            Vibe::Mix => "MIX",
            Vibe::Party => "PARTY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "work" => Some(Vibe::Work),
            "chill" => Some(Vibe::Chill),
            "mix" => Some(Vibe::Mix),
            "party" => Some(Vibe::Party),
            _ => None,
        }
    }
}

/// The relationship between the account holder and the listed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    #[default]
    Owner,
    Agency,
    Sublessor,
    Manager,
    Other,
}

impl OwnerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerType::Owner => "owner",
            OwnerType::Agency => "agency",
            OwnerType::Sublessor => "sublessor",
            OwnerType::Manager => "manager",
            OwnerType::Other => "other",
        }
    }

    /// Accepts both the English wire names and the French form labels.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "owner" | "proprietaire" => Some(OwnerType::Owner),
            "agency" | "agence" => Some(OwnerType::Agency),
            "sublessor" | "sous-locataire" => Some(OwnerType::Sublessor),
            "manager" | "gestionnaire" => Some(OwnerType::Manager),
            "other" | "autre" => Some(OwnerType::Other),
            _ => None,
        }
    }
}

/// Moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VillaStatus {
    #[default]
    Pending,
    Validated,
}

impl VillaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VillaStatus::Pending => "PENDING",
            VillaStatus::Validated => "VALIDATED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PENDING" => Some(VillaStatus::Pending),
            "VALIDATED" => Some(VillaStatus::Validated),
            _ => None,
        }
    }
}

//=========================================================================================
// Validation
//=========================================================================================

/// Largest room or slot count a listing may declare.
pub const MAX_COUNT: u32 = i32::MAX as u32;

/// Largest IDR amount a listing may declare.
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing field {0}.")]
    MissingField(&'static str),
    #[error("Available slots ({available}) exceed total capacity ({capacity}).")]
    SlotsExceedCapacity { available: u32, capacity: u32 },
    #[error("Field {0} is out of range.")]
    OutOfRange(&'static str),
}

fn check_count(field: &'static str, value: u32) -> Result<(), ValidationError> {
    if value > MAX_COUNT {
        return Err(ValidationError::OutOfRange(field));
    }
    Ok(())
}

fn check_amount(field: &'static str, value: u64) -> Result<(), ValidationError> {
    if value > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange(field));
    }
    Ok(())
}

fn check_slots(available: u32, capacity: u32) -> Result<(), ValidationError> {
    if available > capacity {
        return Err(ValidationError::SlotsExceedCapacity {
            available,
            capacity,
        });
    }
    Ok(())
}

//=========================================================================================
// Owners
//=========================================================================================

/// Represents an owner account - used throughout the app.
#[derive(Debug, Clone, Serialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    pub email: String,
    pub profile_completed: bool,
}

// Only used internally for login - contains sensitive data
#[derive(Debug, Clone)]
pub struct OwnerCredentials {
    pub id: OwnerId,
    pub email: String,
    pub password_hash: String,
}

/// Identity details an owner submits once before listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerProfile {
    pub first_name: String,
    pub last_name: String,
    pub personal_address: String,
    pub national_id_url: String,
}

//=========================================================================================
// Villas
//=========================================================================================

/// A co-living listing.
#[derive(Debug, Clone, Serialize)]
pub struct Villa {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    pub zone: Zone,
    pub owner_type: OwnerType,
    pub full_address: String,
    pub bedrooms: u32,
    pub total_capacity: u32,
    pub available_slots: u32,
    /// Monthly price for the whole villa, in IDR.
    pub total_price: u64,
    /// Monthly price per renter, in IDR.
    pub price_per_person: u64,
    pub vibe: Vibe,
    pub description: String,
    pub photos: Vec<String>,
    pub documents: Vec<String>,
    pub status: VillaStatus,
    pub created_at: DateTime<Utc>,
}

impl Villa {
    pub fn is_owned_by(&self, owner_id: OwnerId) -> bool {
        self.owner_id == owner_id
    }

    /// Appends a document URL handed over by the upload provider.
    pub fn add_document(&mut self, url: String) {
        self.documents.push(url);
    }

    /// Removes every occurrence of `url`.
    pub fn remove_document(&mut self, url: &str) {
        self.documents.retain(|doc| doc != url);
    }
}

/// Everything needed to insert a new listing. The store assigns the id,
/// the creation time and the initial `Pending` status.
#[derive(Debug, Clone)]
pub struct NewVilla {
    pub owner_id: OwnerId,
    pub name: String,
    pub zone: Zone,
    pub owner_type: OwnerType,
    pub full_address: String,
    pub bedrooms: u32,
    pub total_capacity: u32,
    pub available_slots: u32,
    pub total_price: u64,
    pub price_per_person: u64,
    pub vibe: Vibe,
    pub description: String,
    pub photos: Vec<String>,
    pub documents: Vec<String>,
}

impl NewVilla {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_count("bedrooms", self.bedrooms)?;
        check_count("total_capacity", self.total_capacity)?;
        check_count("available_slots", self.available_slots)?;
        check_amount("total_price", self.total_price)?;
        check_amount("price_per_person", self.price_per_person)?;
        check_slots(self.available_slots, self.total_capacity)
    }

    pub fn into_villa(self, id: Uuid, created_at: DateTime<Utc>) -> Villa {
        Villa {
            id,
            owner_id: self.owner_id,
            name: self.name,
            zone: self.zone,
            owner_type: self.owner_type,
            full_address: self.full_address,
            bedrooms: self.bedrooms,
            total_capacity: self.total_capacity,
            available_slots: self.available_slots,
            total_price: self.total_price,
            price_per_person: self.price_per_person,
            vibe: self.vibe,
            description: self.description,
            photos: self.photos,
            documents: self.documents,
            status: VillaStatus::Pending,
            created_at,
        }
    }
}

/// A partial update. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct VillaPatch {
    pub name: Option<String>,
    pub zone: Option<Zone>,
    pub owner_type: Option<OwnerType>,
    pub full_address: Option<String>,
    pub bedrooms: Option<u32>,
    pub total_capacity: Option<u32>,
    pub available_slots: Option<u32>,
    pub total_price: Option<u64>,
    pub price_per_person: Option<u64>,
    pub vibe: Option<Vibe>,
    pub description: Option<String>,
    pub photos: Option<Vec<String>>,
    pub documents: Option<Vec<String>>,
}

impl VillaPatch {
    /// Applies the patch in place. The villa is left untouched when a value is
    /// out of range or the result would break the slot invariant.
    pub fn apply(self, villa: &mut Villa) -> Result<(), ValidationError> {
        let capacity = self.total_capacity.unwrap_or(villa.total_capacity);
        let available = self.available_slots.unwrap_or(villa.available_slots);
        if let Some(bedrooms) = self.bedrooms {
            check_count("bedrooms", bedrooms)?;
        }
        check_count("total_capacity", capacity)?;
        check_count("available_slots", available)?;
        if let Some(total_price) = self.total_price {
            check_amount("total_price", total_price)?;
        }
        if let Some(price) = self.price_per_person {
            check_amount("price_per_person", price)?;
        }
        check_slots(available, capacity)?;

        if let Some(name) = self.name {
            villa.name = name;
        }
        if let Some(zone) = self.zone {
            villa.zone = zone;
        }
        if let Some(owner_type) = self.owner_type {
            villa.owner_type = owner_type;
        }
        if let Some(address) = self.full_address {
            villa.full_address = address;
        }
        if let Some(bedrooms) = self.bedrooms {
            villa.bedrooms = bedrooms;
        }
        villa.total_capacity = capacity;
        villa.available_slots = available;
        if let Some(total_price) = self.total_price {
            villa.total_price = total_price;
        }
        if let Some(price) = self.price_per_person {
            villa.price_per_person = price;
        }
        if let Some(vibe) = self.vibe {
            villa.vibe = vibe;
        }
        if let Some(description) = self.description {
            villa.description = description;
        }
        if let Some(photos) = self.photos {
            villa.photos = photos;
        }
        if let Some(documents) = self.documents {
            villa.documents = documents;
        }
        Ok(())
    }
}
