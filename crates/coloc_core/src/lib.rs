pub mod domain;
pub mod ports;
pub mod renter;
pub mod scoring;

pub use domain::{
    NewVilla, Owner, OwnerCredentials, OwnerId, OwnerProfile, OwnerType, ValidationError, Vibe,
    Villa, VillaPatch, VillaStatus, Zone,
};
pub use ports::{DatabaseService, PortError, PortResult};
pub use renter::{BookingDraft, PreferencesUpdate, RenterContext, RenterPreferences};
pub use scoring::{
    rank, score, AvailabilityRule, CompatibilityScore, MatchCriteria, ScoredVilla, ScoringWeights,
};
