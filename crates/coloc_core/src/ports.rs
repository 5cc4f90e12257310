//! crates/coloc_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific storage implementations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    NewVilla, Owner, OwnerCredentials, OwnerId, OwnerProfile, Villa, VillaStatus,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Owner Accounts ---

    /// Fails with `Conflict` when the email is already registered.
    async fn create_owner(&self, name: &str, email: &str, password_hash: &str)
        -> PortResult<Owner>;

    async fn get_owner_credentials_by_email(&self, email: &str) -> PortResult<OwnerCredentials>;

    async fn get_owner(&self, owner_id: OwnerId) -> PortResult<Owner>;

    /// Stores the profile and marks it complete.
    async fn update_owner_profile(
        &self,
        owner_id: OwnerId,
        profile: &OwnerProfile,
    ) -> PortResult<()>;

    // --- Villa Listings ---

    /// Newest first.
    async fn list_villas_by_owner(&self, owner_id: OwnerId) -> PortResult<Vec<Villa>>;

    /// Listings that passed review, newest first.
    async fn list_validated_villas(&self) -> PortResult<Vec<Villa>>;

    async fn get_villa(&self, villa_id: Uuid) -> PortResult<Villa>;

    async fn create_villa(&self, villa: NewVilla) -> PortResult<Villa>;

    /// Overwrites the stored listing with `villa`, matched by id.
    async fn save_villa(&self, villa: &Villa) -> PortResult<Villa>;

    async fn delete_villa(&self, villa_id: Uuid) -> PortResult<()>;

    async fn set_villa_status(&self, villa_id: Uuid, status: VillaStatus) -> PortResult<()>;
}
