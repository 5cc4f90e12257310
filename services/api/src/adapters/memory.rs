//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the `DatabaseService` port. Used by the
//! router tests and for running the API without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use coloc_core::domain::{
    NewVilla, Owner, OwnerCredentials, OwnerId, OwnerProfile, Villa, VillaStatus,
};
use coloc_core::ports::{DatabaseService, PortError, PortResult};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

struct OwnerRow {
    owner: Owner,
    password_hash: String,
    profile: Option<OwnerProfile>,
}

#[derive(Default)]
struct Tables {
    owners: HashMap<OwnerId, OwnerRow>,
    villas: HashMap<Uuid, Villa>,
}

/// Owner and villa tables held in memory.
#[derive(Default)]
pub struct InMemoryDb {
    tables: RwLock<Tables>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored profile, if the owner completed one.
    pub async fn owner_profile(&self, owner_id: OwnerId) -> Option<OwnerProfile> {
        let tables = self.tables.read().await;
        tables.owners.get(&owner_id)?.profile.clone()
    }
}

/// Newest first, as the SQL adapter orders them.
fn newest_first(mut villas: Vec<Villa>) -> Vec<Villa> {
    villas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    villas
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn create_owner(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<Owner> {
        let mut tables = self.tables.write().await;
        if tables.owners.values().any(|row| row.owner.email == email) {
            return Err(PortError::Conflict(format!(
                "Email {} already registered",
                email
            )));
        }

        let owner = Owner {
            id: OwnerId::new(),
            name: name.to_string(),
            email: email.to_string(),
            profile_completed: false,
        };
        tables.owners.insert(
            owner.id,
            OwnerRow {
                owner: owner.clone(),
                password_hash: password_hash.to_string(),
                profile: None,
            },
        );
        Ok(owner)
    }

    async fn get_owner_credentials_by_email(&self, email: &str) -> PortResult<OwnerCredentials> {
        let tables = self.tables.read().await;
        tables
            .owners
            .values()
            .find(|row| row.owner.email == email)
            .map(|row| OwnerCredentials {
                id: row.owner.id,
                email: row.owner.email.clone(),
                password_hash: row.password_hash.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("Owner {} not found", email)))
    }

    async fn get_owner(&self, owner_id: OwnerId) -> PortResult<Owner> {
        let tables = self.tables.read().await;
        tables
            .owners
            .get(&owner_id)
            .map(|row| row.owner.clone())
            .ok_or_else(|| PortError::NotFound(format!("Owner {} not found", owner_id)))
    }

    async fn update_owner_profile(
        &self,
        owner_id: OwnerId,
        profile: &OwnerProfile,
    ) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .owners
            .get_mut(&owner_id)
            .ok_or_else(|| PortError::NotFound(format!("Owner {} not found", owner_id)))?;
        row.profile = Some(profile.clone());
        row.owner.profile_completed = true;
        Ok(())
    }

    async fn list_villas_by_owner(&self, owner_id: OwnerId) -> PortResult<Vec<Villa>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .villas
                .values()
                .filter(|villa| villa.is_owned_by(owner_id))
                .cloned()
                .collect(),
        ))
    }

    async fn list_validated_villas(&self) -> PortResult<Vec<Villa>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .villas
                .values()
                .filter(|villa| villa.status == VillaStatus::Validated)
                .cloned()
                .collect(),
        ))
    }

    async fn get_villa(&self, villa_id: Uuid) -> PortResult<Villa> {
        let tables = self.tables.read().await;
        tables
            .villas
            .get(&villa_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Villa {} not found", villa_id)))
    }

    async fn create_villa(&self, villa: NewVilla) -> PortResult<Villa> {
        let mut tables = self.tables.write().await;
        if !tables.owners.contains_key(&villa.owner_id) {
            return Err(PortError::NotFound(format!(
                "Owner {} not found",
                villa.owner_id
            )));
        }
        let villa = villa.into_villa(Uuid::new_v4(), Utc::now());
        tables.villas.insert(villa.id, villa.clone());
        Ok(villa)
    }

    async fn save_villa(&self, villa: &Villa) -> PortResult<Villa> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .villas
            .get_mut(&villa.id)
            .ok_or_else(|| PortError::NotFound(format!("Villa {} not found", villa.id)))?;
        *stored = villa.clone();
        Ok(villa.clone())
    }

    async fn delete_villa(&self, villa_id: Uuid) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .villas
            .remove(&villa_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("Villa {} not found", villa_id)))
    }

    async fn set_villa_status(&self, villa_id: Uuid, status: VillaStatus) -> PortResult<()> {
        let mut tables = self.tables.write().await;
        let villa = tables
            .villas
            .get_mut(&villa_id)
            .ok_or_else(|| PortError::NotFound(format!("Villa {} not found", villa_id)))?;
        villa.status = status;
        Ok(())
    }
}
