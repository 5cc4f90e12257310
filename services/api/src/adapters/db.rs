//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coloc_core::domain::{
    NewVilla, Owner, OwnerCredentials, OwnerId, OwnerProfile, OwnerType, Vibe, Villa,
    VillaStatus, Zone,
};
use coloc_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

const VILLA_COLUMNS: &str = "id, owner_id, name, zone, owner_type, full_address, bedrooms, \
    total_capacity, available_slots, total_price, price_per_person, vibe, description, \
    photos, documents, status, created_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found_or_unexpected(what: String) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        other => unexpected(other),
    }
}

/// Postgres has no unsigned integers; negative values never pass the table
/// checks, so clamping is only a guard against manual edits.
fn to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Domain validation keeps counts and amounts within the signed column
/// ranges; anything larger is refused rather than stored as another number.
fn to_i64(value: u64) -> PortResult<i64> {
    i64::try_from(value)
        .map_err(|_| PortError::Unexpected(format!("Amount {} does not fit BIGINT", value)))
}

fn to_i32(value: u32) -> PortResult<i32> {
    i32::try_from(value)
        .map_err(|_| PortError::Unexpected(format!("Count {} does not fit INTEGER", value)))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct OwnerRecord {
    id: Uuid,
    name: String,
    email: String,
    profile_completed: bool,
}
impl OwnerRecord {
    fn to_domain(self) -> Owner {
        Owner {
            id: OwnerId(self.id),
            name: self.name,
            email: self.email,
            profile_completed: self.profile_completed,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> OwnerCredentials {
        OwnerCredentials {
            id: OwnerId(self.id),
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct VillaRecord {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    zone: String,
    owner_type: String,
    full_address: String,
    bedrooms: i32,
    total_capacity: i32,
    available_slots: i32,
    total_price: i64,
    price_per_person: i64,
    vibe: String,
    description: String,
    photos: Vec<String>,
    documents: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
}
impl VillaRecord {
    fn to_domain(self) -> Villa {
        let zone = Zone::parse(&self.zone).unwrap_or_else(|| {
            warn!(villa_id = %self.id, zone = %self.zone, "Unknown stored zone");
            Zone::Other
        });
        Villa {
            id: self.id,
            owner_id: OwnerId(self.owner_id),
            name: self.name,
            zone,
            owner_type: OwnerType::parse(&self.owner_type).unwrap_or_default(),
            full_address: self.full_address,
            bedrooms: to_u32(self.bedrooms),
            total_capacity: to_u32(self.total_capacity),
            available_slots: to_u32(self.available_slots),
            total_price: to_u64(self.total_price),
            price_per_person: to_u64(self.price_per_person),
            vibe: Vibe::parse(&self.vibe).unwrap_or(Vibe::Mix),
            description: self.description,
            photos: self.photos,
            documents: self.documents,
            status: VillaStatus::parse(&self.status).unwrap_or_default(),
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_owner(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<Owner> {
        let record = sqlx::query_as::<_, OwnerRecord>(
            "INSERT INTO owners (id, name, email, password_hash) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, email, profile_completed",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict(format!("Email {} already registered", email))
            }
            other => unexpected(other),
        })?;
        Ok(record.to_domain())
    }

    async fn get_owner_credentials_by_email(&self, email: &str) -> PortResult<OwnerCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password_hash FROM owners WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(format!("Owner {} not found", email)))?;
        Ok(record.to_domain())
    }

    async fn get_owner(&self, owner_id: OwnerId) -> PortResult<Owner> {
        let record = sqlx::query_as::<_, OwnerRecord>(
            "SELECT id, name, email, profile_completed FROM owners WHERE id = $1",
        )
        .bind(owner_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(format!("Owner {} not found", owner_id)))?;
        Ok(record.to_domain())
    }

    async fn update_owner_profile(
        &self,
        owner_id: OwnerId,
        profile: &OwnerProfile,
    ) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE owners SET first_name = $1, last_name = $2, personal_address = $3, \
             national_id_url = $4, profile_completed = TRUE WHERE id = $5",
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.personal_address)
        .bind(&profile.national_id_url)
        .bind(owner_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Owner {} not found", owner_id)));
        }
        Ok(())
    }

    async fn list_villas_by_owner(&self, owner_id: OwnerId) -> PortResult<Vec<Villa>> {
        let records = sqlx::query_as::<_, VillaRecord>(&format!(
            "SELECT {} FROM villas WHERE owner_id = $1 ORDER BY created_at DESC",
            VILLA_COLUMNS
        ))
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_validated_villas(&self) -> PortResult<Vec<Villa>> {
        let records = sqlx::query_as::<_, VillaRecord>(&format!(
            "SELECT {} FROM villas WHERE status = $1 ORDER BY created_at DESC",
            VILLA_COLUMNS
        ))
        .bind(VillaStatus::Validated.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_villa(&self, villa_id: Uuid) -> PortResult<Villa> {
        let record = sqlx::query_as::<_, VillaRecord>(&format!(
            "SELECT {} FROM villas WHERE id = $1",
            VILLA_COLUMNS
        ))
        .bind(villa_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(format!("Villa {} not found", villa_id)))?;
        Ok(record.to_domain())
    }

    async fn create_villa(&self, villa: NewVilla) -> PortResult<Villa> {
        let record = sqlx::query_as::<_, VillaRecord>(&format!(
            "INSERT INTO villas (id, owner_id, name, zone, owner_type, full_address, bedrooms, \
             total_capacity, available_slots, total_price, price_per_person, vibe, description, \
             photos, documents, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {}",
            VILLA_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(villa.owner_id.as_uuid())
        .bind(&villa.name)
        .bind(villa.zone.as_str())
        .bind(villa.owner_type.as_str())
        .bind(&villa.full_address)
        .bind(to_i32(villa.bedrooms)?)
        .bind(to_i32(villa.total_capacity)?)
        .bind(to_i32(villa.available_slots)?)
        .bind(to_i64(villa.total_price)?)
        .bind(to_i64(villa.price_per_person)?)
        .bind(villa.vibe.as_str())
        .bind(&villa.description)
        .bind(&villa.photos)
        .bind(&villa.documents)
        .bind(VillaStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn save_villa(&self, villa: &Villa) -> PortResult<Villa> {
        let record = sqlx::query_as::<_, VillaRecord>(&format!(
            "UPDATE villas SET name = $2, zone = $3, owner_type = $4, full_address = $5, \
             bedrooms = $6, total_capacity = $7, available_slots = $8, total_price = $9, \
             price_per_person = $10, vibe = $11, description = $12, photos = $13, \
             documents = $14, status = $15 \
             WHERE id = $1 RETURNING {}",
            VILLA_COLUMNS
        ))
        .bind(villa.id)
        .bind(&villa.name)
        .bind(villa.zone.as_str())
        .bind(villa.owner_type.as_str())
        .bind(&villa.full_address)
        .bind(to_i32(villa.bedrooms)?)
        .bind(to_i32(villa.total_capacity)?)
        .bind(to_i32(villa.available_slots)?)
        .bind(to_i64(villa.total_price)?)
        .bind(to_i64(villa.price_per_person)?)
        .bind(villa.vibe.as_str())
        .bind(&villa.description)
        .bind(&villa.photos)
        .bind(&villa.documents)
        .bind(villa.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_or_unexpected(format!("Villa {} not found", villa.id)))?;
        Ok(record.to_domain())
    }

    async fn delete_villa(&self, villa_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM villas WHERE id = $1")
            .bind(villa_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Villa {} not found", villa_id)));
        }
        Ok(())
    }

    async fn set_villa_status(&self, villa_id: Uuid, status: VillaStatus) -> PortResult<()> {
        let result = sqlx::query("UPDATE villas SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(villa_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Villa {} not found", villa_id)));
        }
        Ok(())
    }
}
