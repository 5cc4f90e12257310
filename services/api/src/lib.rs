//! services/api/src/lib.rs
//!
//! The HTTP service for the co-living marketplace: owner sessions, owner
//! villa management, public listing browse and the renter context.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
