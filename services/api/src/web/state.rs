//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::{Config, ConfigError};
use crate::web::session::SessionAuthenticator;
use coloc_core::ports::DatabaseService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub sessions: SessionAuthenticator,
}

impl AppState {
    /// Fails when the session signing secret is not configured.
    pub fn new(db: Arc<dyn DatabaseService>, config: Arc<Config>) -> Result<Self, ConfigError> {
        let sessions = SessionAuthenticator::from_config(&config)?;
        Ok(Self {
            db,
            config,
            sessions,
        })
    }
}
