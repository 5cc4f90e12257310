pub mod admin;
pub mod auth;
pub mod listings;
pub mod middleware;
pub mod owner;
pub mod renter;
pub mod rest;
pub mod session;
pub mod state;

// Re-export the router builder and auth pieces for the server binary.
pub use middleware::{require_admin, require_owner};
pub use rest::{api_router, ApiDoc};
pub use session::SessionAuthenticator;
