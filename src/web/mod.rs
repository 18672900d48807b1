//! Web server module
//!
//! JSON HTTP API: search, model listing, focus mode catalog, discover feed,
//! health and stats.

mod error;
mod focus_modes;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
