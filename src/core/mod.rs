//! Core modules for EcoPlay

pub mod advisor;
pub mod api;
pub mod auth;
pub mod public_goods;
pub mod report;
pub mod store;
pub mod trust;

pub use api::{create_router, run_server, AppState};
pub use auth::{participant_id, AuthUser, RecordNumberVerifier, TokenVerifier};
pub use store::{DocumentStore, MemoryStore};
