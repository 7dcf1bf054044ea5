//! Application layer for Servimarket.
//!
//! This crate provides the session store, which drives the domain transition
//! function against the persistence and directory collaborators, plus the
//! wiring that assembles those collaborators from configuration.

pub mod context;
pub mod error;
pub mod profile;
pub mod session;

pub use context::AppContext;
pub use error::LoginError;
pub use profile::ProfileSummary;
pub use session::{SessionStore, SessionStoreBuilder};
