//! User directory domain module.
//!
//! Credential records and the lookup contract used to validate login attempts.

mod model;
mod repository;

// Re-export public API
pub use model::CredentialRecord;
pub use repository::UserDirectory;
