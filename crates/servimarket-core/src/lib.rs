//! Domain layer for Servimarket.
//!
//! Holds the session models and the pure authentication transition function,
//! the collaborator traits the application layer drives (`KeyValueStore`,
//! `UserDirectory`, `Catalog`), and the marketplace reference models.

pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod navigation;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::MarketError;
