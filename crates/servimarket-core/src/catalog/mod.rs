//! Marketplace catalog domain module.
//!
//! Service categories, providers, and hired services, plus the read-only
//! lookup trait the screens query.

mod model;
mod repository;

// Re-export public API
pub use model::{
    Business, DayHours, HiredService, HiredServiceStatus, Service, ServiceCategory, WorkingHours,
};
pub use repository::Catalog;
