//! Session application services.

mod store;
mod writer;

pub use store::{SessionStore, SessionStoreBuilder};
