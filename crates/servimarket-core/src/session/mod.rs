//! Session domain module.
//!
//! This module contains the authenticated identity model and the
//! authentication state machine.
//!
//! # Module Structure
//!
//! - `model`: Identity types (`Session`, `Role`, `SessionPatch`)
//! - `state`: Observable store state and transitions (`AuthState`, `AuthEvent`, `apply`)
//!
//! # Usage
//!
//! ```ignore
//! use servimarket_core::session::{apply, AuthEvent, AuthState, Role, Session};
//! ```

mod model;
mod state;

// Re-export public API
pub use model::{Role, Session, SessionPatch};
pub use state::{apply, AuthEvent, AuthPhase, AuthState};
