//! Login error channel.

use servimarket_core::MarketError;
use thiserror::Error;

/// Why a login attempt did not produce a session.
///
/// The boolean [`crate::SessionStore::login`] collapses both variants to
/// `false`; [`crate::SessionStore::login_detailed`] keeps them apart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoginError {
    /// No record matched (email, role), or the secret was not accepted.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Credentials matched but the session could not be persisted.
    #[error("session could not be persisted: {0}")]
    Storage(#[from] MarketError),
}

impl LoginError {
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }
}
