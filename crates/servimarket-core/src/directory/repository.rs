//! User directory trait.

use super::model::CredentialRecord;
use crate::session::Role;

/// Read-only lookup of credential records.
///
/// Stands in for an identity backend: records are matched on exact
/// (email, role) and the secret is compared against a single accepted value.
pub trait UserDirectory: Send + Sync {
    /// Returns the first record whose email (case-sensitive) and role both match.
    fn find(&self, email: &str, role: Role) -> Option<CredentialRecord>;

    /// True when `secret` equals the directory's accepted value.
    fn accepts_secret(&self, secret: &str) -> bool;
}
