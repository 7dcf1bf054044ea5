//! Static in-process user directory.

use servimarket_core::config::DEFAULT_ACCEPTED_SECRET;
use servimarket_core::directory::{CredentialRecord, UserDirectory};
use servimarket_core::session::Role;

/// An ordered, immutable list of credential records with one shared secret.
#[derive(Debug, Clone)]
pub struct StaticUserDirectory {
    records: Vec<CredentialRecord>,
    accepted_secret: String,
}

impl StaticUserDirectory {
    pub fn new(records: Vec<CredentialRecord>, accepted_secret: impl Into<String>) -> Self {
        Self {
            records,
            accepted_secret: accepted_secret.into(),
        }
    }

    /// The two demo accounts the app ships with, accepting
    /// [`DEFAULT_ACCEPTED_SECRET`].
    pub fn with_fixtures() -> Self {
        Self::new(fixture_records(), DEFAULT_ACCEPTED_SECRET)
    }

    /// Replaces the accepted secret, keeping the records.
    pub fn with_accepted_secret(mut self, secret: impl Into<String>) -> Self {
        self.accepted_secret = secret.into();
        self
    }
}

impl Default for StaticUserDirectory {
    fn default() -> Self {
        Self::with_fixtures()
    }
}

impl UserDirectory for StaticUserDirectory {
    fn find(&self, email: &str, role: Role) -> Option<CredentialRecord> {
        self.records
            .iter()
            .find(|record| record.email == email && record.role == role)
            .cloned()
    }

    fn accepts_secret(&self, secret: &str) -> bool {
        secret == self.accepted_secret
    }
}

fn fixture_records() -> Vec<CredentialRecord> {
    vec![
        CredentialRecord {
            id: "1".to_string(),
            email: "juan@example.com".to_string(),
            role: Role::Client,
            name: "Juan Pérez".to_string(),
            phone: "+34612345678".to_string(),
            rating: Some(4.5),
            reviews: Some(12),
        },
        CredentialRecord {
            id: "2".to_string(),
            email: "maria@example.com".to_string(),
            role: Role::Business,
            name: "María García".to_string(),
            phone: "+34687654321".to_string(),
            rating: Some(4.8),
            reviews: Some(45),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matches_email_and_role() {
        let directory = StaticUserDirectory::with_fixtures();
        let record = directory.find("juan@example.com", Role::Client).unwrap();
        assert_eq!(record.id, "1");
    }

    #[test]
    fn test_find_role_mismatch() {
        let directory = StaticUserDirectory::with_fixtures();
        assert!(directory.find("maria@example.com", Role::Client).is_none());
        assert!(directory.find("maria@example.com", Role::Business).is_some());
    }

    #[test]
    fn test_find_is_case_sensitive() {
        let directory = StaticUserDirectory::with_fixtures();
        assert!(directory.find("Juan@example.com", Role::Client).is_none());
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut records = fixture_records();
        let mut duplicate = records[0].clone();
        duplicate.id = "99".to_string();
        records.push(duplicate);
        let directory = StaticUserDirectory::new(records, "x");
        assert_eq!(directory.find("juan@example.com", Role::Client).unwrap().id, "1");
    }

    #[test]
    fn test_accepts_secret() {
        let directory = StaticUserDirectory::with_fixtures();
        assert!(directory.accepts_secret("123456"));
        assert!(!directory.accepts_secret("wrongpass"));
        assert!(!directory.accepts_secret(""));

        let custom = directory.with_accepted_secret("hunter2");
        assert!(custom.accepts_secret("hunter2"));
        assert!(!custom.accepts_secret("123456"));
    }
}
