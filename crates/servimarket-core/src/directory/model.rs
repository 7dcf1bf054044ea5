//! Credential record model.

use crate::session::{Role, Session};
use serde::{Deserialize, Serialize};

/// A directory entry a login attempt is matched against.
///
/// Records carry no per-user secret; the directory accepts one shared value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub id: String,
    pub email: String,
    #[serde(rename = "userType")]
    pub role: Role,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
}

impl CredentialRecord {
    /// Builds the session a successful login against this record produces.
    pub fn to_session(&self) -> Session {
        Session {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            avatar: None,
            role: self.role,
            rating: self.rating,
            reviews: self.reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_session_copies_profile() {
        let record = CredentialRecord {
            id: "2".to_string(),
            email: "maria@example.com".to_string(),
            role: Role::Business,
            name: "María García".to_string(),
            phone: "+34687654321".to_string(),
            rating: Some(4.8),
            reviews: Some(45),
        };
        let session = record.to_session();
        assert_eq!(session.id, "2");
        assert_eq!(session.role, Role::Business);
        assert_eq!(session.reviews, Some(45));
        assert!(session.avatar.is_none());
    }
}
