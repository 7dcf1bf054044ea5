//! Session domain model.
//!
//! A `Session` is the identity of the signed-in user. It is stored as a single
//! JSON record under [`crate::storage::SESSION_KEY`].

use crate::error::{MarketError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account kind of a marketplace user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Hires services.
    Client,
    /// Provides services.
    Business,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Business => "business",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "client" => Ok(Role::Client),
            "business" => Ok(Role::Business),
            other => Err(MarketError::not_found("role", other)),
        }
    }
}

/// The authenticated user's identity.
///
/// Field names follow the persisted record layout (`userType` for the role),
/// so a record written by any earlier build of the app still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique user identifier. Never empty.
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(rename = "userType")]
    pub role: Role,
    /// Average rating (0.0 - 5.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Number of reviews behind `rating`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
}

impl Session {
    /// Parses a persisted session record.
    ///
    /// Records that are not valid JSON, miss required fields, or carry an
    /// empty identifier are rejected as malformed.
    pub fn from_json(raw: &str) -> Result<Self> {
        let session: Session = serde_json::from_str(raw)?;
        if session.id.trim().is_empty() {
            return Err(MarketError::json("session record has an empty id"));
        }
        Ok(session)
    }

    /// Serializes the session into its persisted record form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns a copy of this session with `patch` merged in.
    ///
    /// Fields left as `None` in the patch keep their current value. An empty
    /// `id` in the patch is ignored so the identifier can never be blanked.
    pub fn merged(&self, patch: &SessionPatch) -> Session {
        let mut next = self.clone();
        if let Some(id) = patch.id.as_ref().filter(|id| !id.trim().is_empty()) {
            next.id = id.clone();
        }
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(email) = &patch.email {
            next.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            next.phone = phone.clone();
        }
        if let Some(avatar) = &patch.avatar {
            next.avatar = Some(avatar.clone());
        }
        if let Some(role) = patch.role {
            next.role = role;
        }
        if let Some(rating) = patch.rating {
            next.rating = Some(rating);
        }
        if let Some(reviews) = patch.reviews {
            next.reviews = Some(reviews);
        }
        next
    }
}

/// Partial session update: only the fields set to `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, rename = "userType", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
}

impl SessionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// True when the patch would not change any field.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
