//! Authentication state machine.
//!
//! The store's observable state is [`AuthState`]. It only ever changes by
//! folding an [`AuthEvent`] through [`apply`], which is pure and never fails.

use super::model::{Session, SessionPatch};
use serde::{Deserialize, Serialize};

/// State-machine position of the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// Persisted session is being read at startup.
    Initializing,
    Unauthenticated,
    Authenticated,
    /// A login attempt is in flight.
    LoadingTransition,
}

/// Observable state of the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub session: Option<Session>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub phase: AuthPhase,
}

impl AuthState {
    /// State of a freshly constructed store, before bootstrap completes.
    pub fn initial() -> Self {
        Self {
            session: None,
            is_authenticated: false,
            is_loading: true,
            phase: AuthPhase::Initializing,
        }
    }

    fn authenticated(session: Session) -> Self {
        Self {
            session: Some(session),
            is_authenticated: true,
            is_loading: false,
            phase: AuthPhase::Authenticated,
        }
    }

    fn unauthenticated() -> Self {
        Self {
            session: None,
            is_authenticated: false,
            is_loading: false,
            phase: AuthPhase::Unauthenticated,
        }
    }

    /// `is_authenticated` agrees with the presence of a session.
    pub fn is_consistent(&self) -> bool {
        self.is_authenticated == self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Transitions of the session store.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// Store constructed; persisted session read begins.
    Bootstrap,
    /// A well-formed persisted session was found.
    BootstrapFound(Session),
    /// Nothing usable was persisted (missing, unreadable, or malformed).
    BootstrapEmpty,
    LoginAttempt,
    /// Credentials matched and the session was persisted.
    LoginSuccess(Session),
    /// Credentials did not match, or the session could not be persisted.
    LoginFailure,
    Logout,
    UpdateSession(SessionPatch),
}

impl AuthEvent {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::Bootstrap => "bootstrap",
            AuthEvent::BootstrapFound(_) => "bootstrap_found",
            AuthEvent::BootstrapEmpty => "bootstrap_empty",
            AuthEvent::LoginAttempt => "login_attempt",
            AuthEvent::LoginSuccess(_) => "login_success",
            AuthEvent::LoginFailure => "login_failure",
            AuthEvent::Logout => "logout",
            AuthEvent::UpdateSession(_) => "update_session",
        }
    }
}

/// Folds one event into the state.
///
/// `LoginAttempt` keeps the current session while raising `is_loading`, so
/// `is_authenticated == session.is_some()` holds in every returned state.
/// `UpdateSession` without an active session returns the state unchanged.
pub fn apply(state: AuthState, event: AuthEvent) -> AuthState {
    match event {
        AuthEvent::Bootstrap => AuthState::initial(),
        AuthEvent::BootstrapFound(session) | AuthEvent::LoginSuccess(session) => {
            AuthState::authenticated(session)
        }
        AuthEvent::BootstrapEmpty | AuthEvent::LoginFailure | AuthEvent::Logout => {
            AuthState::unauthenticated()
        }
        AuthEvent::LoginAttempt => AuthState {
            is_loading: true,
            phase: AuthPhase::LoadingTransition,
            ..state
        },
        AuthEvent::UpdateSession(patch) => {
            match state.session.as_ref().map(|current| current.merged(&patch)) {
                Some(merged) => AuthState::authenticated(merged),
                None => state,
            }
        }
    }
}
