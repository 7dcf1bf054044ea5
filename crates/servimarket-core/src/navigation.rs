//! Screen graph selection.
//!
//! The app shows one of three route stacks depending on the session store's
//! state. Views ask [`Route::for_state`] which one to mount.

use crate::session::AuthState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Login,
    Home,
    Services,
    Profile,
    BusinessProfile,
    ServiceHired,
    Delivery,
    Help,
    ServiceClosure,
    ServiceFeedback,
}

impl Screen {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Screen::Login)
    }

    /// Screens reachable from the bottom tab bar.
    pub fn is_tab(&self) -> bool {
        matches!(self, Screen::Home | Screen::Services | Screen::Profile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Bootstrap or login still in flight.
    Loading,
    Login,
    /// Tab navigator plus the detail stack.
    Main,
}

impl Route {
    pub fn for_state(state: &AuthState) -> Self {
        if state.is_loading {
            Route::Loading
        } else if state.is_authenticated {
            Route::Main
        } else {
            Route::Login
        }
    }

    /// Screens mounted under this route, tabs first.
    pub fn screens(&self) -> &'static [Screen] {
        match self {
            Route::Loading => &[],
            Route::Login => &[Screen::Login],
            Route::Main => &[
                Screen::Home,
                Screen::Services,
                Screen::Profile,
                Screen::BusinessProfile,
                Screen::ServiceHired,
                Screen::Delivery,
                Screen::Help,
                Screen::ServiceClosure,
                Screen::ServiceFeedback,
            ],
        }
    }

    pub fn allows(&self, screen: Screen) -> bool {
        self.screens().contains(&screen)
    }
}
