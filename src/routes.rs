//! Screen routing and navigation guards.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every CLI command stands for one screen of the catalog app. Before a
//! command runs, its route guard is consulted; a denied guard performs exactly
//! one redirect through the `Navigator` and the command does not run.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::sync::{Mutex, PoisonError};

/// Sign-in entry point.
pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";
/// Default landing route for an authenticated user.
pub const HOME_ROUTE: &str = "/cars";
pub const PROFILE_ROUTE: &str = "/profile";

/// Something that can move the user to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Read-only view of whether a user is signed in.
pub trait AuthView: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Signed-in users only; others go to `/login`.
    Authenticated,
    /// Signed-out users only; others go to `/cars`.
    GuestOnly,
}

impl Guard {
    pub fn check(self, auth: &dyn AuthView, navigator: &dyn Navigator) -> Access {
        match self {
            Self::Authenticated => require_auth(auth, navigator),
            Self::GuestOnly => require_guest(auth, navigator),
        }
    }
}

pub fn require_auth(auth: &dyn AuthView, navigator: &dyn Navigator) -> Access {
    if auth.is_authenticated() {
        return Access::Allow;
    }
    navigator.navigate(LOGIN_ROUTE);
    Access::Deny
}

pub fn require_guest(auth: &dyn AuthView, navigator: &dyn Navigator) -> Access {
    if !auth.is_authenticated() {
        return Access::Allow;
    }
    navigator.navigate(HOME_ROUTE);
    Access::Deny
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    CarList,
    CarNew,
    CarEdit { id: String },
    Profile,
}

impl Screen {
    #[must_use]
    pub fn guard(&self) -> Guard {
        match self {
            Self::Login | Self::Register => Guard::GuestOnly,
            Self::CarList | Self::CarNew | Self::CarEdit { .. } | Self::Profile => Guard::Authenticated,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => LOGIN_ROUTE.to_owned(),
            Self::Register => REGISTER_ROUTE.to_owned(),
            Self::CarList => HOME_ROUTE.to_owned(),
            Self::CarNew => "/cars/new".to_owned(),
            Self::CarEdit { id } => format!("/cars/edit/{id}"),
            Self::Profile => PROFILE_ROUTE.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Screen(Screen),
    Redirect(&'static str),
}

/// Match a path against the route table. The empty path and unknown paths
/// redirect to the car list.
#[must_use]
pub fn resolve(path: &str) -> Resolution {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["login"] => Resolution::Screen(Screen::Login),
        ["register"] => Resolution::Screen(Screen::Register),
        ["cars"] => Resolution::Screen(Screen::CarList),
        ["cars", "new"] => Resolution::Screen(Screen::CarNew),
        ["cars", "edit", id] => Resolution::Screen(Screen::CarEdit { id: (*id).to_owned() }),
        ["profile"] => Resolution::Screen(Screen::Profile),
        _ => Resolution::Redirect(HOME_ROUTE),
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Navigator that records where the user is and where they have been.
#[derive(Default)]
pub struct Router {
    history: Mutex<Vec<String>>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last navigated path, if any.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Resolve `path`, run its guard and, when allowed, move there.
    /// Denials leave the user at the guard's redirect target.
    pub fn navigate_guarded(&self, path: &str, auth: &dyn AuthView) -> Access {
        let screen = match resolve(path) {
            Resolution::Screen(screen) => screen,
            Resolution::Redirect(target) => match resolve(target) {
                Resolution::Screen(screen) => screen,
                Resolution::Redirect(_) => Screen::CarList,
            },
        };
        let access = screen.guard().check(auth, self);
        if access.is_allowed() {
            self.navigate(&screen.path());
        }
        access
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(path.to_owned());
    }
}
