//! Role-based route guard.
//!
//! `RouteGuard::evaluate` is a pure function of the requested route and the
//! current session; it is run on every navigation and never cached.
//! `Navigator` follows the redirects it produces and tracks the view epoch
//! used to discard stale fetches.

use tracing::debug;

use crate::auth::Session;
use crate::models::Role;
use crate::routes::Route;
use crate::views::ViewEpoch;

/// Upper bound on redirects followed for one navigation
const MAX_REDIRECTS: usize = 4;

/// Chrome around a role-scoped view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub role: Role,
    pub nav: &'static [Route],
    pub display_name: String,
}

/// What to render for an authorized navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub route: Route,
    pub title: &'static str,
    /// `None` for public views
    pub layout: Option<Layout>,
}

impl ViewDescriptor {
    fn public(route: Route) -> Self {
        Self {
            route,
            title: route.title(),
            layout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// No session: go to login
    Unauthenticated,
    /// Signed in with another role: go to that role's home
    WrongRole { home: Route },
    Authorized(ViewDescriptor),
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn evaluate(route: Route, session: Option<&Session>) -> GuardDecision {
        let Some(required) = route.required_role() else {
            return GuardDecision::Authorized(ViewDescriptor::public(route));
        };
        match session {
            None => GuardDecision::Unauthenticated,
            Some(s) if s.role != required => GuardDecision::WrongRole {
                home: s.role.home_route(),
            },
            Some(s) => GuardDecision::Authorized(ViewDescriptor {
                route,
                title: route.title(),
                layout: Some(Layout {
                    role: s.role,
                    nav: s.role.nav_menu(),
                    display_name: s.display_name.clone(),
                }),
            }),
        }
    }
}

/// Current view plus the epoch that invalidates in-flight fetches.
#[derive(Debug)]
pub struct Navigator {
    current: ViewDescriptor,
    epoch: ViewEpoch,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            current: ViewDescriptor::public(Route::Login),
            epoch: ViewEpoch::default(),
        }
    }

    pub fn current(&self) -> &ViewDescriptor {
        &self.current
    }

    pub fn route(&self) -> Route {
        self.current.route
    }

    pub fn epoch(&self) -> &ViewEpoch {
        &self.epoch
    }

    /// Resolve `route` through the guard, following redirects.
    pub fn resolve(route: Route, session: Option<&Session>) -> ViewDescriptor {
        let mut target = route;
        for _ in 0..MAX_REDIRECTS {
            match RouteGuard::evaluate(target, session) {
                GuardDecision::Authorized(view) => return view,
                GuardDecision::Unauthenticated => {
                    debug!(from = %target, "Not signed in, redirecting to login");
                    target = Route::Login;
                }
                GuardDecision::WrongRole { home } => {
                    debug!(from = %target, to = %home, "Wrong role, redirecting");
                    target = home;
                }
            }
        }
        ViewDescriptor::public(Route::Login)
    }

    /// Navigate to `route`. Always advances the epoch, so results of fetches
    /// started for the previous view are dropped.
    pub fn go(&mut self, route: Route, session: Option<&Session>) -> &ViewDescriptor {
        self.current = Self::resolve(route, session);
        self.epoch.advance();
        &self.current
    }

    /// Navigate by path, as typed into the go-to prompt.
    pub fn go_path(&mut self, path: &str, session: Option<&Session>) -> &ViewDescriptor {
        self.go(Route::from_path(path), session)
    }
}
