//! Navigation targets and the admin route guard

use crate::auth::models::Role;
use crate::auth::session::SessionStore;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Places the client can send the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard/dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Side effect of moving the user somewhere else
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only remembers where it was sent
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<Route> {
        self.visits.lock().clone()
    }

    pub fn count(&self, route: Route) -> usize {
        self.visits.lock().iter().filter(|r| **r == route).count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.visits.lock().push(route);
    }
}

/// Admits only authenticated administrators
#[derive(Clone)]
pub struct RouteGuard {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl RouteGuard {
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Evaluated fresh on every call; denial redirects to login
    pub fn can_activate(&self) -> bool {
        let allowed = self.session.is_authenticated()
            && self.session.evaluator().has_role(Role::Admin.as_str());
        if !allowed {
            tracing::info!("Navigation denied, redirecting to {}", Route::Login);
            self.navigator.navigate(Route::Login);
        }
        allowed
    }

    pub fn require(&self) -> Result<()> {
        if self.can_activate() {
            Ok(())
        } else {
            Err(Error::AccessDenied)
        }
    }
}
