//! Route table, navigation guard and the navigator that ties them to a
//! session store. Navigation resolves aliases, runs the guard and follows its
//! redirects until a route is allowed.
//!
//! Flow Overview: `/` becomes `/dashboard`; an anonymous visit to the
//! dashboard lands on `/login?redirect=/dashboard`; after logging in,
//! `post_login_target` sends the user back to that path. Visiting `/logout`
//! clears the session and lands on the login page.

pub mod guard;
pub mod routes;

pub use guard::{before_each, decide, needs_hydration, Decision};
pub use routes::{Location, RouteRecord};

use crate::{api::CredentialProvider, session::SessionStore};
use routes::{DASHBOARD, LOGIN, LOGOUT, REDIRECT_QUERY};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route matches {0}")]
    NotFound(String),
    #[error("too many redirects while navigating to {0}")]
    RedirectLoop(String),
}

/// Where a navigation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub route: &'static RouteRecord,
    pub location: Location,
}

/// Tracks the current location and performs guarded navigations.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    current: Option<Location>,
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    /// Navigates to `path`, following guard redirects. The session is
    /// hydrated at most once per navigation.
    ///
    /// # Errors
    /// Returns `NotFound` for unknown paths and `RedirectLoop` if redirects
    /// do not settle.
    #[instrument(skip(self, store))]
    pub async fn navigate<P: CredentialProvider>(
        &mut self,
        store: &mut SessionStore<P>,
        path: &str,
    ) -> Result<Navigation, NavigationError> {
        let mut target = Location::parse(path);
        let mut hydrated = false;

        for _ in 0..MAX_REDIRECTS {
            if let Some(aliased) = routes::alias(&target.path) {
                debug!(from = %target.path, to = aliased, "following alias");
                target.path = aliased.to_string();
                continue;
            }

            let route = routes::resolve(&target.path)
                .ok_or_else(|| NavigationError::NotFound(target.path.clone()))?;

            // Only the first guarded hop may hydrate the session.
            let decision = if hydrated {
                decide(&target, route, store.session())
            } else {
                hydrated = true;
                before_each(store, &target, self.current.as_ref(), route).await
            };

            match decision {
                Decision::Allow if route.name == LOGOUT => {
                    store.logout().await;
                    target = named(LOGIN, BTreeMap::new())?;
                }
                Decision::Allow => {
                    info!(location = %target, "navigation allowed");
                    self.current = Some(target.clone());
                    return Ok(Navigation {
                        route,
                        location: target,
                    });
                }
                Decision::Redirect { name, query } => {
                    debug!(from = %target, to = name, "guard redirect");
                    target = named(name, query)?;
                }
            }
        }

        Err(NavigationError::RedirectLoop(path.to_string()))
    }
}

fn named(name: &str, query: BTreeMap<String, String>) -> Result<Location, NavigationError> {
    Location::named(name, query).ok_or_else(|| NavigationError::NotFound(name.to_string()))
}

/// Where to go after a successful login from `login_location`: its `redirect`
/// query when that is a local absolute path, otherwise the dashboard.
#[must_use]
pub fn post_login_target(login_location: &Location) -> Location {
    login_location
        .query
        .get(REDIRECT_QUERY)
        .filter(|target| is_local_path(target))
        .map(|target| Location::parse(target))
        .or_else(|| Location::named(DASHBOARD, BTreeMap::new()))
        .unwrap_or_else(|| Location::new("/dashboard"))
}

/// Absolute path on this origin. `//host` and `/\host` are both read as
/// another host by browsers.
fn is_local_path(target: &str) -> bool {
    let mut chars = target.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !target.contains("://")
}
