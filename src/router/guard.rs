//! Pre-navigation hook. The decision itself is a pure function of the target
//! route and the session; the only effect is hydrating the session once while
//! it is still in its initial state.
//!
//! UX-only guard; real access control lives on the API.

use super::routes::{Location, RouteRecord, DASHBOARD, LOGIN, REDIRECT_QUERY};
use crate::{
    api::CredentialProvider,
    session::{Session, SessionStore, Status},
};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect {
        name: &'static str,
        query: BTreeMap<String, String>,
    },
}

/// No user loaded and nothing attempted yet.
#[must_use]
pub fn needs_hydration(session: &Session) -> bool {
    session.user().is_none() && session.status() == Status::Idle
}

#[must_use]
pub fn decide(to: &Location, route: &RouteRecord, session: &Session) -> Decision {
    if route.requires_auth && !session.is_authenticated() {
        let mut query = BTreeMap::new();
        query.insert(REDIRECT_QUERY.to_string(), to.full_path());
        return Decision::Redirect { name: LOGIN, query };
    }

    if route.name == LOGIN && session.is_authenticated() {
        return Decision::Redirect {
            name: DASHBOARD,
            query: BTreeMap::new(),
        };
    }

    Decision::Allow
}

/// Hydrates the session when needed, then decides.
pub async fn before_each<P: CredentialProvider>(
    store: &mut SessionStore<P>,
    to: &Location,
    from: Option<&Location>,
    route: &RouteRecord,
) -> Decision {
    debug!(to = %to, from = ?from.map(Location::full_path), "evaluating navigation");

    if needs_hydration(store.session()) {
        store.fetch_user().await;
        if !store.is_authenticated() {
            debug!("session hydration found no user, continuing as anonymous");
        }
    }

    decide(to, route, store.session())
}
