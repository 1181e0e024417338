//! Client-side session snapshot. Authentication is derived from the presence
//! of a user, so a session can never claim to be authenticated without one
//! (or hold a user while unauthenticated).

use super::types::User;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    status: Status,
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// True while the session still holds its initial value.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn authenticate(&mut self, user: User) {
        self.user = Some(user);
    }

    pub(crate) fn clear_user(&mut self) {
        self.user = None;
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Restores the initial value (no user, `Idle`).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
pub(crate) fn test_user(email: &str) -> User {
    User {
        pk: 1,
        email: email.to_string(),
        first_name: "Ana".to_string(),
        last_name: "Souza".to_string(),
        profile: super::types::Profile::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_idle_and_anonymous() {
        let session = Session::default();
        assert!(session.is_initial());
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(session.status(), Status::Idle);
    }

    #[test]
    fn authentication_follows_user_presence() {
        let mut session = Session::default();
        session.authenticate(test_user("a@x.com"));
        assert!(session.is_authenticated());
        assert_eq!(session.user().map(|u| u.email.as_str()), Some("a@x.com"));

        session.clear_user();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn reset_restores_initial_value() {
        let mut session = Session::default();
        session.authenticate(test_user("a@x.com"));
        session.set_status(Status::Success);
        assert!(!session.is_initial());

        session.reset();
        assert!(session.is_initial());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Loading).unwrap(), "\"loading\"");
        assert_eq!(serde_json::to_string(&Status::Error).unwrap(), "\"error\"");
    }
}
