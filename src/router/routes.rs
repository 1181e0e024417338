use std::{collections::BTreeMap, fmt};
use url::form_urlencoded;

pub const DASHBOARD: &str = "dashboard";
pub const LOGIN: &str = "Login";
pub const REGISTER: &str = "register";
pub const VERIFY_EMAIL: &str = "verify-email";
pub const PASSWORD_RESET_REQUEST: &str = "password-reset-request";
pub const PASSWORD_RESET_OTP: &str = "password-reset-otp";
pub const SET_NEW_PASSWORD: &str = "set-new-password";
pub const LOGOUT: &str = "logout";

/// Query key carrying the originally requested path to the login page.
pub const REDIRECT_QUERY: &str = "redirect";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteRecord {
    pub name: &'static str,
    pub path: &'static str,
    pub requires_auth: bool,
}

const fn route(name: &'static str, path: &'static str, requires_auth: bool) -> RouteRecord {
    RouteRecord {
        name,
        path,
        requires_auth,
    }
}

pub const ROUTES: &[RouteRecord] = &[
    route(DASHBOARD, "/dashboard", true),
    route(LOGIN, "/login", false),
    route(REGISTER, "/register", false),
    route(VERIFY_EMAIL, "/verify-email", false),
    route(PASSWORD_RESET_REQUEST, "/password-reset/request", false),
    route(PASSWORD_RESET_OTP, "/password-reset/otp", false),
    route(SET_NEW_PASSWORD, "/password-reset/set-new", false),
    route(LOGOUT, "/logout", false),
];

/// Path aliases resolved before matching: `/` opens the dashboard.
pub const ALIASES: &[(&str, &str)] = &[("/", "/dashboard")];

/// Matches a path (trailing slash tolerated) against the table.
#[must_use]
pub fn resolve(path: &str) -> Option<&'static RouteRecord> {
    let path = normalize_path(path);
    ROUTES.iter().find(|route| route.path == path)
}

#[must_use]
pub fn by_name(name: &str) -> Option<&'static RouteRecord> {
    ROUTES.iter().find(|route| route.name == name)
}

/// Alias target for `path`, if any.
#[must_use]
pub fn alias(path: &str) -> Option<&'static str> {
    let path = normalize_path(path);
    ALIASES
        .iter()
        .find_map(|(from, to)| (*from == path).then_some(*to))
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// A navigation target: path plus query parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl Location {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: BTreeMap::new(),
        }
    }

    /// Parses `/path?key=value`; a missing leading slash is added.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Self {
            path,
            query: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Location of a named route.
    #[must_use]
    pub fn named(name: &str, query: BTreeMap<String, String>) -> Option<Self> {
        by_name(name).map(|route| Self {
            path: route.path.to_string(),
            query,
        })
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Path with the encoded query string appended.
    #[must_use]
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{query}", self.path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dashboard_requires_auth() {
        let protected: Vec<_> = ROUTES
            .iter()
            .filter(|route| route.requires_auth)
            .map(|route| route.name)
            .collect();
        assert_eq!(protected, vec![DASHBOARD]);
    }

    #[test]
    fn resolve_matches_paths_and_trailing_slash() {
        assert_eq!(resolve("/login").map(|r| r.name), Some(LOGIN));
        assert_eq!(resolve("/password-reset/otp/").map(|r| r.name), Some(PASSWORD_RESET_OTP));
        assert!(resolve("/nope").is_none());
        assert!(resolve("/").is_none());
    }

    #[test]
    fn root_aliases_dashboard() {
        assert_eq!(alias("/"), Some("/dashboard"));
        assert_eq!(alias(""), Some("/dashboard"));
        assert_eq!(alias("/login"), None);
    }

    #[test]
    fn location_parse_and_full_path() {
        let location = Location::parse("/login?redirect=%2Fdashboard");
        assert_eq!(location.path, "/login");
        assert_eq!(location.query.get(REDIRECT_QUERY).map(String::as_str), Some("/dashboard"));
        assert_eq!(location.full_path(), "/login?redirect=%2Fdashboard");

        assert_eq!(Location::parse("register").full_path(), "/register");
    }

    #[test]
    fn named_locations_use_table_paths() {
        let location = Location::named(LOGIN, BTreeMap::new()).unwrap();
        assert_eq!(location.path, "/login");
        assert!(Location::named("missing", BTreeMap::new()).is_none());
    }
}
