//! # GruPI (session and navigation core)
//!
//! `grupi` is the client-side core of the GruPI student group manager: the
//! HTTP layer that talks to the REST backend, the session store that tracks
//! who is logged in, and the navigation guard that keeps anonymous users out
//! of protected routes.
//!
//! ## Credentials and CSRF
//!
//! The backend uses a cookie session (`sessionid`) plus a double-submit
//! anti-forgery token: it sets a `csrftoken` cookie on safe requests and
//! expects the value back in `X-CSRFToken` on `POST`/`PUT`/`PATCH`/`DELETE`.
//! The client keeps both cookies in an in-memory jar. When a state-changing
//! request finds no token, a secondary client probes safe endpoints
//! (`/csrf/`, `/api/v1/`, `/api/v1/auth/user/`) until the backend issues one.
//!
//! ## Session
//!
//! [`session::SessionStore`] is constructed explicitly and passed to whatever
//! drives navigation. A session is authenticated exactly when it holds a user.
//!
//! ## Navigation
//!
//! [`router::Navigator`] resolves paths against the route table and applies
//! [`router::guard`]: `/dashboard` needs a session, `/login` bounces
//! authenticated users to the dashboard.

pub mod api;
pub mod cli;
pub mod router;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
