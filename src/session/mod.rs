//! Session state and the store that coordinates it with the backend. The store
//! is an explicitly constructed context handed to the navigator and any outer
//! surface; there is no global session.
//!
//! Flow Overview: `login` posts credentials and then loads the user;
//! `fetch_user` is a silent probe that degrades to anonymous on failure;
//! `logout` always ends in the initial state. Registration, passcode and
//! password-reset actions only track `status` and hand failures back.
//! Passwords travel in `SecretString` and must never be logged.

mod state;
mod store;
pub mod types;

pub use state::{Session, Status};
pub use store::SessionStore;
pub use store::{
    LOGIN_PATH, LOGOUT_PATH, PASSWORD_RESET_REQUEST_PATH, PASSWORD_RESET_SET_NEW_PATH,
    PASSWORD_RESET_VALIDATE_PATH, REGISTRATION_OTP_REQUEST_PATH, REGISTRATION_OTP_VALIDATE_PATH,
    REGISTRATION_PATH, USER_PATH,
};
pub use types::{valid_email, Credentials, NewPassword, Profile, Registration, User};

#[cfg(test)]
pub(crate) use state::test_user;
