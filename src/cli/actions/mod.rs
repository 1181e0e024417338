//! Actions the binary can run. Each one builds a fresh session store (the
//! cookie jar only lives for this process), optionally logs in first with the
//! global `--login-email`/`--login-password`, and prints results as JSON on
//! stdout. Diagnostics go to stderr through `tracing`.

pub mod account;
pub mod lookup;
pub mod session;

use crate::{
    cli::globals::GlobalArgs,
    session::{Credentials, NewPassword, Registration, SessionStore},
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug)]
pub enum Action {
    Login(Credentials),
    WhoAmI,
    Logout,
    Register(Registration),
    RegistrationOtp(OtpStep),
    PasswordReset(ResetStep),
    Lookup(LookupKind),
    Navigate { path: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OtpStep {
    Request { email: String },
    Validate { email: String, otp: String },
}

#[derive(Debug)]
pub enum ResetStep {
    Request { email: String },
    Validate { email: String, otp: String },
    SetNew(NewPassword),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupKind {
    Drps,
    Polos,
    Eixos,
    Cursos,
    Pis,
    Tags,
}

impl FromStr for LookupKind {
    type Err = anyhow::Error;

    fn from_str(kind: &str) -> Result<Self> {
        match kind {
            "drps" => Ok(Self::Drps),
            "polos" => Ok(Self::Polos),
            "eixos" => Ok(Self::Eixos),
            "cursos" => Ok(Self::Cursos),
            "pis" => Ok(Self::Pis),
            "tags" => Ok(Self::Tags),
            other => Err(anyhow::anyhow!("unknown lookup kind: {other}")),
        }
    }
}

/// Runs `action` against the configured backend.
///
/// # Errors
/// Returns an error if the client cannot be built, the optional pre-login
/// fails, or the action itself fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    let mut store =
        SessionStore::from_config(&globals.config).context("failed to build API client")?;

    if !matches!(action, Action::Login(_)) {
        if let Some(credentials) = globals.login_credentials() {
            store
                .login(&credentials)
                .await
                .context("login before command failed")?;
        }
    }

    match action {
        Action::Login(credentials) => session::login(&mut store, &credentials).await,
        Action::WhoAmI => session::whoami(&mut store).await,
        Action::Logout => session::logout(&mut store).await,
        Action::Navigate { path } => session::navigate(&mut store, &path).await,
        Action::Register(registration) => account::register(&mut store, &registration).await,
        Action::RegistrationOtp(step) => account::registration_otp(&mut store, step).await,
        Action::PasswordReset(step) => account::password_reset(&mut store, step).await,
        Action::Lookup(kind) => lookup::handle(&store, kind).await,
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_kind_from_str() {
        assert_eq!("drps".parse::<LookupKind>().ok(), Some(LookupKind::Drps));
        assert_eq!("tags".parse::<LookupKind>().ok(), Some(LookupKind::Tags));
        assert!("groups".parse::<LookupKind>().is_err());
    }
}
