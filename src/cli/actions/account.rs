use super::{print_json, OtpStep, ResetStep};
use crate::{
    api::CredentialProvider,
    session::{Registration, SessionStore},
};
use anyhow::{Context, Result};
use serde_json::json;

fn done<P: CredentialProvider>(store: &SessionStore<P>, step: &str) -> Result<()> {
    print_json(&json!({ "step": step, "status": store.status() }))
}

/// # Errors
/// Returns the backend rejection, e.g. an email already in use.
pub async fn register<P: CredentialProvider>(
    store: &mut SessionStore<P>,
    registration: &Registration,
) -> Result<()> {
    store
        .register_and_request_otp(registration)
        .await
        .context("registration failed")?;
    done(store, "register")
}

/// # Errors
/// Returns the backend rejection, e.g. an invalid or expired passcode.
pub async fn registration_otp<P: CredentialProvider>(
    store: &mut SessionStore<P>,
    step: OtpStep,
) -> Result<()> {
    match step {
        OtpStep::Request { email } => {
            store
                .request_registration_otp(&email)
                .await
                .context("registration passcode request failed")?;
            done(store, "registration-otp request")
        }
        OtpStep::Validate { email, otp } => {
            store
                .validate_registration_otp(&email, &otp)
                .await
                .context("registration passcode rejected")?;
            done(store, "registration-otp validate")
        }
    }
}

/// # Errors
/// Returns the backend rejection for the given step.
pub async fn password_reset<P: CredentialProvider>(
    store: &mut SessionStore<P>,
    step: ResetStep,
) -> Result<()> {
    match step {
        ResetStep::Request { email } => {
            store
                .request_password_reset(&email)
                .await
                .context("password reset request failed")?;
            done(store, "password-reset request")
        }
        ResetStep::Validate { email, otp } => {
            store
                .validate_password_reset_otp(&email, &otp)
                .await
                .context("password reset passcode rejected")?;
            done(store, "password-reset validate")
        }
        ResetStep::SetNew(payload) => {
            store
                .set_new_password(&payload)
                .await
                .context("setting the new password failed")?;
            done(store, "password-reset set-new")
        }
    }
}
