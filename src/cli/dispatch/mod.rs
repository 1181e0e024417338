use crate::{
    api::ApiConfig,
    cli::{
        actions::{Action, LookupKind, OtpStep, ResetStep},
        commands::{self, api},
        globals::GlobalArgs,
    },
    session::{valid_email, Credentials, NewPassword, Registration},
};
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn email(matches: &ArgMatches) -> Result<String> {
    let email = required(matches, "email")?;
    if !valid_email(&email) {
        bail!("invalid email address: {email}");
    }
    Ok(email)
}

fn registration(matches: &ArgMatches) -> Result<Registration> {
    let password = required(matches, "password")?;
    Ok(Registration {
        email: email(matches)?,
        password1: SecretString::from(password.clone()),
        password2: SecretString::from(password),
        first_name: required(matches, "first-name")?,
        last_name: required(matches, "last-name")?,
        polo: required(matches, "polo")?,
        curso: required(matches, "curso")?,
        projeto_integrador: required(matches, "projeto-integrador")?,
        eixo: required(matches, "eixo")?,
        drp: required(matches, "drp")?,
    })
}

fn registration_otp(matches: &ArgMatches) -> Result<OtpStep> {
    match matches.subcommand() {
        Some((commands::CMD_REQUEST, sub)) => Ok(OtpStep::Request { email: email(sub)? }),
        Some((commands::CMD_VALIDATE, sub)) => Ok(OtpStep::Validate {
            email: email(sub)?,
            otp: required(sub, "otp")?,
        }),
        _ => bail!("unknown registration-otp step"),
    }
}

fn password_reset(matches: &ArgMatches) -> Result<ResetStep> {
    match matches.subcommand() {
        Some((commands::CMD_REQUEST, sub)) => Ok(ResetStep::Request { email: email(sub)? }),
        Some((commands::CMD_VALIDATE, sub)) => Ok(ResetStep::Validate {
            email: email(sub)?,
            otp: required(sub, "otp")?,
        }),
        Some((commands::CMD_SET_NEW, sub)) => Ok(ResetStep::SetNew(NewPassword::new(
            email(sub)?,
            required(sub, "otp")?,
            required(sub, "new-password")?,
        ))),
        _ => bail!("unknown password-reset step"),
    }
}

/// Builds the API configuration and maps the parsed subcommand to an action.
///
/// # Errors
/// Returns an error for invalid URLs, timeouts or email addresses.
pub fn handler(matches: &ArgMatches) -> Result<(Action, GlobalArgs)> {
    let options = api::Options::parse(matches)?;

    let config = ApiConfig::new(
        &options.api_base_url,
        &options.csrf_base_url,
        options.timeout_ms,
    )
    .context("invalid API configuration")?;

    let mut globals = GlobalArgs::new(config);
    if let (Some(email), Some(password)) = (options.email, options.password) {
        if !valid_email(&email) {
            bail!("invalid email address: {email}");
        }
        globals.set_login(email, password);
    }

    let action = match matches.subcommand() {
        Some((commands::CMD_LOGIN, sub)) => Action::Login(Credentials::new(
            email(sub)?,
            required(sub, "password")?,
        )),
        Some((commands::CMD_WHOAMI, _)) => Action::WhoAmI,
        Some((commands::CMD_LOGOUT, _)) => Action::Logout,
        Some((commands::CMD_REGISTER, sub)) => Action::Register(registration(sub)?),
        Some((commands::CMD_REGISTRATION_OTP, sub)) => {
            Action::RegistrationOtp(registration_otp(sub)?)
        }
        Some((commands::CMD_PASSWORD_RESET, sub)) => Action::PasswordReset(password_reset(sub)?),
        Some((commands::CMD_LOOKUP, sub)) => {
            Action::Lookup(required(sub, "kind")?.parse::<LookupKind>()?)
        }
        Some((commands::CMD_NAVIGATE, sub)) => Action::Navigate {
            path: required(sub, "path")?,
        },
        _ => bail!("no subcommand given"),
    };

    Ok((action, globals))
}
