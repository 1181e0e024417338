use crate::api::config::{
    DEFAULT_API_BASE_URL, DEFAULT_CSRF_BASE_URL, ENV_API_BASE_URL, ENV_API_TIMEOUT,
    ENV_CSRF_BASE_URL,
};
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_CSRF_BASE_URL: &str = "csrf-base-url";
pub const ARG_TIMEOUT_MS: &str = "timeout-ms";
pub const ARG_LOGIN_EMAIL: &str = "login-email";
pub const ARG_LOGIN_PASSWORD: &str = "login-password";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long(ARG_API_BASE_URL)
                .help("Base URL of the REST API")
                .env(ENV_API_BASE_URL)
                .default_value(DEFAULT_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_CSRF_BASE_URL)
                .long(ARG_CSRF_BASE_URL)
                .help("Base URL probed to obtain the anti-forgery cookie")
                .env(ENV_CSRF_BASE_URL)
                .default_value(DEFAULT_CSRF_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_MS)
                .long(ARG_TIMEOUT_MS)
                .help("Request timeout in milliseconds")
                .env(ENV_API_TIMEOUT)
                .default_value("30000")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOGIN_EMAIL)
                .long(ARG_LOGIN_EMAIL)
                .help("Log in with this email before running the command")
                .env("GRUPI_EMAIL")
                .requires(ARG_LOGIN_PASSWORD)
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOGIN_PASSWORD)
                .long(ARG_LOGIN_PASSWORD)
                .help("Password for --login-email")
                .env("GRUPI_PASSWORD")
                .hide_env_values(true)
                .global(true),
        )
}

#[derive(Debug)]
pub struct Options {
    pub api_base_url: String,
    pub csrf_base_url: String,
    pub timeout_ms: u64,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

impl Options {
    /// # Errors
    /// Returns an error if a defaulted argument is somehow missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            api_base_url: matches
                .get_one::<String>(ARG_API_BASE_URL)
                .cloned()
                .context("missing required argument: --api-base-url")?,
            csrf_base_url: matches
                .get_one::<String>(ARG_CSRF_BASE_URL)
                .cloned()
                .context("missing required argument: --csrf-base-url")?,
            timeout_ms: matches
                .get_one::<u64>(ARG_TIMEOUT_MS)
                .copied()
                .context("missing required argument: --timeout-ms")?,
            email: matches.get_one::<String>(ARG_LOGIN_EMAIL).cloned(),
            password: matches
                .get_one::<String>(ARG_LOGIN_PASSWORD)
                .map(|password| SecretString::from(password.clone())),
        })
    }
}
