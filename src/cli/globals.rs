use crate::api::ApiConfig;
use crate::session::Credentials;
use secrecy::{ExposeSecret, SecretString};

/// Settings shared by every subcommand.
#[derive(Clone, Debug)]
pub struct GlobalArgs {
    pub config: ApiConfig,
    pub login_email: Option<String>,
    pub login_password: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            login_email: None,
            login_password: SecretString::default(),
        }
    }

    pub fn set_login(&mut self, email: String, password: SecretString) {
        self.login_email = Some(email);
        self.login_password = password;
    }

    /// Credentials to log in with before running the command, if configured.
    #[must_use]
    pub fn login_credentials(&self) -> Option<Credentials> {
        self.login_email
            .as_ref()
            .map(|email| Credentials::new(email.clone(), self.login_password.expose_secret()))
    }
}
