use super::{
    state::{Session, Status},
    types::{
        Credentials, CursoOption, DrpOption, EixoOption, EmailRequest, ListResponse, NewPassword,
        OtpValidation, PiOption, PoloOption, Registration, TagOption, User,
    },
};
use crate::api::{ApiClient, ApiConfig, ApiError, CookieCredentials, CredentialProvider};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

pub const LOGIN_PATH: &str = "/auth/login/";
pub const USER_PATH: &str = "/auth/user/";
pub const LOGOUT_PATH: &str = "/auth/logout/";
pub const REGISTRATION_PATH: &str = "/auth/registration/";
pub const PASSWORD_RESET_REQUEST_PATH: &str = "/password-reset/request/";
pub const PASSWORD_RESET_VALIDATE_PATH: &str = "/password-reset/validate-otp/";
pub const PASSWORD_RESET_SET_NEW_PATH: &str = "/password-reset/set-new/";
pub const REGISTRATION_OTP_REQUEST_PATH: &str = "/registration/request-otp/";
pub const REGISTRATION_OTP_VALIDATE_PATH: &str = "/registration/validate-otp/";

/// Session context: owns the API client and the session snapshot. Actions
/// take `&mut self`, so one action always finishes before the next starts.
#[derive(Debug)]
pub struct SessionStore<P = CookieCredentials> {
    api: ApiClient<P>,
    session: Session,
}

impl SessionStore<CookieCredentials> {
    /// Builds a store with a cookie-backed API client.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP clients cannot be constructed.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(ApiClient::new(config)?))
    }
}

impl<P: CredentialProvider> SessionStore<P> {
    #[must_use]
    pub fn new(api: ApiClient<P>) -> Self {
        Self {
            api,
            session: Session::default(),
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient<P> {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.session.status()
    }

    /// Submits credentials and, on success, loads the user.
    ///
    /// # Errors
    /// Returns the login failure after moving the store to `Error` and
    /// clearing the user.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), ApiError> {
        self.session.set_status(Status::Loading);

        match self
            .api
            .send(Method::POST, LOGIN_PATH, Some(credentials))
            .await
        {
            Ok(()) => {
                self.fetch_user().await;
                if !self.is_authenticated() {
                    warn!("login accepted but the user could not be loaded");
                }
                self.session.set_status(Status::Success);
                info!("login succeeded");
                Ok(())
            }
            Err(err) => {
                self.session.set_status(Status::Error);
                self.session.clear_user();
                warn!(error = %err, "login failed");
                Err(err)
            }
        }
    }

    /// Loads the current identity. Any failure leaves the store
    /// unauthenticated; nothing is returned to the caller.
    #[instrument(skip_all)]
    pub async fn fetch_user(&mut self) {
        match self.api.get::<User>(USER_PATH).await {
            Ok(user) => {
                debug!(pk = user.pk, "user loaded");
                self.session.authenticate(user);
            }
            Err(err) => {
                warn!(error = %err, "user fetch failed, treating session as anonymous");
                self.session.clear_user();
            }
        }
    }

    /// Ends the session on the backend and resets local state whatever the
    /// backend answers.
    #[instrument(skip_all)]
    pub async fn logout(&mut self) {
        let result = self.api.send::<()>(Method::POST, LOGOUT_PATH, None).await;
        if let Err(err) = result {
            warn!(error = %err, "logout request failed, clearing local session anyway");
        }
        self.session.reset();
        info!("session cleared");
    }

    /// Creates the account; the backend sends the verification passcode.
    ///
    /// # Errors
    /// Returns the backend failure; status becomes `Error`.
    #[instrument(skip_all, fields(email = %registration.email))]
    pub async fn register(&mut self, registration: &Registration) -> Result<(), ApiError> {
        self.submit(REGISTRATION_PATH, registration, "registration").await
    }

    /// Same call as [`SessionStore::register`]; named for the flow where the
    /// passcode request is the point of registering.
    ///
    /// # Errors
    /// Returns the backend failure; status becomes `Error`.
    pub async fn register_and_request_otp(
        &mut self,
        registration: &Registration,
    ) -> Result<(), ApiError> {
        self.register(registration).await
    }

    /// # Errors
    /// Returns the backend failure; status becomes `Error`.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&mut self, email: &str) -> Result<(), ApiError> {
        self.submit(
            PASSWORD_RESET_REQUEST_PATH,
            &email_request(email),
            "password reset request",
        )
        .await
    }

    /// # Errors
    /// Returns the backend failure; status becomes `Error`.
    #[instrument(skip(self, otp))]
    pub async fn validate_password_reset_otp(
        &mut self,
        email: &str,
        otp: &str,
    ) -> Result<(), ApiError> {
        self.submit(
            PASSWORD_RESET_VALIDATE_PATH,
            &otp_validation(email, otp),
            "password reset passcode",
        )
        .await
    }

    /// # Errors
    /// Returns the backend failure; status becomes `Error`.
    #[instrument(skip_all, fields(email = %payload.email))]
    pub async fn set_new_password(&mut self, payload: &NewPassword) -> Result<(), ApiError> {
        self.submit(PASSWORD_RESET_SET_NEW_PATH, payload, "new password").await
    }

    /// # Errors
    /// Returns the backend failure; status becomes `Error`.
    #[instrument(skip(self))]
    pub async fn request_registration_otp(&mut self, email: &str) -> Result<(), ApiError> {
        self.submit(
            REGISTRATION_OTP_REQUEST_PATH,
            &email_request(email),
            "registration passcode request",
        )
        .await
    }

    /// # Errors
    /// Returns the backend failure; status becomes `Error`.
    #[instrument(skip(self, otp))]
    pub async fn validate_registration_otp(
        &mut self,
        email: &str,
        otp: &str,
    ) -> Result<(), ApiError> {
        self.submit(
            REGISTRATION_OTP_VALIDATE_PATH,
            &otp_validation(email, otp),
            "registration passcode",
        )
        .await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_drps(&self) -> Result<Vec<DrpOption>, ApiError> {
        self.lookup("/drps/").await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_polos(&self) -> Result<Vec<PoloOption>, ApiError> {
        self.lookup("/polos/").await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_eixos(&self) -> Result<Vec<EixoOption>, ApiError> {
        self.lookup("/eixos/").await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_cursos(&self) -> Result<Vec<CursoOption>, ApiError> {
        self.lookup("/cursos/").await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_pis(&self) -> Result<Vec<PiOption>, ApiError> {
        self.lookup("/pis/").await
    }

    /// # Errors
    /// Returns the request failure.
    pub async fn get_tags(&self) -> Result<Vec<TagOption>, ApiError> {
        self.lookup("/tags/").await
    }

    async fn submit<B: serde::Serialize + ?Sized>(
        &mut self,
        path: &str,
        payload: &B,
        action: &str,
    ) -> Result<(), ApiError> {
        self.session.set_status(Status::Loading);
        let result = self.api.send(Method::POST, path, Some(payload)).await;
        self.settle(result, action)
    }

    fn settle(&mut self, result: Result<(), ApiError>, action: &str) -> Result<(), ApiError> {
        match result {
            Ok(()) => {
                self.session.set_status(Status::Success);
                info!("{action} accepted");
                Ok(())
            }
            Err(err) => {
                self.session.set_status(Status::Error);
                warn!(error = %err, "{action} failed");
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    async fn lookup<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let list = self.api.get::<ListResponse<T>>(path).await?;
        Ok(list.into_vec())
    }
}

fn email_request(email: &str) -> EmailRequest {
    EmailRequest {
        email: email.to_string(),
    }
}

fn otp_validation(email: &str, otp: &str) -> OtpValidation {
    OtpValidation {
        email: email.to_string(),
        otp: otp.to_string(),
    }
}
