//! Request and response types for the auth, registration, password-reset and
//! reference-data endpoints. Payloads that carry passwords keep them in
//! `SecretString` and only expose them while serializing; they must never be
//! logged.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Basic shape check used before submitting forms.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub polo: String,
    #[serde(default)]
    pub curso: String,
    #[serde(default)]
    pub projeto_integrador: String,
    #[serde(default)]
    pub eixo: String,
    #[serde(default)]
    pub drp: String,
}

/// Identity returned by `/auth/user/`. Replaced wholesale on every fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub pk: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Account creation payload; the backend emails a passcode as a side effect.
#[derive(Debug, Serialize)]
pub struct Registration {
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password1: SecretString,
    #[serde(serialize_with = "expose")]
    pub password2: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub polo: String,
    pub curso: String,
    pub projeto_integrador: String,
    pub eixo: String,
    pub drp: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpValidation {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct NewPassword {
    pub email: String,
    pub otp: String,
    #[serde(serialize_with = "expose")]
    pub new_password: SecretString,
    #[serde(serialize_with = "expose")]
    pub new_password_confirm: SecretString,
}

impl NewPassword {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        otp: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            email: email.into(),
            otp: otp.into(),
            new_password: SecretString::from(password.clone()),
            new_password_confirm: SecretString::from(password),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiOption {
    pub id: i64,
    pub numero: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrpOption {
    pub id: i64,
    pub numero: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoloOption {
    pub id: i64,
    pub nome: String,
    pub drp: DrpOption,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EixoOption {
    pub id: i64,
    pub nome: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursoOption {
    pub id: i64,
    pub nome: String,
    pub eixo: EixoOption,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOption {
    pub id: i64,
    pub nome: String,
}

/// List endpoints answer either a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListResponse<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Paged { results: items } => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_deserializes_backend_shape() {
        let user: User = serde_json::from_value(json!({
            "pk": 7,
            "email": "a@x.com",
            "first_name": "Ana",
            "last_name": "Souza",
            "profile": {
                "polo": "Campinas",
                "curso": "Computação",
                "projeto_integrador": "PI 3",
                "eixo": "Computação",
                "drp": "DRP 12"
            }
        }))
        .unwrap();

        assert_eq!(user.pk, 7);
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.profile.drp, "DRP 12");
    }

    #[test]
    fn user_tolerates_missing_profile() {
        let user: User = serde_json::from_value(json!({"pk": 1, "email": "b@x.com"})).unwrap();
        assert_eq!(user.profile, Profile::default());
        assert!(user.first_name.is_empty());
    }

    #[test]
    fn credentials_expose_password_only_when_serialized() {
        let credentials = Credentials::new("a@x.com", "s3cret");
        let json = serde_json::to_value(&credentials).unwrap();
        assert_eq!(json, json!({"email": "a@x.com", "password": "s3cret"}));
        assert!(!format!("{credentials:?}").contains("s3cret"));
    }

    #[test]
    fn new_password_repeats_confirmation() {
        let payload = NewPassword::new("a@x.com", "123456", "n3w");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["new_password"], "n3w");
        assert_eq!(json["new_password_confirm"], "n3w");
        assert_eq!(json["otp"], "123456");
    }

    #[test]
    fn list_response_accepts_plain_and_paged() {
        let plain: ListResponse<TagOption> =
            serde_json::from_value(json!([{"id": 1, "nome": "IoT"}])).unwrap();
        assert_eq!(plain.into_vec().len(), 1);

        let paged: ListResponse<TagOption> = serde_json::from_value(json!({
            "count": 2,
            "next": null,
            "results": [{"id": 1, "nome": "IoT"}, {"id": 2, "nome": "Web"}]
        }))
        .unwrap();
        assert_eq!(paged.into_vec()[1].nome, "Web");
    }

    #[test]
    fn valid_email_shapes() {
        assert!(valid_email("a@x.com"));
        assert!(!valid_email("a@x"));
        assert!(!valid_email("a x@x.com"));
        assert!(!valid_email(""));
    }
}
