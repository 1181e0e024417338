use super::print_json;
use crate::{
    api::CredentialProvider,
    router::Navigator,
    session::{Credentials, SessionStore},
};
use anyhow::{Context, Result};
use serde_json::json;

/// # Errors
/// Returns an error if the backend rejects the credentials.
pub async fn login<P: CredentialProvider>(
    store: &mut SessionStore<P>,
    credentials: &Credentials,
) -> Result<()> {
    store.login(credentials).await.context("login failed")?;
    print_json(&json!({
        "status": store.status(),
        "authenticated": store.is_authenticated(),
        "user": store.user(),
    }))
}

/// # Errors
/// Returns an error only if the output cannot be written.
pub async fn whoami<P: CredentialProvider>(store: &mut SessionStore<P>) -> Result<()> {
    if store.user().is_none() {
        store.fetch_user().await;
    }

    match store.user() {
        Some(user) => print_json(user),
        None => {
            eprintln!("not authenticated");
            Ok(())
        }
    }
}

/// # Errors
/// Returns an error only if the output cannot be written.
pub async fn logout<P: CredentialProvider>(store: &mut SessionStore<P>) -> Result<()> {
    store.logout().await;
    print_json(&json!({ "status": store.status(), "authenticated": store.is_authenticated() }))
}

/// # Errors
/// Returns an error if the path matches no route or redirects never settle.
pub async fn navigate<P: CredentialProvider>(
    store: &mut SessionStore<P>,
    path: &str,
) -> Result<()> {
    let mut navigator = Navigator::new();
    let navigation = navigator
        .navigate(store, path)
        .await
        .with_context(|| format!("navigation to {path} failed"))?;

    print_json(&json!({
        "route": navigation.route.name,
        "location": navigation.location.full_path(),
        "authenticated": store.is_authenticated(),
    }))
}
