mod common;

use anyhow::Result;
use common::{can_bind_localhost, hits};
use grupi::{
    router::{
        post_login_target,
        routes::{DASHBOARD, LOGIN, REDIRECT_QUERY},
        Navigator,
    },
    session::{Session, Status},
};

#[tokio::test]
async fn anonymous_dashboard_visit_lands_on_login() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = common::backend().await;
    let mut store = common::store(&server)?;
    let mut navigator = Navigator::new();

    let navigation = navigator.navigate(&mut store, "/dashboard?tab=groups").await?;

    assert_eq!(navigation.route.name, LOGIN);
    assert_eq!(
        navigation.location.query.get(REDIRECT_QUERY).map(String::as_str),
        Some("/dashboard?tab=groups")
    );
    assert_eq!(navigator.current(), Some(&navigation.location));
    assert_eq!(hits(&server, "/api/v1/auth/user/").await?, 1);
    assert!(!store.is_authenticated());
    Ok(())
}

#[tokio::test]
async fn root_alias_follows_dashboard_guard() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = common::backend().await;
    let mut store = common::store(&server)?;

    let navigation = Navigator::new().navigate(&mut store, "/").await?;

    assert_eq!(navigation.route.name, LOGIN);
    assert_eq!(navigation.location.full_path(), "/login?redirect=%2Fdashboard");
    Ok(())
}

#[tokio::test]
async fn login_then_return_to_requested_page() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = common::backend().await;
    let mut store = common::store(&server)?;
    let mut navigator = Navigator::new();

    let login_page = navigator.navigate(&mut store, "/dashboard").await?;
    store.login(&common::good_credentials()).await?;

    let target = post_login_target(&login_page.location);
    let navigation = navigator.navigate(&mut store, &target.full_path()).await?;
    assert_eq!(navigation.route.name, DASHBOARD);

    let bounced = navigator.navigate(&mut store, "/login").await?;
    assert_eq!(bounced.route.name, DASHBOARD);
    assert!(bounced.location.query.is_empty());
    Ok(())
}

#[tokio::test]
async fn visiting_logout_clears_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = common::backend().await;
    let mut store = common::store(&server)?;
    store.login(&common::good_credentials()).await?;
    assert_eq!(store.status(), Status::Success);

    let navigation = Navigator::new().navigate(&mut store, "/logout").await?;

    assert_eq!(navigation.route.name, LOGIN);
    assert_eq!(store.session(), &Session::default());
    assert_eq!(hits(&server, "/api/v1/auth/logout/").await?, 1);
    Ok(())
}

#[tokio::test]
async fn public_pages_do_not_require_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = common::backend().await;
    let mut store = common::store(&server)?;
    let mut navigator = Navigator::new();

    for path in ["/register", "/verify-email", "/password-reset/request", "/login"] {
        let navigation = navigator.navigate(&mut store, path).await?;
        assert_eq!(navigation.location.path, path);
    }
    Ok(())
}
