//! Integration tests for session restoration, persistence and token handling

mod common;

use admin_navigator::*;
use common::Shell;
use std::sync::atomic::Ordering;
use std::time::Duration;

// ---- restoration ----

#[tokio::test]
async fn test_concurrent_navigations_share_one_restore() {
    let shell = Shell::new();
    shell.login("admin").await;
    assert_eq!(shell.transport.user_info_calls(), 1);

    let reloaded = shell.reload();
    reloaded
        .transport
        .delay_user_info(Duration::from_millis(20));

    let (first, second) = tokio::join!(
        reloaded.navigator.navigate("/system/user"),
        reloaded.navigator.navigate("/system/role"),
    );

    assert_eq!(reloaded.transport.user_info_calls(), 2);
    assert_eq!(reloaded.transport.menu_calls.load(Ordering::SeqCst), 2);
    // the first navigation was overtaken while it waited
    assert!(first.is_blocked(), "{first:?}");
    assert_eq!(
        second,
        NavigationResult::Allowed {
            path: "/system/role".to_string(),
            route: Some("SystemRole".to_string()),
        }
    );
}

#[tokio::test]
async fn test_logout_during_restore_discards_result() {
    let shell = Shell::new();
    shell.login("admin").await;

    let reloaded = shell.reload();
    reloaded
        .transport
        .delay_user_info(Duration::from_millis(50));

    let (result, ()) = tokio::join!(reloaded.navigator.navigate("/system/user"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        reloaded.navigator.logout().await;
    });

    assert!(result.is_redirect_login(), "{result:?}");
    assert_eq!(reloaded.sink.count("restore_discarded"), 1);

    let session = reloaded.sessions().current().await;
    assert!(!session.is_authenticated());
    assert!(!session.routes_installed);
    assert!(session.routes.is_empty());
    assert!(reloaded
        .store
        .get(StorageScope::Durable, session::SESSION_KEY)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_restore_timeout_tears_down_session() {
    let config = ShellConfig {
        restore_timeout_ms: 20,
        ..ShellConfig::default()
    };
    let shell = Shell::with_config(config);
    shell.login("user").await;

    let reloaded = shell.reload();
    reloaded
        .transport
        .delay_user_info(Duration::from_millis(200));

    let result = reloaded.navigator.navigate("/user").await;

    assert_eq!(
        result,
        NavigationResult::RedirectLogin {
            to: "/login?redirect=%2Fuser".to_string(),
            return_path: "/user".to_string(),
        }
    );
    assert_eq!(reloaded.sink.count("session_restore_failed"), 1);
    assert!(!reloaded.sessions().is_authenticated().await);
    assert!(reloaded
        .store
        .get(StorageScope::Durable, session::SESSION_KEY)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_failed_restore_clears_session() {
    let shell = Shell::new();
    shell.login("editor").await;

    let reloaded = shell.reload();
    reloaded.transport.fail_user_info(true);

    let err = reloaded.sessions().ensure_routes().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SessionRestoreFailed);
    assert!(!reloaded.sessions().is_authenticated().await);

    // a later attempt finds nothing to restore
    let err = reloaded.sessions().ensure_routes().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
    assert_eq!(reloaded.transport.user_info_calls(), 2);
}

#[tokio::test]
async fn test_ready_session_makes_no_calls() {
    let shell = Shell::new();
    shell.login("admin").await;

    shell.sessions().ensure_routes().await.unwrap();
    shell.navigator.navigate("/data").await;

    assert_eq!(shell.transport.user_info_calls(), 1);
    assert_eq!(shell.transport.menu_calls.load(Ordering::SeqCst), 1);
}

// ---- persistence ----

#[tokio::test]
async fn test_session_and_views_survive_reload() {
    let shell = Shell::new();
    shell.login("admin").await;
    shell.navigator.navigate("/").await;
    shell.navigator.navigate("/system/user").await;
    shell.navigator.views().pin("/system/user");

    let reloaded = shell.reload();

    let session = reloaded.sessions().current().await;
    assert!(session.is_authenticated());
    assert!(!session.routes_installed);
    assert_eq!(session.roles, vec!["admin"]);
    assert_eq!(
        session.identity.as_ref().map(|u| u.username.as_str()),
        Some("admin")
    );

    let views = reloaded.navigator.visited_views();
    let paths: Vec<_> = views.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, vec!["/system/user", "/welcome"]);
    assert!(views[0].pinned);

    assert!(reloaded.navigator.navigate("/system/role").await.is_allowed());
    assert!(reloaded.sessions().current().await.routes_installed);
}

#[tokio::test]
async fn test_views_do_not_outlive_browser_session() {
    let shell = Shell::new();
    shell.login("admin").await;
    shell.navigator.navigate("/data").await;

    shell.store.clear_scope(StorageScope::Session);
    let reloaded = shell.reload();

    assert!(reloaded.navigator.visited_views().is_empty());
    assert!(reloaded.sessions().is_authenticated().await);
}

#[tokio::test]
async fn test_corrupt_snapshot_is_ignored() {
    let shell = Shell::new();
    shell
        .store
        .set(
            StorageScope::Durable,
            session::SESSION_KEY,
            "{not json".to_string(),
        )
        .unwrap();

    let reloaded = shell.reload();
    assert!(!reloaded.sessions().is_authenticated().await);
    assert!(reloaded.navigator.navigate("/data").await.is_redirect_login());
}

// ---- login, logout, tokens ----

#[tokio::test]
async fn test_login_replaces_previous_session() {
    let shell = Shell::new();
    shell.login("admin").await;
    assert!(shell.sessions().has_role(&["admin"]).await);

    shell.login("user").await;
    assert!(!shell.sessions().has_role(&["admin"]).await);
    assert!(shell.sessions().has_permission(&["system:user:list"]).await);
    assert!(!shell.sessions().has_permission(&["system:menu:list"]).await);

    let menu: Vec<_> = shell
        .sessions()
        .menu()
        .await
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(menu, vec!["/", "/user"]);
}

#[tokio::test]
async fn test_logout_during_login_wins() {
    let shell = Shell::new();
    shell.transport.delay_login(Duration::from_millis(50));

    let (result, ()) = tokio::join!(shell.sessions().login("admin", "admin"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        shell.sessions().logout().await;
    });

    assert_eq!(
        result.unwrap_err().kind(),
        ErrorKind::AuthenticationRequired
    );
    assert_eq!(shell.sink.count("restore_discarded"), 1);
    assert_eq!(shell.transport.user_info_calls(), 0);

    let session = shell.sessions().current().await;
    assert!(!session.is_authenticated());
    assert!(!session.routes_installed);
    assert!(shell
        .store
        .get(StorageScope::Durable, session::SESSION_KEY)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_failed_login_leaves_no_session() {
    let shell = Shell::new();
    shell.login("admin").await;

    let err = shell.sessions().login("admin", "nope").await.unwrap_err();

    assert!(matches!(err, ShellError::LoginFailed(ref e) if e.status == Some(400)));
    assert!(!shell.sessions().is_authenticated().await);
    assert!(shell
        .store
        .get(StorageScope::Durable, session::SESSION_KEY)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_admin_installs_full_tree() {
    let shell = Shell::new();
    shell.login("admin").await;

    let routes = shell.sessions().routes().await;
    let top: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(top, vec!["/", "/dashboard", "/system", "/data", "/user"]);

    let system = MergedRoute::find(&routes, "/system").unwrap();
    assert_eq!(system.children.len(), 4);
    // catalog requirements survive the merge
    assert_eq!(system.children[0].meta.roles, vec!["admin"]);
    assert_eq!(system.children[0].meta.auths, vec!["system:user:list"]);
}

#[tokio::test]
async fn test_refresh_token_rotates_or_ends_session() {
    let shell = Shell::new();
    shell.login("editor").await;

    shell.sessions().refresh_token().await.unwrap();
    assert!(shell.sessions().is_authenticated().await);
    assert_eq!(shell.transport.refresh_calls.load(Ordering::SeqCst), 1);

    shell.transport.fail_refresh(true);
    let err = shell.sessions().refresh_token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!shell.sessions().is_authenticated().await);

    let err = shell.sessions().refresh_token().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
}

#[tokio::test]
async fn test_expired_token_during_restore_ends_at_login() {
    let shell = Shell::new();
    shell
        .store
        .set(
            StorageScope::Durable,
            session::SESSION_KEY,
            r#"{"token":"token-ghost","authenticated":true}"#.to_string(),
        )
        .unwrap();

    let reloaded = shell.reload();
    assert!(reloaded.sessions().is_authenticated().await);

    let result = reloaded.navigator.navigate("/user").await;
    assert!(result.is_redirect_login());
    assert!(!reloaded.sessions().is_authenticated().await);
}
