//! Integration tests for merge, filter and rank over the shared fixtures

mod common;

use admin_navigator::*;
use common::{catalog, menus_for, mock_user, Shell};

fn generate(username: &str) -> (Vec<MergedRoute>, Vec<MergedRoute>) {
    let user = mock_user(username).unwrap();
    let merged = sort_by_rank(merge(&catalog(), &menus_for(&user.roles)));
    let routes = filter_routes(&merged, &user.roles, &user.permissions);
    (merged, routes)
}

fn paths(routes: &[MergedRoute]) -> Vec<&str> {
    MergedRoute::flatten(routes)
        .into_iter()
        .map(|r| r.path.as_str())
        .collect()
}

#[test]
fn test_merge_is_idempotent_over_fixture() {
    let catalog = catalog();
    let menus = menus_for(&["admin".to_string()]);
    assert_eq!(merge(&catalog, &menus), merge(&catalog, &menus));
}

#[test]
fn test_every_path_once() {
    let (merged, _) = generate("admin");
    let all = paths(&merged);
    let unique: std::collections::HashSet<_> = all.iter().collect();
    assert_eq!(all.len(), unique.len());
}

#[test]
fn test_user_tree() {
    let (merged, routes) = generate("user");

    // /dashboard comes from the menu, its children from the catalog
    assert_eq!(
        paths(&merged),
        vec![
            "/",
            "/welcome",
            "/dashboard",
            "/dashboard/analysis",
            "/dashboard/workbench",
            "/user"
        ]
    );
    assert_eq!(paths(&routes), vec!["/", "/welcome", "/user"]);
}

#[test]
fn test_editor_tree() {
    let (_, routes) = generate("editor");
    assert_eq!(paths(&routes), vec!["/", "/welcome", "/data", "/user"]);
}

#[test]
fn test_server_titles_and_ranks_win() {
    let (merged, _) = generate("admin");

    let home = MergedRoute::find(&merged, "/").unwrap();
    assert_eq!(home.meta.rank, Some(1));
    assert_eq!(home.redirect.as_deref(), Some("/welcome"));

    let profile = MergedRoute::find(&merged, "/user").unwrap();
    assert_eq!(profile.meta.title.as_deref(), Some("Profile"));
    assert!(matches!(&profile.component, ComponentRef::Static(id) if id.as_str() == "views/user/index"));
}

#[test]
fn test_rank_orders_top_level_only() {
    let menus = vec![
        MenuNode::new("/data", "Data").title("Data").rank(2),
        MenuNode::new("/system", "System")
            .title("System")
            .rank(1)
            .children(vec![
                MenuNode::new("/system/role", "SystemRole").title("Roles").rank(2),
                MenuNode::new("/system/user", "SystemUser").title("Users").rank(1),
            ]),
    ];
    let sorted = sort_by_rank(merge(&catalog(), &menus));

    let top: Vec<_> = sorted.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(top, vec!["/system", "/data"]);
    let children: Vec<_> = sorted[0].children.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(children, vec!["/system/role", "/system/user"]);
}

#[test]
fn test_components_resolve_for_installed_routes() {
    let mut menus = menus_for(&["admin".to_string()]);
    menus.push(MenuNode::new("/reports", "Reports").title("Reports"));
    menus.push(MenuNode::new("/audit", "Audit").title("Audit"));
    let merged = merge(&catalog(), &menus);

    let registry = ComponentRegistry::default().with("views/reports/index", "ReportsPage");
    let sink = CollectingSink::new();
    let resolved = registry.resolve_all(&merged, &sink);
    let lookup = |path: &str| {
        resolved
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.clone())
            .unwrap()
    };

    assert_eq!(
        lookup("/user"),
        ResolvedComponent::Component(ComponentId::new("views/user/index"))
    );
    assert_eq!(lookup("/system"), ResolvedComponent::None);
    assert_eq!(
        lookup("/reports"),
        ResolvedComponent::Component(ComponentId::new("ReportsPage"))
    );
    assert!(lookup("/audit").is_not_found());
    assert_eq!(sink.count("route_resolution_missing"), 1);
}

#[test]
fn test_installed_routes_drive_navigation_without_runtime() {
    let shell = Shell::new();
    pollster::block_on(shell.login("editor"));

    let data = pollster::block_on(shell.navigator.navigate("/data"));
    assert_eq!(
        data,
        NavigationResult::Allowed {
            path: "/data".to_string(),
            route: Some("Data".to_string()),
        }
    );
    assert!(pollster::block_on(shell.navigator.navigate("/system/menu")).is_forbidden());
}
