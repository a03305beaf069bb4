//! The configuration shipped at the repository root.

use std::path::Path;

use radix_router::config::load_config;
use radix_router::http::{Endpoint, Files, Outcome, RouteTable};

#[test]
fn test_shipped_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("router.toml");
    let config = load_config(&path).unwrap();
    let table = RouteTable::from_config(&config).unwrap();

    assert_eq!(table.router().max_params(), 2);

    let report = table.report("GET", "/api/v1/users/me");
    assert_eq!(report.route.as_deref(), Some("current_user"));

    let report = table.report("HEAD", "/static/index.html");
    assert_eq!(report.route.as_deref(), Some("static_files"));
    assert_eq!(
        Endpoint::from(&config.routes[1]).files,
        Some(Files::Dir("public".into()))
    );

    let report = table.report("DELETE", "/api/v1/users/3");
    assert_eq!(report.outcome, Outcome::Found);
    assert_eq!(report.params["id"], "3");

    assert_eq!(
        table.router().uri("user_file", &["3", "a/b.txt"]).as_deref(),
        Some("/api/v1/users/3/files/a/b.txt")
    );
}
