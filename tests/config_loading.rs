//! Integration tests for routes-file loading, validation, and fallback.

use patchbay::config::model::{builtin_routes, RoutesConfig};
use patchbay::config::validation::validate;
use patchbay::config::{self, RouteSource};

fn load_example() -> String {
    let path = "example/patchbay.json";
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[test]
fn example_routes_file_loads_and_validates() {
    let content = load_example();
    let routes = config::parse_routes_str(&content, "example/patchbay.json").unwrap();
    validate(&routes).unwrap();
    assert_eq!(routes.projects.len(), 3);
    assert_eq!(routes.projects[2].name, "Default Project");
}

#[test]
fn example_routes_file_compiles_to_table() {
    let content = load_example();
    let routes = config::parse_routes_str(&content, "example/patchbay.json").unwrap();
    let table = routes.compile().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.default_route().name, "Default Project");
}

#[test]
fn builtin_fallback_matches_original_defaults() {
    let routes = builtin_routes();
    assert_eq!(routes.projects.len(), 3);
    assert_eq!(routes.projects[0].name, "Gateway Project");
    assert_eq!(routes.projects[1].name, "Internal Errors Project");
    assert_eq!(routes.projects[2].name, "Default Project");
    validate(&routes).unwrap();
}

#[test]
fn builtin_fallback_round_trips_through_serde() {
    let routes = builtin_routes();
    let json = serde_json::to_string_pretty(&routes).unwrap();
    let reparsed: RoutesConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed.projects.len(), routes.projects.len());
    // init writes camelCase rule keys that validate/run must accept back
    assert!(json.contains("statusCodes"));
    assert!(json.contains("messageKeywords"));
}

#[tokio::test]
async fn missing_file_falls_back_to_builtin_defaults() {
    let loaded =
        config::load_with_fallback(Some(std::path::Path::new("/does/not/exist.json"))).await;
    assert_eq!(loaded.source, RouteSource::BuiltIn);
    assert_eq!(loaded.config.projects.len(), 3);
}

#[test]
fn unknown_top_level_field_is_rejected() {
    let result = config::parse_routes_str(
        r#"{"projects": [], "hotReload": true}"#,
        "test.json",
    );
    assert!(result.is_err());
}
