//! Serde data structures for the Patchbay routes file.
//!
//! The file schema is a `projects` list where each entry carries a name, a
//! DSN, and a `rules` block of matching criteria. Field names are camelCase
//! to match the original JSON schema; all types use `deny_unknown_fields`
//! for strict parsing.

use serde::{Deserialize, Serialize};

use crate::error::PatchbayError;
use crate::routing::{Route, RouteTable};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutesConfig {
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectEntry {
    pub name: String,
    pub dsn: String,

    #[serde(default, skip_serializing_if = "RuleSet::is_default")]
    pub rules: RuleSet,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_codes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exception_types: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub message_keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,
}

impl RuleSet {
    fn is_default(&self) -> bool {
        self.tags.is_empty()
            && self.status_codes.is_empty()
            && self.exception_types.is_empty()
            && self.message_keywords.is_empty()
            && self.environments.is_empty()
            && self.levels.is_empty()
    }
}

impl RoutesConfig {
    /// Compile the declarative config into the immutable, case-normalized
    /// route table. Order is preserved: the last entry is the catch-all.
    pub fn compile(&self) -> Result<RouteTable, PatchbayError> {
        let routes = self
            .projects
            .iter()
            .map(|p| {
                Route::new(
                    p.name.clone(),
                    p.dsn.clone(),
                    p.rules.tags.clone(),
                    p.rules.status_codes.clone(),
                    p.rules.exception_types.clone(),
                    p.rules.message_keywords.clone(),
                    p.rules.environments.clone(),
                    p.rules.levels.clone(),
                )
            })
            .collect();
        RouteTable::new(routes)
    }
}

/// The fixed built-in route list used when no routes file is available.
/// An explicitly constructed value, not module state: callers own it.
#[must_use]
pub fn builtin_routes() -> RoutesConfig {
    let project = |name: &str, dsn: &str, rules: RuleSet| ProjectEntry {
        name: name.to_string(),
        dsn: dsn.to_string(),
        rules,
    };
    let list = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();

    RoutesConfig {
        projects: vec![
            project(
                "Gateway Project",
                "https://YOUR_GATEWAY_PROJECT_KEY@o0.ingest.sentry.io/YOUR_GATEWAY_PROJECT_ID",
                RuleSet {
                    tags: list(&["gateway"]),
                    status_codes: list(&["502"]),
                    exception_types: list(&["BadGatewayException"]),
                    message_keywords: list(&["502 Bad Gateway", "Upstream service"]),
                    ..RuleSet::default()
                },
            ),
            project(
                "Internal Errors Project",
                "https://YOUR_INTERNAL_PROJECT_KEY@o0.ingest.sentry.io/YOUR_INTERNAL_PROJECT_ID",
                RuleSet {
                    tags: list(&["internal"]),
                    status_codes: list(&["500"]),
                    exception_types: list(&["InternalServerException"]),
                    message_keywords: list(&["500 Internal Server Error", "Database connection"]),
                    ..RuleSet::default()
                },
            ),
            project(
                "Default Project",
                "https://YOUR_DEFAULT_PROJECT_KEY@o0.ingest.sentry.io/YOUR_DEFAULT_PROJECT_ID",
                RuleSet {
                    tags: list(&["generic", "default"]),
                    status_codes: list(&["400", "404"]),
                    exception_types: list(&["RuntimeException", "Exception"]),
                    message_keywords: list(&["Generic application error"]),
                    ..RuleSet::default()
                },
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_default_to_empty() {
        let config: RoutesConfig = serde_json::from_str(
            r#"{"projects": [{"name": "p", "dsn": "https://K@h.example/1"}]}"#,
        )
        .unwrap();
        assert!(config.projects[0].rules.is_default());
    }

    #[test]
    fn camel_case_rule_fields() {
        let config: RoutesConfig = serde_json::from_str(
            r#"{"projects": [{
                "name": "p",
                "dsn": "https://K@h.example/1",
                "rules": {"statusCodes": ["502"], "messageKeywords": ["Bad Gateway"]}
            }]}"#,
        )
        .unwrap();
        assert_eq!(config.projects[0].rules.status_codes, vec!["502"]);
        assert_eq!(config.projects[0].rules.message_keywords, vec!["Bad Gateway"]);
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<RoutesConfig, _> = serde_json::from_str(
            r#"{"projects": [{"name": "p", "dsn": "d", "retries": 3}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn builtin_routes_compile() {
        let table = builtin_routes().compile().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.default_route().name, "Default Project");
    }
}
