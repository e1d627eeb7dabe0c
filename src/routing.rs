//! Ordered first-match-wins route matching for telemetry events.
//!
//! A [`Route`] pairs a destination DSN with content-matching rule sets; a
//! [`RouteTable`] evaluates routes in table order against an
//! [`EventAttributes`] snapshot and returns the first route for which any
//! predicate holds. The last route doubles as the implicit catch-all:
//! events no route claims are still delivered somewhere.

use std::collections::{HashMap, HashSet};

use crate::classify::EventAttributes;
use crate::error::PatchbayError;

/// Immutable matching rule plus destination. Pattern, keyword, environment,
/// and level sets are lowercased at construction; tag names and status
/// values compare as exact, case-sensitive strings.
#[derive(Debug, Clone)]
pub struct Route {
    pub name: String,
    pub dsn: String,
    tag_names: HashSet<String>,
    status_values: HashSet<String>,
    exception_patterns: Vec<String>,
    message_keywords: Vec<String>,
    environments: HashSet<String>,
    levels: HashSet<String>,
}

fn lowered(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.to_lowercase()).collect()
}

fn lowered_set(values: Vec<String>) -> HashSet<String> {
    values.into_iter().map(|v| v.to_lowercase()).collect()
}

impl Route {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        dsn: impl Into<String>,
        tag_names: Vec<String>,
        status_values: Vec<String>,
        exception_patterns: Vec<String>,
        message_keywords: Vec<String>,
        environments: Vec<String>,
        levels: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dsn: dsn.into(),
            tag_names: tag_names.into_iter().collect(),
            status_values: status_values.into_iter().collect(),
            exception_patterns: lowered(exception_patterns),
            message_keywords: lowered(message_keywords),
            environments: lowered_set(environments),
            levels: lowered_set(levels),
        }
    }

    /// True when any single predicate claims the event. The predicates are
    /// independent, so their evaluation order never changes the outcome.
    #[must_use]
    pub fn matches(&self, attrs: &EventAttributes) -> bool {
        self.matches_tags(&attrs.tags)
            || self.matches_exception(attrs.exception_type.as_deref())
            || self.matches_message(attrs.message.as_deref())
            || self.matches_environment(attrs.environment.as_deref())
            || self.matches_level(attrs.level.as_deref())
    }

    fn matches_tags(&self, tags: &HashMap<String, String>) -> bool {
        if tags.is_empty() {
            return false;
        }
        if self.tag_names.iter().any(|name| tags.contains_key(name)) {
            return true;
        }
        tags.get("status")
            .is_some_and(|status| self.status_values.contains(status))
    }

    fn matches_exception(&self, exception_type: Option<&str>) -> bool {
        let Some(exception_type) = exception_type else {
            return false;
        };
        let lower = exception_type.to_lowercase();
        self.exception_patterns.iter().any(|p| lower.contains(p))
    }

    fn matches_message(&self, message: Option<&str>) -> bool {
        let Some(message) = message else {
            return false;
        };
        let lower = message.to_lowercase();
        self.message_keywords.iter().any(|k| lower.contains(k))
    }

    fn matches_environment(&self, environment: Option<&str>) -> bool {
        if self.environments.is_empty() {
            return false;
        }
        environment.is_some_and(|env| self.environments.contains(&env.to_lowercase()))
    }

    fn matches_level(&self, level: Option<&str>) -> bool {
        if self.levels.is_empty() {
            return false;
        }
        level.is_some_and(|lvl| self.levels.contains(&lvl.to_lowercase()))
    }
}

/// Ordered, non-empty route sequence. Order is significant: ties are broken
/// by table position and the last route is the default destination.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Result<Self, PatchbayError> {
        if routes.is_empty() {
            return Err(PatchbayError::EmptyRouteTable);
        }
        Ok(Self { routes })
    }

    /// First route (in table order) claimed by any predicate, else the
    /// last route as fallback.
    #[must_use]
    pub fn select(&self, attrs: &EventAttributes) -> &Route {
        self.routes
            .iter()
            .find(|route| route.matches(attrs))
            .unwrap_or_else(|| self.default_route())
    }

    /// The table's catch-all: its last route.
    #[must_use]
    pub fn default_route(&self) -> &Route {
        // Non-empty by construction
        &self.routes[self.routes.len() - 1]
    }

    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Project name for a DSN, for log lines.
    #[must_use]
    pub fn project_name(&self, dsn: &str) -> &str {
        self.routes
            .iter()
            .find(|route| route.dsn == dsn)
            .map_or("unknown project", |route| route.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs_with_tags(pairs: &[(&str, &str)]) -> EventAttributes {
        EventAttributes {
            tags: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ..EventAttributes::empty()
        }
    }

    fn gateway_route() -> Route {
        Route::new(
            "Gateway Project",
            "https://GATEWAY_KEY@o0.ingest.example.io/1",
            vec!["gateway".into()],
            vec!["502".into()],
            vec!["BadGatewayException".into()],
            vec!["502 Bad Gateway".into(), "Upstream service".into()],
            vec![],
            vec![],
        )
    }

    #[test]
    fn tag_name_presence_matches() {
        let route = gateway_route();
        assert!(route.matches(&attrs_with_tags(&[("gateway", "true")])));
        assert!(!route.matches(&attrs_with_tags(&[("internal", "true")])));
    }

    #[test]
    fn status_value_matches_exactly() {
        let route = gateway_route();
        assert!(route.matches(&attrs_with_tags(&[("status", "502")])));
        assert!(!route.matches(&attrs_with_tags(&[("status", "500")])));
        // Status values are case-sensitive exact keys, not patterns
        assert!(!route.matches(&attrs_with_tags(&[("Status", "502")])));
    }

    #[test]
    fn exception_substring_is_case_insensitive() {
        let route = Route::new(
            "r",
            "https://K@h/1",
            vec![],
            vec![],
            vec!["badgatewayexception".into()],
            vec![],
            vec![],
            vec![],
        );
        let attrs = EventAttributes {
            exception_type: Some("com.app.BadGatewayException".into()),
            ..EventAttributes::empty()
        };
        assert!(route.matches(&attrs));
    }

    #[test]
    fn message_keyword_is_case_insensitive_substring() {
        let route = gateway_route();
        let attrs = EventAttributes {
            message: Some("Call failed: UPSTREAM SERVICE timed out".into()),
            ..EventAttributes::empty()
        };
        assert!(route.matches(&attrs));
    }

    #[test]
    fn empty_environment_set_never_matches() {
        let route = gateway_route();
        let attrs = EventAttributes {
            environment: Some("production".into()),
            ..EventAttributes::empty()
        };
        assert!(!route.matches(&attrs));
    }

    #[test]
    fn environment_and_level_membership() {
        let route = Route::new(
            "r",
            "https://K@h/1",
            vec![],
            vec![],
            vec![],
            vec![],
            vec!["Production".into()],
            vec!["ERROR".into()],
        );
        let env_attrs = EventAttributes {
            environment: Some("PRODUCTION".into()),
            ..EventAttributes::empty()
        };
        assert!(route.matches(&env_attrs));

        let level_attrs = EventAttributes {
            level: Some("error".into()),
            ..EventAttributes::empty()
        };
        assert!(route.matches(&level_attrs));
    }

    #[test]
    fn first_match_wins_on_table_order() {
        let table = RouteTable::new(vec![
            Route::new(
                "first",
                "https://A@h/1",
                vec!["shared".into()],
                vec![],
                vec![],
                vec![],
                vec![],
                vec![],
            ),
            Route::new(
                "second",
                "https://B@h/2",
                vec!["shared".into()],
                vec![],
                vec![],
                vec![],
                vec![],
                vec![],
            ),
        ])
        .unwrap();

        let selected = table.select(&attrs_with_tags(&[("shared", "yes")]));
        assert_eq!(selected.name, "first");
    }

    #[test]
    fn no_match_falls_back_to_last_route() {
        let table = RouteTable::new(vec![
            gateway_route(),
            Route::new(
                "Default Project",
                "https://D@h/3",
                vec![],
                vec![],
                vec![],
                vec![],
                vec![],
                vec![],
            ),
        ])
        .unwrap();

        let selected = table.select(&EventAttributes::empty());
        assert_eq!(selected.name, "Default Project");
    }

    #[test]
    fn empty_table_is_a_configuration_error() {
        assert!(matches!(
            RouteTable::new(vec![]),
            Err(PatchbayError::EmptyRouteTable)
        ));
    }

    #[test]
    fn project_name_lookup() {
        let table = RouteTable::new(vec![gateway_route()]).unwrap();
        assert_eq!(
            table.project_name("https://GATEWAY_KEY@o0.ingest.example.io/1"),
            "Gateway Project"
        );
        assert_eq!(table.project_name("https://X@h/9"), "unknown project");
    }
}
