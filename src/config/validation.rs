//! Routes-file validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`RoutesConfig`] for
//! structural errors such as an empty project list, blank names, duplicate
//! entries, and DSNs that would fail sender construction. Returns a list of
//! [`ValidationError`] values with per-field suggestions.

use super::model::RoutesConfig;
use crate::error::ValidationError;
use crate::transport::sender::Dsn;

pub fn validate(config: &RoutesConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.projects.is_empty() {
        errors.push(ValidationError {
            project: "(root)".into(),
            field: "projects".into(),
            message: "at least one project must be defined".into(),
            suggestion: Some("the last project acts as the catch-all destination".into()),
        });
        return Err(errors);
    }

    let mut seen_names = std::collections::HashSet::new();

    for (i, entry) in config.projects.iter().enumerate() {
        let project_id = if entry.name.is_empty() {
            format!("projects[{i}]")
        } else {
            entry.name.clone()
        };

        if entry.name.trim().is_empty() {
            errors.push(ValidationError {
                project: project_id.clone(),
                field: "name".into(),
                message: "name cannot be empty".into(),
                suggestion: None,
            });
        }

        if !seen_names.insert(&entry.name) {
            errors.push(ValidationError {
                project: project_id.clone(),
                field: "name".into(),
                message: "duplicate project name".into(),
                suggestion: None,
            });
        }

        // DSN parsing fails at sender construction; catch it here first
        if let Err(e) = Dsn::parse(&entry.dsn) {
            errors.push(ValidationError {
                project: project_id.clone(),
                field: "dsn".into(),
                message: e.to_string(),
                suggestion: Some("expected scheme://key@host/project".into()),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Human-readable summary for `patchbay validate`.
#[must_use]
pub fn format_validation_report(path: &str, config: &RoutesConfig) -> String {
    use crate::transport::sender::mask_dsn;

    let mut lines = vec![format!("  {} projects\n", config.projects.len())];

    for (i, entry) in config.projects.iter().enumerate() {
        let marker = if i == config.projects.len() - 1 {
            " (default)"
        } else {
            ""
        };
        lines.push(format!(
            "  {}{marker}  -> {}",
            entry.name,
            mask_dsn(&entry.dsn)
        ));
        let rules = &entry.rules;
        let counts = [
            ("tags", rules.tags.len()),
            ("statusCodes", rules.status_codes.len()),
            ("exceptionTypes", rules.exception_types.len()),
            ("messageKeywords", rules.message_keywords.len()),
            ("environments", rules.environments.len()),
            ("levels", rules.levels.len()),
        ];
        let summary: Vec<String> = counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| format!("{name}: {n}"))
            .collect();
        if summary.is_empty() {
            lines.push("    rules: none (matches only as fallback)".to_string());
        } else {
            lines.push(format!("    rules: {}", summary.join(", ")));
        }
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{builtin_routes, ProjectEntry, RoutesConfig, RuleSet};

    fn entry(name: &str, dsn: &str) -> ProjectEntry {
        ProjectEntry {
            name: name.into(),
            dsn: dsn.into(),
            rules: RuleSet::default(),
        }
    }

    #[test]
    fn builtin_routes_pass() {
        assert!(validate(&builtin_routes()).is_ok());
    }

    #[test]
    fn empty_projects_fails() {
        let config = RoutesConfig { projects: vec![] };
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("at least one project"));
    }

    #[test]
    fn bad_dsn_fails() {
        let config = RoutesConfig {
            projects: vec![entry("p", "no-key-here")],
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "dsn"));
    }

    #[test]
    fn duplicate_names_fail() {
        let config = RoutesConfig {
            projects: vec![
                entry("same", "https://A@h.example/1"),
                entry("same", "https://B@h.example/2"),
            ],
        };
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("duplicate")));
    }

    #[test]
    fn report_masks_dsns() {
        let report = format_validation_report("patchbay.json", &builtin_routes());
        assert!(report.contains("://***@"));
        assert!(!report.contains("YOUR_GATEWAY_PROJECT_KEY@"));
    }
}
