//! Routes-file loading with built-in fallback.
//!
//! Routes load exactly once at startup: from an explicit `--config` path,
//! from an auto-detected `./patchbay.json`, or — when the file is absent,
//! unreadable, or invalid — from the fixed built-in three-route list
//! ([`model::builtin_routes`]). Submodules provide the serde data model and
//! validation logic.

pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::PatchbayError;
use model::RoutesConfig;

pub const DEFAULT_CONFIG_FILE: &str = "patchbay.json";

/// Where the active route list came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    File(PathBuf),
    BuiltIn,
}

impl std::fmt::Display for RouteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::BuiltIn => write!(f, "built-in defaults"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedRoutes {
    pub config: RoutesConfig,
    pub source: RouteSource,
}

/// Strict load: parse and validate, propagating every failure. Used by
/// `patchbay validate` and for explicit config paths.
pub async fn load_from_file(path: &Path) -> Result<RoutesConfig, PatchbayError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PatchbayError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PatchbayError::Io(e)
        }
    })?;

    parse_routes_str(&content, &path.display().to_string())
}

/// Parse a routes-file string and validate the result.
pub fn parse_routes_str(content: &str, path_display: &str) -> Result<RoutesConfig, PatchbayError> {
    let config: RoutesConfig =
        serde_json::from_str(content).map_err(|e| PatchbayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        })?;

    if let Err(errors) = validation::validate(&config) {
        return Err(PatchbayError::ConfigValidation { errors });
    }

    Ok(config)
}

/// Best-effort load for `patchbay run`: an absent or unusable routes file
/// logs a warning and falls back to the built-in list, never aborting
/// startup.
pub async fn load_with_fallback(explicit: Option<&Path>) -> LoadedRoutes {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if tokio::fs::try_exists(&default).await.unwrap_or(false) {
                tracing::info!(path = %default.display(), "auto-detected routes file");
                Some(default)
            } else {
                None
            }
        }
    };

    let Some(path) = candidate else {
        tracing::info!("no routes file found, using built-in defaults with placeholder DSNs");
        return LoadedRoutes {
            config: model::builtin_routes(),
            source: RouteSource::BuiltIn,
        };
    };

    match load_from_file(&path).await {
        Ok(config) => {
            tracing::info!(
                path = %path.display(),
                projects = config.projects.len(),
                "loaded routes file"
            );
            LoadedRoutes {
                config,
                source: RouteSource::File(path),
            }
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load routes file, using built-in defaults"
            );
            LoadedRoutes {
                config: model::builtin_routes(),
                source: RouteSource::BuiltIn,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_explicit_file_falls_back_to_builtin() {
        let loaded = load_with_fallback(Some(Path::new("/nonexistent/routes.json"))).await;
        assert_eq!(loaded.source, RouteSource::BuiltIn);
        assert_eq!(loaded.config.projects.len(), 3);
    }

    #[test]
    fn parse_rejects_invalid_json() {
        assert!(matches!(
            parse_routes_str("{not json", "test.json"),
            Err(PatchbayError::ConfigParse { .. })
        ));
    }

    #[test]
    fn parse_rejects_empty_project_list() {
        assert!(matches!(
            parse_routes_str(r#"{"projects": []}"#, "test.json"),
            Err(PatchbayError::ConfigValidation { .. })
        ));
    }
}
