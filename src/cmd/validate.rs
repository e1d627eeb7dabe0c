//! `patchbay validate` — check a routes file for errors.
//!
//! Parses and validates the routes file, reporting results in either
//! human-readable text or machine-readable JSON format. Unlike
//! `patchbay run`, validation is strict: there is no fallback to the
//! built-in routes.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config;
use crate::error::PatchbayError;

pub async fn execute(args: &ValidateArgs) -> Result<(), PatchbayError> {
    let path = &args.config;

    match config::load_from_file(path).await {
        Ok(routes) => {
            match args.format {
                ValidateFormat::Text => {
                    println!(
                        "\u{2713} {}",
                        config::validation::format_validation_report(
                            &path.display().to_string(),
                            &routes
                        )
                    );
                }
                ValidateFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "valid": true,
                            "projects": routes.projects.len(),
                        })
                    );
                }
            }
            Ok(())
        }
        Err(PatchbayError::ConfigValidation { errors }) => {
            match args.format {
                ValidateFormat::Text => {
                    eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                    for error in &errors {
                        eprintln!("{error}");
                    }
                }
                ValidateFormat::Json => {
                    let json_errors: Vec<serde_json::Value> = errors
                        .iter()
                        .map(|e| {
                            serde_json::json!({
                                "project": e.project,
                                "field": e.field,
                                "message": e.message,
                                "suggestion": e.suggestion,
                            })
                        })
                        .collect();
                    println!(
                        "{}",
                        serde_json::json!({
                            "valid": false,
                            "errors": json_errors,
                        })
                    );
                }
            }
            Err(PatchbayError::ConfigValidation { errors })
        }
        Err(e) => Err(e),
    }
}
