//! `patchbay init` — generate a starter routes file.
//!
//! Writes the built-in three-route list (with placeholder DSNs) as
//! pretty-printed JSON. Refuses to overwrite an existing file.

use crate::cli::InitArgs;
use crate::config::model::builtin_routes;
use crate::error::PatchbayError;

pub fn execute(args: &InitArgs) -> Result<(), PatchbayError> {
    if args.output.exists() {
        return Err(PatchbayError::FileExists {
            path: args.output.clone(),
        });
    }

    let config = builtin_routes();
    let content = serde_json::to_string_pretty(&config).map_err(|e| PatchbayError::ConfigParse {
        path: args.output.display().to_string(),
        source: Box::new(e),
    })?;

    std::fs::write(&args.output, content + "\n")?;

    println!("\u{2713} wrote {}", args.output.display());
    println!("  Replace the placeholder DSNs with your real project DSNs, then:");
    println!("    patchbay validate {}", args.output.display());
    println!("    patchbay run -c {}", args.output.display());
    Ok(())
}
