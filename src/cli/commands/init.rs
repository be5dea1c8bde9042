use std::path::Path;

use crate::cli::output;
use crate::config::app_config::DEFAULT_CONFIG;
use crate::core::errors::{FocusError, Result};

/// Execute the `focuslog init` command.
///
/// Writes a default config file. Never overwrites an existing one.
pub fn execute(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        return Err(FocusError::InvalidConfig {
            detail: format!("{} already exists", config_path.display()),
        });
    }

    output::header("focuslog — Initializing");

    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    output::success(&format!("Generated {} with defaults", config_path.display()));

    println!("\n  Next steps:");
    println!("    1. Set [twitch] channel in {}", config_path.display());
    println!("    2. Put ACCESS_TOKEN and CLIENT_ID in .env or your environment");
    println!("    3. Run: focuslog listen");

    Ok(())
}
