use std::path::Path;

use colored::Colorize;

use crate::cli::commands::service_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::period::Period;
use crate::core::traits::record_codec::RecordCodec;

/// Execute the `focuslog status` command.
///
/// Shows the settings in effect and the state of the current log.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let engine = service_helpers::build_engine(&config);
    let settings = engine.settings();

    output::header(&format!("focuslog v{}", env!("CARGO_PKG_VERSION")));
    println!("  Config: {}", config_path.display());
    println!("  Policy: {}", settings.policy.name().cyan());
    println!(
        "  Tally: {}",
        if settings.tally { "on".green() } else { "off".yellow() }
    );
    println!("  Live check: {:?}", config.live.mode);

    println!("\n{}", "  Current log".bold());
    let current = engine.current_path();
    let records = engine.codec().read_records(&current)?;
    if records.is_empty() {
        output::warning(&format!("{} is empty or missing", current.display()));
        return Ok(());
    }

    let period = Period::of(&settings.policy.basis(&records[0].timestamp));
    output::success(&format!(
        "{}: {} record(s), period {}",
        current.display(),
        records.len(),
        period
    ));

    let archive = engine.archive_path(period);
    if archive.exists() {
        output::warning(&format!(
            "{} already exists — the next rotation will fail until it is moved",
            archive.display()
        ));
    }

    Ok(())
}
