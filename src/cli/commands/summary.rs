use std::path::Path;

use colored::Colorize;

use crate::cli::commands::service_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::period::Period;
use crate::core::traits::record_codec::RecordCodec;

/// Execute the `focuslog summary` command.
///
/// Prints every tally row recorded for a period. Rows from repeated
/// rotations into the same period are shown as written, not merged.
pub fn execute(config_path: &Path, period: &str) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let period = Period::parse(period)?;
    let engine = service_helpers::build_engine(&config);

    let path = engine.summary_path(period);
    let rows = engine.codec().read_tally(&path)?;

    if rows.is_empty() {
        output::header(&format!("focuslog summary {period}"));
        output::warning(&format!("No tally rows in {}", path.display()));
        return Ok(());
    }

    output::header(&format!("focuslog summary {period} ({} rows)", rows.len()));
    println!();
    for row in &rows {
        println!(
            "  {:<24} {} {}",
            row.author,
            "│".dimmed(),
            format!("{} day(s)", row.days).green()
        );
    }

    Ok(())
}
