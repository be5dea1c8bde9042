use std::path::Path;

use chrono::Local;

use crate::cli::commands::service_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::config::credentials::CredentialSource;
use crate::core::errors::{FocusError, Result};
use crate::core::models::focus_record::{FocusRecord, parse_timestamp};
use crate::core::services::focus_service::Submission;

/// Execute the `focuslog record` command.
///
/// Submits one focus event through the live-status gate. Without `--at`
/// the event is stamped with the current local time and offset.
pub fn execute(
    config_path: &Path,
    dotenv_path: &Path,
    author: &str,
    message: &str,
    at: Option<&str>,
) -> Result<()> {
    let author = author.trim();
    if author.is_empty() {
        return Err(FocusError::InvalidConfig {
            detail: "Author must not be empty".into(),
        });
    }

    let config = AppConfig::load(config_path)?;
    let credentials = CredentialSource::load(dotenv_path)?;
    let service = service_helpers::build_service(&config, &credentials)?;

    let timestamp = match at {
        Some(raw) => parse_timestamp(raw)?,
        None => Local::now().fixed_offset(),
    };
    let record = FocusRecord::new(author, message.trim(), timestamp);

    match service.submit(&record)? {
        Submission::Offline => {
            output::warning("Stream is offline — focus not recorded");
        }
        Submission::Recorded(outcome) => {
            service_helpers::report_rotation(&outcome);
            output::success(&format!(
                "{} is focusing: {}.",
                record.author, record.message
            ));
        }
    }

    Ok(())
}
