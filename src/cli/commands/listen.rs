use std::path::Path;

use crate::adapters::chat::twitch_irc::{self, ChatSettings};
use crate::cli::commands::service_helpers;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::config::credentials::CredentialSource;
use crate::core::errors::Result;
use crate::core::services::focus_service::Submission;

/// Execute the `focuslog listen` command.
///
/// Joins the configured Twitch channel and records every `!focus`
/// message while the stream is live, replying with a confirmation.
/// Runs until the connection ends, which is always reported as an error
/// so the process exits non-zero and a supervisor can restart it.
pub fn execute(config_path: &Path, dotenv_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let twitch = config.twitch()?;
    let credentials = CredentialSource::load(dotenv_path)?;
    let token = credentials.chat_token()?;
    let service = service_helpers::build_service(&config, &credentials)?;

    let settings = ChatSettings {
        channel: twitch.channel.clone(),
        nick: twitch.nick().to_string(),
        trigger: twitch.trigger(),
        offset: config.utc_offset()?,
    };

    output::header("focuslog — Listening");
    let mut session = twitch_irc::connect(&twitch.irc_addr, settings)?;
    session.login(&token)?;
    output::success(&format!(
        "Joined #{} — waiting for {}",
        twitch.channel,
        twitch.trigger()
    ));

    session.run(|record| match service.submit(record)? {
        Submission::Recorded(outcome) => {
            service_helpers::report_rotation(&outcome);
            tracing::info!(author = %record.author, "recorded focus");
            Ok(true)
        }
        Submission::Offline => Ok(false),
    })
}
