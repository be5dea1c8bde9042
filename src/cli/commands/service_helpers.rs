use crate::adapters::codecs::csv_codec::CsvCodec;
use crate::adapters::liveness::static_liveness::StaticLiveness;
use crate::adapters::liveness::twitch_liveness::TwitchLiveness;
use crate::cli::output;
use crate::config::app_config::{AppConfig, LiveMode};
use crate::config::credentials::CredentialSource;
use crate::core::errors::Result;
use crate::core::services::focus_log_engine::{FocusLogEngine, RecordOutcome};
use crate::core::services::focus_service::FocusService;
use crate::core::traits::liveness::LivenessOracle;

pub type CliService = FocusService<CsvCodec, Box<dyn LivenessOracle>>;

/// Build the CSV-backed log engine from `[log]`.
pub fn build_engine(config: &AppConfig) -> FocusLogEngine<CsvCodec> {
    FocusLogEngine::new(config.log_settings(), CsvCodec)
}

/// Pick the live-status oracle named by `[live] mode`.
///
/// The twitch oracle needs `[twitch] channel` plus ACCESS_TOKEN and
/// CLIENT_ID; the static modes need nothing.
pub fn build_oracle(
    config: &AppConfig,
    credentials: &CredentialSource,
) -> Result<Box<dyn LivenessOracle>> {
    match config.live.mode {
        LiveMode::Always => Ok(Box::new(StaticLiveness::always())),
        LiveMode::Never => Ok(Box::new(StaticLiveness::never())),
        LiveMode::Twitch => {
            let twitch = config.twitch()?;
            let creds = credentials.credentials()?;
            Ok(Box::new(TwitchLiveness::new(
                &twitch.channel,
                &creds.access_token,
                &creds.client_id,
            )))
        }
    }
}

pub fn build_service(config: &AppConfig, credentials: &CredentialSource) -> Result<CliService> {
    Ok(FocusService::new(
        build_engine(config),
        build_oracle(config, credentials)?,
    ))
}

/// Print what a rotation did, if one happened.
pub fn report_rotation(outcome: &RecordOutcome) {
    let Some(rotation) = &outcome.rotation else {
        return;
    };

    output::success(&format!(
        "Rotated {} → {}",
        rotation.period,
        rotation.archive_path.display()
    ));
    if let Some(summary) = &rotation.summary_path {
        output::success(&format!(
            "Tallied {} author(s) → {}",
            rotation.tally.len(),
            summary.display()
        ));
    }
}
