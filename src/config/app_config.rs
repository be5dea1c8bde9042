use serde::Deserialize;
use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};

use crate::core::errors::{FocusError, Result};
use crate::core::models::policy::TimeComparisonPolicy;
use crate::core::services::focus_log_engine::LogSettings;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "focuslog.toml";

/// Contents written by `focuslog init`.
pub const DEFAULT_CONFIG: &str = r#"[log]
data_dir = "."
base_name = "focus"
extension = "csv"
summary_base_name = "summary"
# local_offset | naive_or_utc
policy = "local_offset"
tally = true
# Offset applied to chat timestamps (server sends UTC)
utc_offset = "+00:00"

[live]
# twitch | always | never
mode = "twitch"

[twitch]
channel = "your_channel"
prefix = "!"
command = "focus"
"#;

/// Top-level configuration read from `focuslog.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub live: LiveSection,
    pub twitch: Option<TwitchSection>,
}

impl AppConfig {
    /// Load and validate the configuration at `path`.
    ///
    /// File-name components are checked so a config cannot point the
    /// log outside its data directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FocusError::InvalidConfig {
                detail: format!(
                    "{} not found. Run 'focuslog init' first.",
                    path.display()
                ),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| FocusError::InvalidConfig {
            detail: format!("Failed to parse config: {e}"),
        })?;

        validate_simple_name(&config.log.base_name, "log.base_name")?;
        validate_simple_name(&config.log.summary_base_name, "log.summary_base_name")?;
        if !config.log.extension.is_empty() {
            validate_simple_name(&config.log.extension, "log.extension")?;
            if config.log.extension.contains('.') {
                return Err(FocusError::InvalidConfig {
                    detail: "log.extension must not contain '.' (use \"csv\", not \".csv\")".into(),
                });
            }
        }
        config.utc_offset()?;

        Ok(config)
    }

    /// Engine settings derived from the `[log]` section.
    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            data_dir: self.log.data_dir.clone(),
            base_name: self.log.base_name.clone(),
            extension: self.log.extension.clone(),
            summary_base_name: self.log.summary_base_name.clone(),
            policy: self.log.policy,
            tally: self.log.tally,
        }
    }

    /// The configured chat offset, UTC when unset.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        match &self.log.utc_offset {
            Some(raw) => parse_utc_offset(raw),
            None => Ok(Utc.fix()),
        }
    }

    /// The `[twitch]` section, required by `listen` and the twitch oracle.
    pub fn twitch(&self) -> Result<&TwitchSection> {
        self.twitch.as_ref().ok_or_else(|| FocusError::InvalidConfig {
            detail: "Missing [twitch] section (channel is required)".into(),
        })
    }
}

/// The `[log]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub data_dir: PathBuf,
    pub base_name: String,
    /// Empty string means files carry no extension.
    pub extension: String,
    pub summary_base_name: String,
    pub policy: TimeComparisonPolicy,
    pub tally: bool,
    /// `±HH:MM`, applied to chat-supplied UTC timestamps.
    pub utc_offset: Option<String>,
}

impl Default for LogSection {
    fn default() -> Self {
        let defaults = LogSettings::default();
        Self {
            data_dir: defaults.data_dir,
            base_name: defaults.base_name,
            extension: defaults.extension,
            summary_base_name: defaults.summary_base_name,
            policy: defaults.policy,
            tally: defaults.tally,
            utc_offset: None,
        }
    }
}

/// Where the live-status answer comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveMode {
    #[default]
    Twitch,
    Always,
    Never,
}

/// The `[live]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiveSection {
    #[serde(default)]
    pub mode: LiveMode,
}

/// The `[twitch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TwitchSection {
    pub channel: String,
    /// Bot login; defaults to the channel name.
    pub nick: Option<String>,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_irc_addr")]
    pub irc_addr: String,
}

impl TwitchSection {
    pub fn nick(&self) -> &str {
        self.nick.as_deref().unwrap_or(&self.channel)
    }

    /// Trigger word, e.g. `!focus`.
    pub fn trigger(&self) -> String {
        format!("{}{}", self.prefix, self.command)
    }
}

fn default_prefix() -> String {
    "!".into()
}

fn default_command() -> String {
    "focus".into()
}

fn default_irc_addr() -> String {
    "irc.chat.twitch.tv:6697".into()
}

/// Reject empty names, path separators and `..`.
pub fn validate_simple_name(name: &str, label: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(FocusError::InvalidConfig {
            detail: format!("Invalid {label} '{name}': must be a plain file name"),
        });
    }
    Ok(())
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let invalid = || FocusError::InvalidConfig {
        detail: format!("Invalid utc_offset '{raw}'. Expected ±HH:MM, e.g. -07:00"),
    };

    let s = raw.trim();
    if s.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }

    let (sign, digits) = match s.split_at_checked(1) {
        Some(("+", d)) => (1, d),
        Some(("-", d)) => (-1, d),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at_checked(2).ok_or_else(invalid)?,
        None => return Err(invalid()),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = AppConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.log_settings(), LogSettings::default());
        assert_eq!(config.live.mode, LiveMode::Twitch);
        assert_eq!(config.twitch().unwrap().trigger(), "!focus");
        assert_eq!(config.twitch().unwrap().nick(), "your_channel");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.log_settings(), LogSettings::default());
        assert!(config.twitch().is_err());
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn policy_and_extension_are_configurable() {
        let config = AppConfig::parse(
            "[log]\npolicy = \"naive_or_utc\"\nextension = \"\"\ntally = false\n",
        )
        .unwrap();
        let settings = config.log_settings();
        assert_eq!(settings.policy, TimeComparisonPolicy::NaiveOrUtc);
        assert!(settings.extension.is_empty());
        assert!(!settings.tally);
    }

    #[test]
    fn rejects_path_traversal_in_names() {
        assert!(AppConfig::parse("[log]\nbase_name = \"../focus\"\n").is_err());
        assert!(AppConfig::parse("[log]\nsummary_base_name = \"a/b\"\n").is_err());
        assert!(AppConfig::parse("[log]\nextension = \".csv\"\n").is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(AppConfig::parse("[log]\npolicy = \"lunar\"\n").is_err());
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_utc_offset("-07:00").unwrap().local_minus_utc(), -7 * 3600);
        assert_eq!(parse_utc_offset("+0530").unwrap().local_minus_utc(), 5 * 3600 + 1800);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("07:00").is_err());
        assert!(parse_utc_offset("+25:00").is_err());
    }

    #[test]
    fn bad_offset_fails_load() {
        assert!(AppConfig::parse("[log]\nutc_offset = \"pacific\"\n").is_err());
    }

    #[test]
    fn multibyte_offset_is_rejected() {
        assert!(parse_utc_offset("+a€").is_err());
        assert!(parse_utc_offset("-é1").is_err());
        assert!(AppConfig::parse("[log]\nutc_offset = \"+a€\"\n").is_err());
    }

    #[test]
    fn chat_defaults_to_tls_port() {
        let config = AppConfig::parse("[twitch]\nchannel = \"bedtimebear_808\"\n").unwrap();
        assert_eq!(config.twitch().unwrap().irc_addr, "irc.chat.twitch.tv:6697");
    }

    #[test]
    fn missing_file_suggests_init() {
        let err = AppConfig::load(Path::new("/nonexistent/focuslog.toml")).unwrap_err();
        assert!(err.to_string().contains("focuslog init"));
    }
}
