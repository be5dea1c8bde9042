use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};

use crate::core::errors::{FocusError, Result};
use crate::core::models::focus_record::FocusRecord;
use crate::core::models::period::Period;
use crate::core::models::policy::TimeComparisonPolicy;
use crate::core::models::tally::{TallyRow, tally_days};
use crate::core::traits::record_codec::RecordCodec;

/// File layout and behaviour of a log engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    /// Directory holding the current log, archives and summaries.
    pub data_dir: PathBuf,
    /// Stem of the current log and its archives (e.g. `focus`).
    pub base_name: String,
    /// Extension without the dot; empty means no extension.
    pub extension: String,
    /// Stem of the per-period summary files.
    pub summary_base_name: String,
    pub policy: TimeComparisonPolicy,
    /// Tally distinct days per author before each rotation.
    pub tally: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            base_name: "focus".into(),
            extension: "csv".into(),
            summary_base_name: "summary".into(),
            policy: TimeComparisonPolicy::default(),
            tally: true,
        }
    }
}

impl LogSettings {
    fn file_name(&self, stem: &str) -> String {
        if self.extension.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{}", self.extension)
        }
    }
}

/// Result of inspecting the current log against an incoming timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDecision {
    Keep,
    /// The log belongs to this earlier (or otherwise different) period.
    Rotate(Period),
}

/// What happened to the old log during a rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationReport {
    pub period: Period,
    pub archive_path: PathBuf,
    /// Summary file written to, when tallying is enabled.
    pub summary_path: Option<PathBuf>,
    pub tally: Vec<TallyRow>,
}

/// Outcome of a successful `record_event`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub log_path: PathBuf,
    pub rotation: Option<RotationReport>,
}

/// Appends focus records to the current log, rolling it over to a
/// monthly archive when a record belongs to a new period.
///
/// The period of the log is inferred from its first row only, so callers
/// must append in non-decreasing timestamp order. Calls must be serialized
/// by the caller; the engine holds no lock and no open file between calls.
pub struct FocusLogEngine<C: RecordCodec> {
    settings: LogSettings,
    codec: C,
}

impl<C: RecordCodec> FocusLogEngine<C> {
    pub fn new(settings: LogSettings, codec: C) -> Self {
        Self { settings, codec }
    }

    pub fn settings(&self) -> &LogSettings {
        &self.settings
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// `<data_dir>/<base>.<ext>`
    pub fn current_path(&self) -> PathBuf {
        self.settings
            .data_dir
            .join(self.settings.file_name(&self.settings.base_name))
    }

    /// `<data_dir>/<base>_<YYYY>_<MM>.<ext>`
    pub fn archive_path(&self, period: Period) -> PathBuf {
        let stem = format!("{}_{}", self.settings.base_name, period.file_suffix());
        self.settings.data_dir.join(self.settings.file_name(&stem))
    }

    /// `<data_dir>/<summary_base>_<YYYY>_<MM>.<ext>`
    pub fn summary_path(&self, period: Period) -> PathBuf {
        let stem = format!("{}_{}", self.settings.summary_base_name, period.file_suffix());
        self.settings.data_dir.join(self.settings.file_name(&stem))
    }

    /// Decide whether `timestamp` belongs to a different period than the
    /// current log. Reads the first row only; a missing or empty log never
    /// rotates.
    pub fn check_rotation(&self, timestamp: &DateTime<FixedOffset>) -> Result<RotationDecision> {
        let path = self.current_path();
        let Some(first) = self.codec.first_record(&path)? else {
            tracing::debug!(path = %path.display(), "no current log, nothing to rotate");
            return Ok(RotationDecision::Keep);
        };

        let policy = self.settings.policy;
        let stored = policy.basis(&first.timestamp);
        let incoming = policy.basis(timestamp);

        if incoming < stored {
            tracing::warn!(
                stored = %stored,
                incoming = %incoming,
                "record is older than the first row of the current log"
            );
        }

        let stored_period = Period::of(&stored);
        if stored_period == Period::of(&incoming) {
            Ok(RotationDecision::Keep)
        } else {
            Ok(RotationDecision::Rotate(stored_period))
        }
    }

    /// Count distinct days per author in the current log and append the
    /// rows to the period's summary file.
    ///
    /// Rows are appended, never merged with earlier rows for the same
    /// period. Must run before `archive`, which removes the log.
    pub fn tally(&self, period: Period) -> Result<Vec<TallyRow>> {
        let records = self.codec.read_records(&self.current_path())?;
        let rows = tally_days(&records, self.settings.policy);

        let summary = self.summary_path(period);
        self.codec.append_tally(&summary, &rows)?;
        tracing::info!(
            period = %period,
            authors = rows.len(),
            path = %summary.display(),
            "tallied focus days"
        );
        Ok(rows)
    }

    /// Copy the current log byte-for-byte to the period's archive, then
    /// remove it. An existing archive is never overwritten.
    pub fn archive(&self, period: Period) -> Result<PathBuf> {
        let source = self.current_path();
        let target = self.archive_path(period);

        let mut input = File::open(&source)?;
        let mut output = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => FocusError::ArchiveExists {
                    path: target.clone(),
                },
                _ => FocusError::Io(e),
            })?;

        let copied = io::copy(&mut input, &mut output).and_then(|n| output.sync_all().map(|_| n));
        let bytes = match copied {
            Ok(n) => n,
            Err(e) => {
                drop(output);
                let _ = fs::remove_file(&target);
                return Err(e.into());
            }
        };

        drop(input);
        drop(output);
        fs::remove_file(&source)?;

        tracing::info!(
            period = %period,
            bytes,
            archive = %target.display(),
            "rotated focus log"
        );
        Ok(target)
    }

    /// Rotate if `record` starts a new period, then append it.
    ///
    /// Order: rotation check, tally (if enabled), archive, append.
    pub fn record_event(&self, record: &FocusRecord) -> Result<RecordOutcome> {
        let rotation = match self.check_rotation(&record.timestamp)? {
            RotationDecision::Keep => None,
            RotationDecision::Rotate(period) => Some(self.rotate(period)?),
        };

        let log_path = self.current_path();
        self.codec.append_record(&log_path, record)?;
        tracing::debug!(author = %record.author, path = %log_path.display(), "appended focus record");

        Ok(RecordOutcome { log_path, rotation })
    }

    fn rotate(&self, period: Period) -> Result<RotationReport> {
        let archive_path = self.archive_path(period);
        if archive_path.exists() {
            return Err(FocusError::ArchiveExists { path: archive_path });
        }

        let (tally, summary_path) = if self.settings.tally {
            (self.tally(period)?, Some(self.summary_path(period)))
        } else {
            (Vec::new(), None)
        };

        let archive_path = self.archive(period)?;
        Ok(RotationReport {
            period,
            archive_path,
            summary_path,
            tally,
        })
    }
}
