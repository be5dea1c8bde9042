use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// How timestamps are normalized before their year/month (or calendar day)
/// is compared.
///
/// Both the rotation check and the tally step use the same policy, so a
/// record is always attributed to the same period it was rotated under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeComparisonPolicy {
    /// Shift the wall-clock time by the timestamp's own UTC offset.
    ///
    /// `2022-10-01T06:59:00-07:00` compares as `2022-09-30T23:59:00`.
    #[default]
    LocalOffset,
    /// Compare the wall-clock fields as stored, with no adjustment.
    ///
    /// Callers must supply naive or UTC timestamps consistently.
    NaiveOrUtc,
}

impl TimeComparisonPolicy {
    /// Project `ts` onto the comparison basis.
    pub fn basis(&self, ts: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            Self::LocalOffset => {
                let shift = TimeDelta::seconds(i64::from(ts.offset().local_minus_utc()));
                ts.naive_local() + shift
            }
            Self::NaiveOrUtc => ts.naive_local(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalOffset => "local_offset",
            Self::NaiveOrUtc => "naive_or_utc",
        }
    }
}
