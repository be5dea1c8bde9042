use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::core::errors::{FocusError, Result};

/// A calendar month, the unit a log is rotated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn of(basis: &NaiveDateTime) -> Self {
        Self {
            year: basis.year(),
            month: basis.month(),
        }
    }

    /// Parse `YYYY-MM` (also accepts `YYYY_MM`).
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('_', "-");
        NaiveDate::parse_from_str(&format!("{normalized}-01"), "%Y-%m-%d")
            .map(|d| Self {
                year: d.year(),
                month: d.month(),
            })
            .map_err(|_| FocusError::InvalidConfig {
                detail: format!("Invalid period '{s}'. Expected YYYY-MM, e.g. 2022-09"),
            })
    }

    /// File-name suffix: `YYYY_MM` with a zero-padded month.
    pub fn file_suffix(&self) -> String {
        format!("{}_{:02}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
