use std::path::PathBuf;

/// All domain errors for focuslog.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    #[error(
        "Malformed row {row} in {path}: {detail}\n\n  \
         Expected format: author,timestamp,message (one per line, no header).\n  \
         Fix or remove the row by hand, then try again."
    )]
    MalformedRecord {
        path: PathBuf,
        row: usize,
        detail: String,
    },

    #[error(
        "Invalid timestamp '{value}': {detail}\n\n  \
         Expected ISO 8601, e.g. 2022-10-01T06:59:00-07:00 or 2022-10-01T13:59:00"
    )]
    MalformedTimestamp { value: String, detail: String },

    #[error(
        "Archive already exists: {path}\n\n  \
         Refusing to overwrite an archived period. The current log was left untouched.\n\n  \
         Solutions:\n    \
         → Move or merge the existing archive by hand\n    \
         → Then record again to retry the rotation"
    )]
    ArchiveExists { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "Live status check failed: {reason}\n\n  \
         Nothing was recorded. Check ACCESS_TOKEN / CLIENT_ID and your network."
    )]
    LivenessCheckFailed { reason: String },

    #[error("Chat connection error: {reason}")]
    ChatError { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FocusError>;
