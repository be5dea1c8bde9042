use crate::core::errors::Result;

/// Port answering "is the stream live right now?".
///
/// Queried by the caller before any record reaches the log engine.
/// Implementations live in `adapters::liveness`.
pub trait LivenessOracle: Send + Sync {
    fn is_source_active(&self) -> Result<bool>;

    /// Human-readable name of this oracle (e.g. "twitch", "always").
    fn name(&self) -> &str;
}

impl<T: LivenessOracle + ?Sized> LivenessOracle for Box<T> {
    fn is_source_active(&self) -> Result<bool> {
        (**self).is_source_active()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
