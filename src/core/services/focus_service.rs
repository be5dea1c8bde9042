use crate::core::errors::Result;
use crate::core::models::focus_record::FocusRecord;
use crate::core::services::focus_log_engine::{FocusLogEngine, RecordOutcome};
use crate::core::traits::liveness::LivenessOracle;
use crate::core::traits::record_codec::RecordCodec;

/// What happened to a submitted focus event.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Recorded(RecordOutcome),
    /// The stream was offline; the log was not touched.
    Offline,
}

/// Gates focus events on the stream being live before they reach the log.
pub struct FocusService<C: RecordCodec, L: LivenessOracle> {
    pub engine: FocusLogEngine<C>,
    pub oracle: L,
}

impl<C: RecordCodec, L: LivenessOracle> FocusService<C, L> {
    pub fn new(engine: FocusLogEngine<C>, oracle: L) -> Self {
        Self { engine, oracle }
    }

    /// Record `record` if the stream is live.
    ///
    /// An oracle failure is returned as-is and nothing is written.
    pub fn submit(&self, record: &FocusRecord) -> Result<Submission> {
        if !self.oracle.is_source_active()? {
            tracing::info!(
                author = %record.author,
                oracle = self.oracle.name(),
                "stream offline, focus not recorded"
            );
            return Ok(Submission::Offline);
        }

        self.engine.record_event(record).map(Submission::Recorded)
    }
}
