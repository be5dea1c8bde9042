use crate::core::errors::Result;
use crate::core::traits::liveness::LivenessOracle;

/// Oracle with a fixed answer, for offline use and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticLiveness {
    live: bool,
}

impl StaticLiveness {
    pub fn always() -> Self {
        Self { live: true }
    }

    pub fn never() -> Self {
        Self { live: false }
    }
}

impl LivenessOracle for StaticLiveness {
    fn is_source_active(&self) -> Result<bool> {
        Ok(self.live)
    }

    fn name(&self) -> &str {
        if self.live { "always" } else { "never" }
    }
}
