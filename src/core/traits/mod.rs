pub mod liveness;
pub mod record_codec;
