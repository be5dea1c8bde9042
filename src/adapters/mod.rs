pub mod chat;
pub mod codecs;
pub mod liveness;
pub mod parsers;
