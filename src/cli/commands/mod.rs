pub mod init;
pub mod listen;
pub mod record;
pub mod service_helpers;
pub mod status;
pub mod summary;
