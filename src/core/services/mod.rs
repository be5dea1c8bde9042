pub mod focus_log_engine;
pub mod focus_service;
