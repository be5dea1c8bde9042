pub mod static_liveness;
pub mod twitch_liveness;
