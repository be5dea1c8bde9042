pub mod focus_record;
pub mod period;
pub mod policy;
pub mod tally;
