use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::focus_record::FocusRecord;
use crate::core::models::tally::TallyRow;

/// Port for reading and writing log and summary files.
///
/// Every call opens, uses and closes its file; no handle outlives a call.
/// A missing file is "no data", never an error.
pub trait RecordCodec: Send + Sync {
    /// Read only the first record of the log, if any.
    fn first_record(&self, path: &Path) -> Result<Option<FocusRecord>>;

    /// Read every record of the log, in file order.
    fn read_records(&self, path: &Path) -> Result<Vec<FocusRecord>>;

    /// Append one record, creating the file if needed.
    fn append_record(&self, path: &Path, record: &FocusRecord) -> Result<()>;

    /// Append tally rows to a summary file, creating it if needed.
    fn append_tally(&self, path: &Path, rows: &[TallyRow]) -> Result<()>;

    /// Read every tally row of a summary file.
    fn read_tally(&self, path: &Path) -> Result<Vec<TallyRow>>;
}
