use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use crate::core::errors::{FocusError, Result};
use crate::core::models::focus_record::{FocusRecord, format_timestamp, parse_timestamp};
use crate::core::models::tally::TallyRow;
use crate::core::traits::record_codec::RecordCodec;

/// Reads and writes logs as comma-separated rows without a header.
///
/// Log rows are `author,timestamp,message`; summary rows are
/// `author,days`. Fields containing commas, quotes or newlines are
/// quoted with doubled inner quotes:
/// ```text
/// mr bear,2022-10-01T06:59:00-07:00,"Doing it, and doing it well."
/// ```
pub struct CsvCodec;

impl CsvCodec {
    /// Open a file for reading, mapping "not found" to `None`.
    fn open_existing(path: &Path) -> Result<Option<File>> {
        match File::open(path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn reader(file: File) -> csv::Reader<File> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file)
    }

    fn appender(path: &Path) -> Result<csv::Writer<File>> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(csv::WriterBuilder::new().has_headers(false).from_writer(file))
    }

    /// Decode one stored row into a record. `row` is 1-based.
    fn decode(path: &Path, row: usize, fields: &csv::StringRecord) -> Result<FocusRecord> {
        if fields.len() != 3 {
            return Err(FocusError::MalformedRecord {
                path: path.to_path_buf(),
                row,
                detail: format!("expected 3 fields, found {}", fields.len()),
            });
        }

        let timestamp = parse_timestamp(&fields[1]).map_err(|e| FocusError::MalformedRecord {
            path: path.to_path_buf(),
            row,
            detail: match e {
                FocusError::MalformedTimestamp { value, detail } => {
                    format!("bad timestamp '{value}': {detail}")
                }
                other => other.to_string(),
            },
        })?;

        Ok(FocusRecord {
            author: fields[0].to_string(),
            timestamp,
            message: fields[2].to_string(),
        })
    }
}

/// Map a csv error to the domain error, keeping IO failures as IO.
fn csv_error(path: &Path, row: usize, e: csv::Error) -> FocusError {
    if e.is_io_error() {
        return match e.into_kind() {
            csv::ErrorKind::Io(io) => FocusError::Io(io),
            other => FocusError::MalformedRecord {
                path: path.to_path_buf(),
                row,
                detail: format!("{other:?}"),
            },
        };
    }
    FocusError::MalformedRecord {
        path: path.to_path_buf(),
        row,
        detail: e.to_string(),
    }
}

impl RecordCodec for CsvCodec {
    fn first_record(&self, path: &Path) -> Result<Option<FocusRecord>> {
        let Some(file) = Self::open_existing(path)? else {
            return Ok(None);
        };

        let mut reader = Self::reader(file);
        match reader.records().next() {
            None => Ok(None),
            Some(fields) => {
                let fields = fields.map_err(|e| csv_error(path, 1, e))?;
                Self::decode(path, 1, &fields).map(Some)
            }
        }
    }

    fn read_records(&self, path: &Path) -> Result<Vec<FocusRecord>> {
        let Some(file) = Self::open_existing(path)? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (idx, fields) in Self::reader(file).records().enumerate() {
            let row = idx + 1;
            let fields = fields.map_err(|e| csv_error(path, row, e))?;
            records.push(Self::decode(path, row, &fields)?);
        }
        Ok(records)
    }

    fn append_record(&self, path: &Path, record: &FocusRecord) -> Result<()> {
        let mut writer = Self::appender(path)?;
        let timestamp = format_timestamp(&record.timestamp);
        writer
            .write_record([record.author.as_str(), timestamp.as_str(), record.message.as_str()])
            .map_err(|e| csv_error(path, 0, e))?;
        writer.flush()?;
        Ok(())
    }

    fn append_tally(&self, path: &Path, rows: &[TallyRow]) -> Result<()> {
        let mut writer = Self::appender(path)?;
        for row in rows {
            writer.serialize(row).map_err(|e| csv_error(path, 0, e))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read_tally(&self, path: &Path) -> Result<Vec<TallyRow>> {
        let Some(file) = Self::open_existing(path)? else {
            return Ok(Vec::new());
        };

        let mut reader = Self::reader(file);
        reader
            .deserialize::<TallyRow>()
            .enumerate()
            .map(|(idx, row)| row.map_err(|e| csv_error(path, idx + 1, e)))
            .collect()
    }
}
