//! CSV report writer.
//!
//! The header row is always written, so an empty result still produces a
//! valid table.

use crate::error::Result;
use crate::record::OutputRow;
use std::io;
use std::path::Path;
use tracing::info;

/// Write `rows` as CSV (header first) to any writer.
pub fn write_csv<W: io::Write>(writer: W, rows: &[OutputRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(OutputRow::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `rows` to a CSV file at `path`, replacing it if present.
pub fn save_csv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(io::BufWriter::new(file), rows)?;
    info!(path = %path.display(), rows = rows.len(), "Saved CSV report");
    Ok(())
}

/// Read a report written by [`save_csv`] back into rows.
pub fn read_csv(path: &Path) -> Result<Vec<OutputRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
