//! CSV file dataset adapter.
//!
//! Headers are trimmed, known numeric columns are coerced (unparsable cells
//! become missing), everything else is kept as text.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::{debug, info, warn};

use crate::domain::dataset::Dataset;
use crate::domain::error::LakaspiacError;
use crate::domain::record::{Column, PropertyRecord};
use crate::ports::dataset_port::DatasetPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvAdapter;

/// Where each source column goes.
enum Slot {
    Known(Column),
    Text(usize),
    Ignored,
}

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse CSV from any reader. `origin` names the source in errors.
    pub fn read_from<R: Read>(&self, reader: R, origin: &str) -> Result<Dataset, LakaspiacError> {
        let malformed = |reason: String| LakaspiacError::MalformedInput {
            path: origin.to_string(),
            reason,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| malformed(format!("cannot read header row: {e}")))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut columns = BTreeSet::new();
        let mut text_columns = Vec::new();
        let mut slots = Vec::with_capacity(headers.len());
        for header in &headers {
            let slot = match Column::from_header(header) {
                Some(column) => {
                    if columns.insert(column) {
                        Slot::Known(column)
                    } else {
                        warn!("{origin}: duplicate column {header:?}, keeping the first one");
                        Slot::Ignored
                    }
                }
                None => {
                    text_columns.push(header.clone());
                    Slot::Text(text_columns.len() - 1)
                }
            };
            slots.push(slot);
        }

        for required in [Column::Year, Column::District] {
            if !columns.contains(&required) {
                return Err(malformed(format!("missing required column {required}")));
            }
        }
        for column in Column::canonical() {
            if !column.is_required() && !columns.contains(&column) {
                debug!("{origin}: optional column {column:?} not present");
            }
        }

        let mut records = Vec::new();
        for (row_no, result) in rdr.records().enumerate() {
            let row = result.map_err(|e| malformed(format!("row {}: {e}", row_no + 1)))?;
            // Short rows leave trailing cells missing. Extra fields have no column.
            if row.len() > headers.len() {
                return Err(malformed(format!(
                    "row {}: {} fields, header has {}",
                    row_no + 1,
                    row.len(),
                    headers.len()
                )));
            }
            let mut record = PropertyRecord {
                text: vec![String::new(); text_columns.len()],
                ..Default::default()
            };
            for (slot, raw) in slots.iter().zip(row.iter()) {
                match slot {
                    Slot::Known(column) => record.set_cell(*column, raw),
                    Slot::Text(i) => record.text[*i] = raw.to_string(),
                    Slot::Ignored => {}
                }
            }
            records.push(record);
        }

        info!(
            "loaded {} rows from {origin} ({} known columns, {} text columns)",
            records.len(),
            columns.len(),
            text_columns.len()
        );
        Ok(Dataset::new(records, headers, columns, text_columns))
    }
}

impl DatasetPort for CsvAdapter {
    fn load(&self, path: &Path) -> Result<Dataset, LakaspiacError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LakaspiacError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LakaspiacError::Io(e),
        })?;
        self.read_from(io::BufReader::new(file), &path.display().to_string())
    }
}
