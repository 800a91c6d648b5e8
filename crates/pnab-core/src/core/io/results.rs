use super::output::{DurableFile, OutputError};
use crate::core::models::results::{COLUMN_COUNT, COLUMN_HEADER, ConformerRecord};
use std::path::Path;
use tracing::warn;

/// Append-only writer for the results table.
#[derive(Debug)]
pub struct ResultsWriter {
    file: DurableFile,
}

impl ResultsWriter {
    pub fn create(path: &Path, timestamp: &str) -> Result<Self, OutputError> {
        let mut file = DurableFile::create(path)?;
        file.append(format!("# {timestamp}\n").as_bytes())?;
        Ok(Self { file })
    }

    /// Appends one configuration's block: its header comment, the column header
    /// comment, and its rows. An empty `rows` slice writes nothing.
    pub fn append(&mut self, header: &str, rows: &[ConformerRecord]) -> Result<(), OutputError> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut buffer = format!("# {header}\n# {COLUMN_HEADER}\n").into_bytes();
        encode_rows(self.file.path(), rows, &mut buffer)?;
        self.file.append(&buffer)
    }
}

/// Writes the ranked summary table.
pub fn write_summary(
    path: &Path,
    timestamp: &str,
    rows: &[ConformerRecord],
) -> Result<(), OutputError> {
    let mut file = DurableFile::create(path)?;
    let mut buffer = format!("# {timestamp}\n# {COLUMN_HEADER}\n").into_bytes();
    encode_rows(path, rows, &mut buffer)?;
    file.append(&buffer)
}

/// Reads every complete row of a results table.
///
/// Comment lines are skipped. Rows that do not have exactly the expected number
/// of numeric fields (for example a line cut short by an interrupted write) are
/// skipped with a warning.
pub fn read_results(path: &Path) -> Result<Vec<ConformerRecord>, OutputError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| OutputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable results row.");
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != COLUMN_COUNT {
            warn!(
                path = %path.display(),
                line,
                fields = record.len(),
                "Skipping incomplete results row."
            );
            continue;
        }
        match record.deserialize::<ConformerRecord>(None) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(path = %path.display(), line, error = %e, "Skipping malformed results row.");
            }
        }
    }
    Ok(rows)
}

fn encode_rows(
    path: &Path,
    rows: &[ConformerRecord],
    buffer: &mut Vec<u8>,
) -> Result<(), OutputError> {
    let csv_error = |source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(buffer);
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| OutputError::io(path, e))
}
