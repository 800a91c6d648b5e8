use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode or decode rows of '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to encode prefix index entry: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to move '{from}' aside to '{to}': {source}")]
    Rotate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OutputError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Local wall-clock time as written in output comment lines.
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Moves an existing file out of the way by prefixing its name with `_`.
///
/// The prefix is repeated until a name that does not exist yet is found, so
/// earlier rotations are never overwritten.
///
/// # Return
///
/// The new location of the file, or `None` if there was nothing to move.
///
/// # Errors
///
/// Returns [`OutputError::Rotate`] if the rename fails.
pub fn rotate_aside(path: &Path) -> Result<Option<PathBuf>, OutputError> {
    if !path.exists() {
        return Ok(None);
    }
    let file_name = path.file_name().ok_or_else(|| {
        OutputError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;

    let mut candidate_name = OsString::from("_");
    candidate_name.push(file_name);
    let mut candidate = path.with_file_name(&candidate_name);
    while candidate.exists() {
        let mut longer = OsString::from("_");
        longer.push(&candidate_name);
        candidate_name = longer;
        candidate = path.with_file_name(&candidate_name);
    }

    fs::rename(path, &candidate).map_err(|source| OutputError::Rotate {
        from: path.to_path_buf(),
        to: candidate.clone(),
        source,
    })?;
    Ok(Some(candidate))
}

/// A freshly created output file whose every append reaches the disk.
#[derive(Debug)]
pub(crate) struct DurableFile {
    path: PathBuf,
    file: File,
}

impl DurableFile {
    /// Creates the file, failing if something already exists at `path`.
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| OutputError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Writes `bytes` in a single call and syncs the data to disk.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.file
            .write_all(bytes)
            .and_then(|()| self.file.sync_data())
            .map_err(|e| OutputError::io(&self.path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rotation_prefixes_underscores_until_free() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, "third").unwrap();
        fs::write(dir.path().join("_results.csv"), "second").unwrap();
        fs::write(dir.path().join("__results.csv"), "first").unwrap();

        let moved = rotate_aside(&path).unwrap().unwrap();
        assert_eq!(moved, dir.path().join("___results.csv"));
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(moved).unwrap(), "third");
        assert_eq!(
            fs::read_to_string(dir.path().join("_results.csv")).unwrap(),
            "second"
        );
    }

    #[test]
    fn rotation_of_missing_file_is_a_no_op() {
        let dir = tempdir().unwrap();
        assert_eq!(rotate_aside(&dir.path().join("summary.csv")).unwrap(), None);
    }

    #[test]
    fn durable_file_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefix.yaml");
        let mut file = DurableFile::create(&path).unwrap();
        file.append(b"# now\n").unwrap();
        assert!(DurableFile::create(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# now\n");
    }

    #[test]
    fn timestamp_has_date_and_time() {
        let ts = timestamp();
        assert_eq!(ts.len(), "2024-01-01 00:00:00".len());
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }
}
