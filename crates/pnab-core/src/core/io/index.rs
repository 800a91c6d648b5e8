use super::output::{DurableFile, OutputError};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Append-only YAML record of `prefix: header` entries.
#[derive(Debug)]
pub struct PrefixIndexWriter {
    file: DurableFile,
}

impl PrefixIndexWriter {
    pub fn create(path: &Path, timestamp: &str) -> Result<Self, OutputError> {
        let mut file = DurableFile::create(path)?;
        file.append(format!("# {timestamp}\n").as_bytes())?;
        Ok(Self { file })
    }

    pub fn append(&mut self, prefix: &str, header: &str) -> Result<(), OutputError> {
        let mut entry = Mapping::new();
        entry.insert(
            Value::String(prefix.to_string()),
            Value::String(header.to_string()),
        );
        let line = serde_yaml::to_string(&entry)?;
        self.file.append(line.as_bytes())
    }
}

/// Reads the prefix index back in file order.
///
/// Each entry occupies one line; a line that does not parse (such as one cut off
/// by an interrupted write) is skipped with a warning.
pub fn read_prefix_index(path: &Path) -> Result<Vec<(String, String)>, OutputError> {
    let text = fs::read_to_string(path).map_err(|e| OutputError::io(path, e))?;
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match serde_yaml::from_str::<Mapping>(trimmed) {
            Ok(mapping) => {
                entries.extend(
                    mapping
                        .into_iter()
                        .map(|(k, v)| (scalar_to_string(k), scalar_to_string(v))),
                );
            }
            Err(e) => {
                warn!(path = %path.display(), line = number + 1, error = %e, "Skipping unreadable prefix entry.");
            }
        }
    }
    Ok(entries)
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
