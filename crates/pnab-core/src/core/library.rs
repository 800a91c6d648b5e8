use crate::core::models::descriptors::BaseDescriptor;
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the nucleobase library inside the data directory.
pub const LIBRARY_FILE_NAME: &str = "bases_library.yaml";

const ADENINE_ENTRY: &str = "Base A";

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Failed to read nucleobase library '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid nucleobase library: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid entry '{entry}' in nucleobase library: {source}")]
    Entry {
        entry: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Nucleobase library has no entry '{0}'")]
    MissingBase(&'static str),
}

/// The bundled nucleobase definitions, keyed by entry name (`Base A`, ...).
///
/// Entries keep their document order and their structure files are resolved
/// against the data directory the library was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct NucleobaseLibrary {
    entries: Vec<(String, BaseDescriptor)>,
}

impl NucleobaseLibrary {
    pub fn load(data_dir: &Path) -> Result<Self, LibraryError> {
        let path = data_dir.join(LIBRARY_FILE_NAME);
        let text = fs::read_to_string(&path).map_err(|source| LibraryError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_yaml_str(&text, data_dir)
    }

    pub fn from_yaml_str(text: &str, data_dir: &Path) -> Result<Self, LibraryError> {
        let raw: Mapping = serde_yaml::from_str(text)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let entry = match key {
                serde_yaml::Value::String(name) => name,
                other => serde_yaml::to_string(&other)?.trim().to_string(),
            };
            let mut base: BaseDescriptor =
                serde_yaml::from_value(value).map_err(|source| LibraryError::Entry {
                    entry: entry.clone(),
                    source,
                })?;
            base.file_path = data_dir.join(&base.file_path);
            entries.push((entry, base));
        }
        Ok(Self { entries })
    }

    /// Pairs adenine with uracil instead of thymine.
    pub fn with_adenine_uracil_pairing(mut self) -> Result<Self, LibraryError> {
        let (_, adenine) = self
            .entries
            .iter_mut()
            .find(|(name, _)| name == ADENINE_ENTRY)
            .ok_or(LibraryError::MissingBase(ADENINE_ENTRY))?;
        adenine.pair_name = Some("U".to_string());
        Ok(self)
    }

    pub fn get(&self, entry: &str) -> Option<&BaseDescriptor> {
        self.entries
            .iter()
            .find(|(name, _)| name == entry)
            .map(|(_, base)| base)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_descriptors(self) -> Vec<BaseDescriptor> {
        self.entries.into_iter().map(|(_, base)| base).collect()
    }
}
