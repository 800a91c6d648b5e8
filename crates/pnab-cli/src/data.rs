use crate::error::{CliError, Result};
use directories::ProjectDirs;
use pnab::core::library::LIBRARY_FILE_NAME;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PATH_CONFIG_FILE: &str = "path.conf";

/// Locates the data directory that input files and the nucleobase library
/// fall back to.
#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn library_path(&self) -> PathBuf {
        self.base_path.join(LIBRARY_FILE_NAME)
    }

    pub fn has_library(&self) -> bool {
        self.library_path().is_file()
    }

    pub fn set_custom_path(path: &Path) -> Result<PathBuf> {
        let absolute = std::path::absolute(path)?;
        write_custom_path(&Self::get_path_config_file()?, &absolute)?;
        Ok(absolute)
    }

    pub fn reset_path() -> Result<()> {
        let config_path = Self::get_path_config_file()?;
        if config_path.exists() {
            fs::remove_file(config_path)?;
        }
        Ok(())
    }

    fn determine_data_path() -> Result<PathBuf> {
        match read_custom_path(&Self::get_path_config_file()?)? {
            Some(path) => Ok(path),
            None => Self::get_default_data_path(),
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("edu", "caltech", "pnab").ok_or_else(|| {
            CliError::Data("Could not determine the user's home directory.".to_string())
        })
    }

    fn get_path_config_file() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join(PATH_CONFIG_FILE))
    }

    fn get_default_data_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }
}

fn read_custom_path(config_file: &Path) -> Result<Option<PathBuf>> {
    if !config_file.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(config_file)?;
    let text = text.trim();
    if text.is_empty() {
        warn!("Custom path config file is empty, falling back to default path.");
        return Ok(None);
    }
    Ok(Some(PathBuf::from(text)))
}

fn write_custom_path(config_file: &Path, data_path: &Path) -> Result<()> {
    if let Some(parent) = config_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_file, data_path.to_string_lossy().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn custom_path_round_trips_through_the_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("nested").join(PATH_CONFIG_FILE);
        let data = dir.path().join("data");

        assert_eq!(read_custom_path(&config).unwrap(), None);
        write_custom_path(&config, &data).unwrap();
        assert_eq!(read_custom_path(&config).unwrap(), Some(data));
    }

    #[test]
    fn blank_config_file_falls_back() {
        let dir = tempdir().unwrap();
        let config = dir.path().join(PATH_CONFIG_FILE);
        fs::write(&config, "  \n").unwrap();
        assert_eq!(read_custom_path(&config).unwrap(), None);
    }

    #[test]
    fn library_is_looked_up_in_the_data_directory() {
        let dir = tempdir().unwrap();
        let manager = DataManager {
            base_path: dir.path().to_path_buf(),
        };
        assert_eq!(manager.library_path(), dir.path().join(LIBRARY_FILE_NAME));
        assert!(!manager.has_library());

        fs::write(manager.library_path(), "{}").unwrap();
        assert!(manager.has_library());
    }
}
