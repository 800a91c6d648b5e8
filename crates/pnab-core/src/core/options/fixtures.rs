//! Shared on-disk fixtures for option, descriptor, and sweep tests.

use super::{OptionSet, ValidationContext, validate_all};
use crate::core::library::{LIBRARY_FILE_NAME, NucleobaseLibrary};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DOCUMENT: &str = r#"
Backbone:
  interconnects: [10, 1]
  linker: [13, 14]
RuntimeParameters:
  strand: GCAT
"#;

const LIBRARY: &str = r#"
Base A: {name: Adenine, code: A, file_path: adenine.pdb, linker: [5, 11], pair_name: T}
Base G: {name: Guanine, code: G, file_path: guanine.pdb, linker: [5, 11], pair_name: C}
Base C: {name: Cytosine, code: C, file_path: cytosine.pdb, linker: [3, 9], pair_name: G}
Base T: {name: Thymine, code: T, file_path: thymine.pdb, linker: [3, 9], pair_name: A}
Base U: {name: Uracil, code: U, file_path: uracil.pdb, linker: [3, 9], pair_name: A}
Base X: {name: Triaminopyrimidine, code: X, file_path: triaminopyrimidine.pdb, linker: [1, 2]}
Base Y: {name: Cyanuric acid, code: Y, file_path: cyanuric_acid.pdb, linker: [1, 2]}
"#;

pub struct Fixture {
    work: TempDir,
    data: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let work = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        fs::write(work.path().join("backbone.pdb"), "END\n").unwrap();
        fs::write(data.path().join(LIBRARY_FILE_NAME), LIBRARY).unwrap();
        Self { work, data }
    }

    pub fn work_dir(&self) -> &Path {
        self.work.path()
    }

    pub fn data_dir(&self) -> &Path {
        self.data.path()
    }

    pub fn context(&self) -> ValidationContext {
        ValidationContext::new(self.work_dir(), self.data_dir())
    }

    pub fn document(&self) -> Value {
        serde_yaml::from_str(DOCUMENT).unwrap()
    }

    pub fn library(&self) -> NucleobaseLibrary {
        NucleobaseLibrary::load(self.data_dir()).unwrap()
    }

    /// Validates `doc` and merges the nucleobase library.
    pub fn options_from(&self, doc: &Value) -> OptionSet {
        validate_all(doc, &self.context())
            .unwrap()
            .with_nucleobases(self.library())
            .unwrap()
    }

    pub fn options(&self) -> OptionSet {
        self.options_from(&self.document())
    }
}

/// Sets `category.option` to the YAML value written in `value`.
pub fn set(doc: &mut Value, category: &str, option: &str, value: &str) {
    let root = doc.as_mapping_mut().unwrap();
    let section = root
        .entry(Value::String(category.to_string()))
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    section.as_mapping_mut().unwrap().insert(
        Value::String(option.to_string()),
        serde_yaml::from_str(value).unwrap(),
    );
}

pub fn remove(doc: &mut Value, category: &str, option: &str) {
    if let Some(section) = doc.get_mut(category).and_then(Value::as_mapping_mut) {
        section.remove(option);
    }
}
