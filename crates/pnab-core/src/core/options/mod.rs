//! # Option Schema
//!
//! Declarative validation of the sweep input document.
//!
//! An input document is a nested mapping `category → option → raw value`. The
//! [`catalog`] module holds one static [`OptionSpec`](catalog::OptionSpec) per
//! recognized option: its descriptions, its default (if any), and the field
//! validator from [`validators`] that turns the raw YAML value into a typed
//! [`OptionValue`]. [`validate_all`] walks the catalog uniformly, fills every gap
//! from the defaults, and finally enforces the cross-option rules that no single
//! validator can see.
//!
//! The resulting [`OptionSet`] is always fully populated. Once the nucleobase
//! library has been merged in with [`OptionSet::with_nucleobases`], it is the
//! immutable snapshot every worker of a sweep receives.
//!
//! ## Example
//!
//! ```no_run
//! use pnab::core::options::{validate_all, ValidationContext};
//!
//! let raw: serde_yaml::Value = serde_yaml::from_str(r#"
//! Backbone:
//!   interconnects: [10, 1]
//!   linker: [13, 14]
//! HelicalParameters:
//!   h_twist: [25, 35, 4]
//! RuntimeParameters:
//!   strand: GCAT
//! "#).unwrap();
//!
//! let ctx = ValidationContext::new(".", "/usr/share/pnab");
//! let options = validate_all(&raw, &ctx).unwrap();
//! assert_eq!(options.helical_ranges().configuration_count(), 4);
//! ```

pub mod catalog;
pub mod validators;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::core::library::{LibraryError, NucleobaseLibrary};
use crate::core::models::descriptors::BaseDescriptor;
use crate::core::models::helical::{HelicalAxis, HelicalRange, HelicalRanges};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub use validators::ValidationError;

const DOUBLE_STRAND_CONFLICT: &str =
    "Cannot build double strands for triaminopyrimidine or cyanuric acid";
const HEXAD_CONFLICT: &str = "Cannot build hexads for canonical nucleobases";

/// Top-level sections of the input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OptionCategory {
    Backbone,
    HelicalParameters,
    RuntimeParameters,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 3] = [
        OptionCategory::Backbone,
        OptionCategory::HelicalParameters,
        OptionCategory::RuntimeParameters,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            OptionCategory::Backbone => "Backbone",
            OptionCategory::HelicalParameters => "HelicalParameters",
            OptionCategory::RuntimeParameters => "RuntimeParameters",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated, normalized option value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(u64),
    Float(f64),
    Text(String),
    Path(PathBuf),
    IndexPair([u32; 2]),
    IndexPairs(Vec<[u32; 2]>),
    Range(HelicalRange),
    EnergyFilter([f64; 5]),
    Strand(Vec<String>),
    Flags(Vec<bool>),
}

/// Where relative file references in the input document are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    pub working_dir: PathBuf,
    /// Fallback directory holding the bundled backbones and nucleobases.
    pub data_dir: PathBuf,
}

impl ValidationContext {
    pub fn new(working_dir: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Input document must be a mapping of categories to options")]
    NotAMapping,

    #[error("Category '{0}' must be a mapping of option names to values")]
    CategoryNotAMapping(&'static str),

    #[error("Unknown option category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown option '{option}' in category '{category}'")]
    UnknownOption {
        category: &'static str,
        option: String,
    },

    #[error("Missing required option '{option}' in category '{category}'")]
    MissingOption {
        category: &'static str,
        option: &'static str,
    },

    #[error("Invalid value for '{category}.{option}': {source}")]
    InvalidOption {
        category: &'static str,
        option: &'static str,
        #[source]
        source: ValidationError,
    },

    #[error("{0}")]
    MutuallyExclusive(&'static str),

    #[error("Cannot convert '{category}' options into engine parameters: {reason}")]
    Descriptor {
        category: &'static str,
        reason: String,
    },
}

/// Fully validated options, plus the merged nucleobase descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    values: BTreeMap<OptionCategory, BTreeMap<&'static str, OptionValue>>,
    bases: Vec<BaseDescriptor>,
}

impl OptionSet {
    pub fn get(&self, category: OptionCategory, name: &str) -> Option<&OptionValue> {
        self.values.get(&category).and_then(|m| m.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionCategory, &'static str, &OptionValue)> {
        self.values
            .iter()
            .flat_map(|(c, m)| m.iter().map(move |(n, v)| (*c, *n, v)))
    }

    pub fn flag(&self, category: OptionCategory, name: &str) -> bool {
        matches!(self.get(category, name), Some(OptionValue::Bool(true)))
    }

    pub fn strand(&self) -> &[String] {
        match self.get(OptionCategory::RuntimeParameters, catalog::STRAND) {
            Some(OptionValue::Strand(names)) => names,
            _ => &[],
        }
    }

    pub fn pairs_adenine_with_uracil(&self) -> bool {
        self.flag(OptionCategory::RuntimeParameters, catalog::PAIR_A_U)
    }

    pub fn helical_ranges(&self) -> HelicalRanges {
        let mut ranges = HelicalRanges::default();
        for axis in HelicalAxis::ALL {
            if let Some(OptionValue::Range(range)) =
                self.get(OptionCategory::HelicalParameters, axis.key())
            {
                ranges.set(axis, *range);
            }
        }
        ranges
    }

    pub fn bases(&self) -> &[BaseDescriptor] {
        &self.bases
    }

    /// Merges the nucleobase library, applying the A–U pairing override first.
    pub fn with_nucleobases(mut self, library: NucleobaseLibrary) -> Result<Self, LibraryError> {
        let library = if self.pairs_adenine_with_uracil() {
            library.with_adenine_uracil_pairing()?
        } else {
            library
        };
        self.bases = library.into_descriptors();
        debug!(bases = self.bases.len(), "Merged nucleobase library.");
        Ok(self)
    }

    /// The options of `category` that are handed to the engine, as a YAML mapping.
    pub(crate) fn engine_mapping(
        &self,
        category: OptionCategory,
    ) -> Result<Mapping, ConfigurationError> {
        let mut mapping = Mapping::new();
        let Some(values) = self.values.get(&category) else {
            return Ok(mapping);
        };
        for (name, value) in values {
            if catalog::lookup(category, name).is_some_and(|s| !s.forwarded) {
                continue;
            }
            let value =
                serde_yaml::to_value(value).map_err(|e| ConfigurationError::Descriptor {
                    category: category.name(),
                    reason: e.to_string(),
                })?;
            mapping.insert(Value::String((*name).to_string()), value);
        }
        Ok(mapping)
    }

    fn insert(&mut self, category: OptionCategory, name: &'static str, value: OptionValue) {
        self.values.entry(category).or_default().insert(name, value);
    }
}

/// Validates a raw input document against the option catalog.
///
/// Missing categories and options are filled from defaults; a missing option
/// without a default, an unknown category or option, or a rejected value fails
/// the whole document. Cross-option rules are checked last.
pub fn validate_all(raw: &Value, ctx: &ValidationContext) -> Result<OptionSet, ConfigurationError> {
    let document = raw.as_mapping().ok_or(ConfigurationError::NotAMapping)?;

    for key in document.keys() {
        let name = key_name(key);
        if OptionCategory::from_name(&name).is_none() {
            return Err(ConfigurationError::UnknownCategory(name));
        }
    }

    let mut set = OptionSet::default();
    for entry in &catalog::CATALOG {
        let category = entry.category;
        let section = match document.get(category.name()) {
            None | Some(Value::Null) => None,
            Some(Value::Mapping(section)) => Some(section),
            Some(_) => return Err(ConfigurationError::CategoryNotAMapping(category.name())),
        };

        if let Some(section) = section {
            for key in section.keys() {
                let name = key_name(key);
                if catalog::lookup(category, &name).is_none() {
                    return Err(ConfigurationError::UnknownOption {
                        category: category.name(),
                        option: name,
                    });
                }
            }
        }

        for spec in entry.options {
            let invalid = |source| ConfigurationError::InvalidOption {
                category: category.name(),
                option: spec.name,
                source,
            };
            let value = match section.and_then(|s| s.get(spec.name)) {
                Some(value) => value.clone(),
                None => match spec.default {
                    Some(text) => parse_default(text).map_err(invalid)?,
                    None => {
                        return Err(ConfigurationError::MissingOption {
                            category: category.name(),
                            option: spec.name,
                        });
                    }
                },
            };
            let validated = (spec.validator)(&value, ctx).map_err(invalid)?;
            set.insert(category, spec.name, validated);
        }
    }

    check_exclusions(&set)?;
    Ok(set)
}

fn check_exclusions(set: &OptionSet) -> Result<(), ConfigurationError> {
    let runtime = OptionCategory::RuntimeParameters;
    let strand = set.strand();
    if set.flag(runtime, catalog::IS_DOUBLE_STRANDED) && validators::has_noncanonical(strand) {
        return Err(ConfigurationError::MutuallyExclusive(DOUBLE_STRAND_CONFLICT));
    }
    if set.flag(runtime, catalog::IS_HEXAD) && validators::has_canonical(strand) {
        return Err(ConfigurationError::MutuallyExclusive(HEXAD_CONFLICT));
    }
    Ok(())
}

fn parse_default(text: &str) -> Result<Value, ValidationError> {
    serde_yaml::from_str(text).map_err(|e| ValidationError::Unparsable {
        text: text.to_string(),
        reason: e.to_string(),
    })
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(name) => name.clone(),
        other => validators::describe(other),
    }
}
