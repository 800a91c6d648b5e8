use crate::core::options::{ConfigurationError, OptionCategory, OptionSet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::PathBuf;

/// Structure and connectivity of one backbone unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackboneDescriptor {
    pub file_path: PathBuf,
    pub interconnects: [u32; 2],
    pub linker: [u32; 2],
    #[serde(default)]
    pub fixed_bonds: Vec<[u32; 2]>,
}

/// Search and filtering parameters for the conformer engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeDescriptor {
    pub search_algorithm: String,
    pub num_steps: u64,
    pub dihedral_step: f64,
    pub weighting_temperature: f64,
    pub monte_carlo_temperature: f64,
    pub population_size: u64,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub ff_type: String,
    pub max_distance: f64,
    pub energy_filter: [f64; 5],
    pub strand: Vec<String>,
    pub is_double_stranded: bool,
    pub is_hexad: bool,
    pub strand_orientation: Vec<bool>,
}

/// One nucleobase definition from the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseDescriptor {
    pub name: String,
    pub code: String,
    pub file_path: PathBuf,
    pub linker: [u32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair_name: Option<String>,
}

/// The engine-facing view of a validated option set.
///
/// Built once per sweep; every configuration shares it and only adds its own
/// helical point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptorSet {
    pub runtime: RuntimeDescriptor,
    pub backbone: BackboneDescriptor,
    pub bases: Vec<BaseDescriptor>,
}

impl DescriptorSet {
    pub fn from_options(options: &OptionSet) -> Result<Self, ConfigurationError> {
        Ok(Self {
            runtime: convert(options, OptionCategory::RuntimeParameters)?,
            backbone: convert(options, OptionCategory::Backbone)?,
            bases: options.bases().to_vec(),
        })
    }
}

fn convert<T: DeserializeOwned>(
    options: &OptionSet,
    category: OptionCategory,
) -> Result<T, ConfigurationError> {
    let mapping = options.engine_mapping(category)?;
    serde_yaml::from_value(Value::Mapping(mapping)).map_err(|e| ConfigurationError::Descriptor {
        category: category.name(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::fixtures::{self, Fixture};
    use crate::core::options::validate_all;

    #[test]
    fn descriptors_are_built_from_validated_options() {
        let fixture = Fixture::new();
        let mut doc = fixture.document();
        fixtures::set(&mut doc, "Backbone", "fixed_bonds", "[[3, 4]]");
        fixtures::set(&mut doc, "RuntimeParameters", "ff_type", "mmff94");
        let options = validate_all(&doc, &fixture.context())
            .unwrap()
            .with_nucleobases(fixture.library())
            .unwrap();

        let set = DescriptorSet::from_options(&options).unwrap();
        assert_eq!(set.backbone.interconnects, [10, 1]);
        assert_eq!(set.backbone.linker, [13, 14]);
        assert_eq!(set.backbone.fixed_bonds, vec![[3, 4]]);
        assert_eq!(set.backbone.file_path, fixture.work_dir().join("backbone.pdb"));
        assert_eq!(set.runtime.ff_type, "MMFF94");
        assert_eq!(set.runtime.search_algorithm, "weighted monte carlo search");
        assert_eq!(set.runtime.num_steps, 1_000_000);
        assert_eq!(set.runtime.dihedral_step, 2.0);
        assert_eq!(set.runtime.energy_filter, [2.0, 2.0, 5.0, 0.0, 1e10]);
        assert_eq!(set.runtime.strand, ["G", "C", "A", "T"]);
        assert!(!set.runtime.is_double_stranded);
        assert_eq!(set.bases.len(), fixture.library().len());
    }

    #[test]
    fn unknown_descriptor_fields_fail_loudly() {
        let err = serde_yaml::from_str::<BackboneDescriptor>(
            "{file_path: b.pdb, interconnects: [1, 2], linker: [3, 4], charge: 1}",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }
}
