use super::validators::{self, ValidationError};
use super::{OptionCategory, OptionValue, ValidationContext};
use serde_yaml::Value;
use std::fmt;

pub type Validator = fn(&Value, &ValidationContext) -> Result<OptionValue, ValidationError>;

pub const STRAND: &str = "strand";
pub const IS_DOUBLE_STRANDED: &str = "is_double_stranded";
pub const IS_HEXAD: &str = "is_hexad";
pub const PAIR_A_U: &str = "pair_A_U";

/// Static metadata and validation rule for one recognized option.
#[derive(Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub long_description: &'static str,
    /// Default written as YAML text; `None` marks the option as required.
    pub default: Option<&'static str>,
    /// `false` for options the driver consumes itself instead of handing to the engine.
    pub forwarded: bool,
    pub validator: Validator,
}

impl OptionSpec {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("forwarded", &self.forwarded)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub category: OptionCategory,
    pub options: &'static [OptionSpec],
}

const fn spec(
    name: &'static str,
    description: &'static str,
    long_description: &'static str,
    default: Option<&'static str>,
    validator: Validator,
) -> OptionSpec {
    OptionSpec {
        name,
        description,
        long_description,
        default,
        forwarded: true,
        validator,
    }
}

const HELICAL_LONG: &str = "A single value or a [low, high, steps] range. For a range, `steps` \
random values are drawn uniformly between the bounds and every combination across the six \
axes becomes one configuration.";

const HELICAL_DEFAULT: Option<&str> = Some("[0.0, 0.0, 1]");

static BACKBONE: [OptionSpec; 4] = [
    spec(
        "file_path",
        "Path to the backbone structure file",
        "Three-dimensional structure of one backbone unit (for example a PDB file). It must \
         include hydrogen atoms and no nucleobase atoms.",
        Some("backbone.pdb"),
        validators::input_file,
    ),
    spec(
        "interconnects",
        "Two atoms connecting to the neighboring backbones",
        "The two atoms that bond this backbone unit to the previous and next units. Extra \
         hydrogens on these atoms are removed; their order sets the backbone direction.",
        None,
        validators::atom_index_pair,
    ),
    spec(
        "linker",
        "Two atoms forming the vector to the base",
        "The two atoms defining the bond vector from the backbone to the nucleobase. The \
         terminal atom is removed when the bond to the base is formed.",
        None,
        validators::atom_index_pair,
    ),
    spec(
        "fixed_bonds",
        "Atom pairs of rotatable bonds held fixed",
        "Each entry names the two central atoms of a dihedral that is excluded from the \
         conformer search.",
        Some("[]"),
        validators::atom_index_pairs,
    ),
];

static HELICAL: [OptionSpec; 6] = [
    spec(
        "h_twist",
        "Helical twist (degree)",
        HELICAL_LONG,
        HELICAL_DEFAULT,
        validators::helical_range,
    ),
    spec(
        "inclination",
        "Inclination (degree)",
        HELICAL_LONG,
        HELICAL_DEFAULT,
        validators::helical_range,
    ),
    spec(
        "tip",
        "Tip (degree)",
        HELICAL_LONG,
        HELICAL_DEFAULT,
        validators::helical_range,
    ),
    spec(
        "h_rise",
        "Helical rise (Angstrom)",
        HELICAL_LONG,
        HELICAL_DEFAULT,
        validators::helical_range,
    ),
    spec(
        "x_displacement",
        "X-displacement (Angstrom)",
        HELICAL_LONG,
        HELICAL_DEFAULT,
        validators::helical_range,
    ),
    spec(
        "y_displacement",
        "Y-displacement (Angstrom)",
        HELICAL_LONG,
        HELICAL_DEFAULT,
        validators::helical_range,
    ),
];

static RUNTIME: [OptionSpec; 16] = [
    spec(
        "search_algorithm",
        "Dihedral search algorithm",
        "Monte Carlo, random, genetic algorithm, or systematic search, optionally weighted. \
         Weighted variants draw each dihedral from a Boltzmann distribution of its torsional \
         energy instead of a uniform one.",
        Some("weighted monte carlo search"),
        validators::lowercase_text,
    ),
    spec(
        "num_steps",
        "Number of search iterations",
        "Iterations (generations for the genetic algorithm) spent searching dihedral angles. \
         Backbones with more rotatable bonds need more.",
        Some("1000000"),
        validators::non_negative_integer,
    ),
    spec(
        "dihedral_step",
        "Dihedral step for systematic search (degree)",
        "Systematic search visits (360/step)^(rotatable bonds) points.",
        Some("2"),
        validators::float,
    ),
    spec(
        "weighting_temperature",
        "Weighting temperature (K)",
        "Temperature of the Boltzmann weighting applied to dihedral angles.",
        Some("298.0"),
        validators::float,
    ),
    spec(
        "monte_carlo_temperature",
        "Monte Carlo temperature (K)",
        "Controls the acceptance ratio of Monte Carlo steps.",
        Some("298.0"),
        validators::float,
    ),
    spec(
        "population_size",
        "Genetic algorithm population size",
        "Number of individuals kept per generation by the genetic algorithm.",
        Some("1000"),
        validators::non_negative_integer,
    ),
    spec(
        "mutation_rate",
        "Mutation rate",
        "Rate at which the genetic algorithm introduces new dihedral values.",
        Some("0.75"),
        validators::float,
    ),
    spec(
        "crossover_rate",
        "Crossover rate",
        "Rate at which the genetic algorithm exchanges dihedral values between individuals.",
        Some("0.75"),
        validators::float,
    ),
    spec(
        "ff_type",
        "Force field type",
        "Force field used to evaluate conformer energies.",
        Some("GAFF"),
        validators::uppercase_text,
    ),
    spec(
        "max_distance",
        "Maximum linker distance (Angstrom)",
        "Largest allowed distance between the closing atoms of adjacent backbones. Conformers \
         above it are rejected before the system is built.",
        Some("0.1"),
        validators::float,
    ),
    spec(
        "energy_filter",
        "Energy thresholds: bond, angle, torsion, van der Waals, total",
        "Maximum bond energy of new backbone bonds (kcal/mol/bond), angle energy of new \
         backbone angles (kcal/mol/angle), torsional energy, van der Waals energy, and total \
         energy (kcal/mol/nucleotide).",
        Some("[2, 2, 5, 0, 10000000000]"),
        validators::energy_filter,
    ),
    spec(
        STRAND,
        "Nucleotide sequence (e.g. GCAT or XYXY)",
        "One-letter base codes, case-insensitive. Canonical bases cannot be mixed with the \
         hexad-forming bases.",
        None,
        validators::strand,
    ),
    spec(
        IS_DOUBLE_STRANDED,
        "Build double strands",
        "Build a complementary strand for canonical nucleobases.",
        Some("false"),
        validators::boolean,
    ),
    OptionSpec {
        name: PAIR_A_U,
        description: "Pair A with U instead of T",
        long_description: "Pair adenine with uracil when building the complementary strand.",
        default: Some("false"),
        forwarded: false,
        validator: validators::boolean,
    },
    spec(
        IS_HEXAD,
        "Build hexad strands",
        "Build six-stranded assemblies for the noncanonical nucleobases.",
        Some("false"),
        validators::boolean,
    ),
    spec(
        "strand_orientation",
        "Orientation of each hexad strand (up or down)",
        "One flag per hexad strand; mixing values builds antiparallel assemblies.",
        Some("[true, true, true, true, true, true]"),
        validators::strand_orientation,
    ),
];

/// Every recognized category with its options, in document order.
pub static CATALOG: [CategorySpec; 3] = [
    CategorySpec {
        category: OptionCategory::Backbone,
        options: &BACKBONE,
    },
    CategorySpec {
        category: OptionCategory::HelicalParameters,
        options: &HELICAL,
    },
    CategorySpec {
        category: OptionCategory::RuntimeParameters,
        options: &RUNTIME,
    },
];

pub fn category(category: OptionCategory) -> &'static CategorySpec {
    match category {
        OptionCategory::Backbone => &CATALOG[0],
        OptionCategory::HelicalParameters => &CATALOG[1],
        OptionCategory::RuntimeParameters => &CATALOG[2],
    }
}

pub fn lookup(group: OptionCategory, name: &str) -> Option<&'static OptionSpec> {
    category(group).options.iter().find(|spec| spec.name == name)
}
