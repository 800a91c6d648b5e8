//! Field validators for the option catalog.
//!
//! Every validator has the same shape, [`Validator`](super::catalog::Validator):
//! it receives the raw YAML value of one option and the [`ValidationContext`], and
//! either returns the normalized [`OptionValue`] or a [`ValidationError`] describing
//! why the input was rejected. Validators are pure; the only environment they
//! observe is the filesystem, and only to check that referenced files exist.
//!
//! List-shaped options may also be written as text (`"[1, 2]"`); such strings are
//! parsed as YAML flow values before validation.

use super::{OptionValue, ValidationContext};
use crate::core::models::helical::HelicalRange;
use phf::{Set, phf_set};
use serde_yaml::Value;
use std::borrow::Cow;
use thiserror::Error;

static CANONICAL_BASES: Set<&'static str> = phf_set! { "A", "G", "C", "T", "U" };
static NONCANONICAL_BASES: Set<&'static str> = phf_set! { "X", "Y" };

const ENERGY_FILTER_LEN: usize = 5;

/// Reasons a single option value can be rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Cannot find file: {0}")]
    FileNotFound(String),

    #[error("Expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: String,
    },

    #[error("Cannot parse '{text}': {reason}")]
    Unparsable { text: String, reason: String },

    #[error("Incorrect number of atoms ({0}). Must provide two indices.")]
    WrongIndexCount(usize),

    #[error("Use 1-based index; 0 is not a valid atom index")]
    ZeroIndex,

    #[error("'{0}' is not a valid atom index")]
    InvalidIndex(String),

    #[error("Helical parameters require at least one value")]
    EmptyHelicalRange,

    #[error("Helical parameters must have at most three values, found {0}")]
    TooManyHelicalValues(usize),

    #[error("Number of steps must be a positive integer, found {0}")]
    InvalidSteps(String),

    #[error("Five values must be provided for the energy filter, found {0}")]
    WrongEnergyFilterLength(usize),

    #[error("Provide valid numbers; {0} is not numeric")]
    NotANumber(String),

    #[error("Value {0} is not finite")]
    NotFinite(f64),

    #[error("Cannot combine canonical and non-canonical nucleobases")]
    MixedBases,

    #[error("{0} is not a valid boolean; use true or false")]
    NotABoolean(String),

    #[error("{0} is not a non-negative integer")]
    NotAnInteger(String),
}

type Result<T> = std::result::Result<T, ValidationError>;

/// Resolves a file against the working directory, then the data directory.
pub fn input_file(value: &Value, ctx: &ValidationContext) -> Result<OptionValue> {
    let name = scalar_text(value, "a file path")?;
    let local = ctx.working_dir.join(&name);
    if local.is_file() {
        return Ok(OptionValue::Path(local));
    }
    let bundled = ctx.data_dir.join(&name);
    if bundled.is_file() {
        return Ok(OptionValue::Path(bundled));
    }
    Err(ValidationError::FileNotFound(name))
}

pub fn atom_index_pair(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    parse_index_pair(value).map(OptionValue::IndexPair)
}

pub fn atom_index_pairs(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    let value = reparse(value)?;
    let items = as_sequence(&value, "a list of atom index pairs")?;
    items
        .iter()
        .map(parse_index_pair)
        .collect::<Result<Vec<_>>>()
        .map(OptionValue::IndexPairs)
}

pub fn helical_range(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    parse_helical_range(value).map(OptionValue::Range)
}

pub fn energy_filter(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    let value = reparse(value)?;
    let items = as_sequence(&value, "a list of five energy thresholds")?;
    if items.len() != ENERGY_FILTER_LEN {
        return Err(ValidationError::WrongEnergyFilterLength(items.len()));
    }
    let mut thresholds = [0.0; ENERGY_FILTER_LEN];
    for (slot, item) in thresholds.iter_mut().zip(items) {
        *slot = strict_number(item)?;
    }
    Ok(OptionValue::EnergyFilter(thresholds))
}

pub fn strand(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    let names: Vec<String> = match value {
        Value::String(sequence) => sequence
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_uppercase().collect())
            .collect(),
        Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.trim().to_uppercase()),
                other => Err(ValidationError::UnexpectedType {
                    expected: "a base name",
                    found: describe(other),
                }),
            })
            .collect::<Result<_>>()?,
        other => {
            return Err(ValidationError::UnexpectedType {
                expected: "a sequence such as \"GCAT\"",
                found: describe(other),
            });
        }
    };

    if has_noncanonical(&names) && has_canonical(&names) {
        return Err(ValidationError::MixedBases);
    }
    Ok(OptionValue::Strand(names))
}

pub fn boolean(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    parse_bool(value).map(OptionValue::Bool)
}

pub fn strand_orientation(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    let value = reparse(value)?;
    let items = as_sequence(&value, "a list of strand orientations")?;
    items
        .iter()
        .map(parse_bool)
        .collect::<Result<Vec<_>>>()
        .map(OptionValue::Flags)
}

pub fn non_negative_integer(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    let parsed = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(integral_f64_to_u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .map(OptionValue::Integer)
        .ok_or_else(|| ValidationError::NotAnInteger(describe(value)))
}

pub fn float(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .map(OptionValue::Float)
        .ok_or_else(|| ValidationError::NotANumber(describe(value)))
}

pub fn lowercase_text(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    match value {
        Value::String(text) => Ok(OptionValue::Text(text.trim().to_lowercase())),
        other => Err(ValidationError::UnexpectedType {
            expected: "text",
            found: describe(other),
        }),
    }
}

pub fn uppercase_text(value: &Value, _ctx: &ValidationContext) -> Result<OptionValue> {
    scalar_text(value, "text").map(|text| OptionValue::Text(text.to_uppercase()))
}

pub fn has_canonical(strand: &[String]) -> bool {
    strand.iter().any(|b| CANONICAL_BASES.contains(b.as_str()))
}

pub fn has_noncanonical(strand: &[String]) -> bool {
    strand.iter().any(|b| NONCANONICAL_BASES.contains(b.as_str()))
}

pub(crate) fn parse_index_pair(value: &Value) -> Result<[u32; 2]> {
    let value = reparse(value)?;
    let items = as_sequence(&value, "a pair of atom indices")?;
    if items.len() != 2 {
        return Err(ValidationError::WrongIndexCount(items.len()));
    }
    Ok([parse_index(&items[0])?, parse_index(&items[1])?])
}

pub(crate) fn parse_helical_range(value: &Value) -> Result<HelicalRange> {
    let value = reparse(value)?;
    let range = match value.as_ref() {
        Value::Number(_) => HelicalRange::scalar(strict_number(&value)?),
        Value::Sequence(items) => match items.as_slice() {
            [] => return Err(ValidationError::EmptyHelicalRange),
            [v] => HelicalRange::scalar(strict_number(v)?),
            [lo, hi] => HelicalRange::new(strict_number(lo)?, strict_number(hi)?, 1),
            [lo, hi, steps] => {
                HelicalRange::new(strict_number(lo)?, strict_number(hi)?, parse_steps(steps)?)
            }
            _ => return Err(ValidationError::TooManyHelicalValues(items.len())),
        },
        other => {
            return Err(ValidationError::UnexpectedType {
                expected: "a number or a [low, high, steps] list",
                found: describe(other),
            });
        }
    };

    for bound in [range.low, range.high, range.high - range.low] {
        if !bound.is_finite() {
            return Err(ValidationError::NotFinite(bound));
        }
    }
    Ok(range)
}

pub(crate) fn parse_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::String(text) if text.trim().eq_ignore_ascii_case("true") => Ok(true),
        Value::String(text) if text.trim().eq_ignore_ascii_case("false") => Ok(false),
        other => Err(ValidationError::NotABoolean(describe(other))),
    }
}

fn parse_index(value: &Value) -> Result<u32> {
    let index = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(integral_f64_to_u64)),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    match index {
        Some(0) => Err(ValidationError::ZeroIndex),
        Some(i) => u32::try_from(i).map_err(|_| ValidationError::InvalidIndex(i.to_string())),
        None => Err(ValidationError::InvalidIndex(describe(value))),
    }
}

fn parse_steps(value: &Value) -> Result<usize> {
    let steps = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(integral_f64_to_u64)),
        _ => None,
    };
    match steps.and_then(|s| usize::try_from(s).ok()) {
        Some(s) if s >= 1 => Ok(s),
        _ => Err(ValidationError::InvalidSteps(describe(value))),
    }
}

fn strict_number(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::NotANumber(describe(value))),
        other => Err(ValidationError::NotANumber(describe(other))),
    }
}

fn integral_f64_to_u64(v: f64) -> Option<u64> {
    (v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64).then_some(v as u64)
}

fn scalar_text(value: &Value, expected: &'static str) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ValidationError::UnexpectedType {
            expected,
            found: describe(other),
        }),
    }
}

fn as_sequence<'v>(value: &'v Value, expected: &'static str) -> Result<&'v [Value]> {
    match value {
        Value::Sequence(items) => Ok(items.as_slice()),
        other => Err(ValidationError::UnexpectedType {
            expected,
            found: describe(other),
        }),
    }
}

/// Parses a textual value as YAML so `"[1, 2]"` behaves like `[1, 2]`.
fn reparse(value: &Value) -> Result<Cow<'_, Value>> {
    match value {
        Value::String(text) => serde_yaml::from_str(text)
            .map(Cow::Owned)
            .map_err(|e| ValidationError::Unparsable {
                text: text.clone(),
                reason: e.to_string(),
            }),
        other => Ok(Cow::Borrowed(other)),
    }
}

pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean `{b}`"),
        Value::Number(n) => format!("number `{n}`"),
        Value::String(s) => format!("text `{s}`"),
        Value::Sequence(items) => format!("a list of {} item(s)", items.len()),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value `{}`", tagged.tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn ctx() -> ValidationContext {
        ValidationContext::new("/nonexistent/work", "/nonexistent/data")
    }

    #[test]
    fn input_file_prefers_working_directory_then_data_directory() {
        let work = tempdir().unwrap();
        let data = tempdir().unwrap();
        fs::write(work.path().join("local.pdb"), "").unwrap();
        fs::write(data.path().join("bundled.pdb"), "").unwrap();
        fs::write(data.path().join("local.pdb"), "").unwrap();
        let ctx = ValidationContext::new(work.path(), data.path());

        let local = input_file(&yaml("local.pdb"), &ctx).unwrap();
        assert_eq!(local, OptionValue::Path(work.path().join("local.pdb")));

        let bundled = input_file(&yaml("bundled.pdb"), &ctx).unwrap();
        assert_eq!(bundled, OptionValue::Path(data.path().join("bundled.pdb")));

        let missing = input_file(&yaml("missing.pdb"), &ctx);
        assert_eq!(
            missing,
            Err(ValidationError::FileNotFound("missing.pdb".into()))
        );
    }

    #[test]
    fn atom_index_pair_accepts_two_one_based_indices() {
        assert_eq!(
            atom_index_pair(&yaml("[1, 17]"), &ctx()),
            Ok(OptionValue::IndexPair([1, 17]))
        );
        assert_eq!(
            atom_index_pair(&yaml("'[3, 4]'"), &ctx()),
            Ok(OptionValue::IndexPair([3, 4]))
        );
        assert_eq!(
            atom_index_pair(&yaml("['5', 6.0]"), &ctx()),
            Ok(OptionValue::IndexPair([5, 6]))
        );
    }

    #[test]
    fn atom_index_pair_rejects_zero_and_wrong_lengths() {
        assert_eq!(
            atom_index_pair(&yaml("[0, 2]"), &ctx()),
            Err(ValidationError::ZeroIndex)
        );
        assert_eq!(
            atom_index_pair(&yaml("[1]"), &ctx()),
            Err(ValidationError::WrongIndexCount(1))
        );
        assert_eq!(
            atom_index_pair(&yaml("[1, 2, 3]"), &ctx()),
            Err(ValidationError::WrongIndexCount(3))
        );
        assert!(matches!(
            atom_index_pair(&yaml("[-1, 2]"), &ctx()),
            Err(ValidationError::InvalidIndex(_))
        ));
        assert!(matches!(
            atom_index_pair(&yaml("7"), &ctx()),
            Err(ValidationError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn atom_index_pairs_validates_each_element() {
        assert_eq!(
            atom_index_pairs(&yaml("[[1, 2], [3, 4]]"), &ctx()),
            Ok(OptionValue::IndexPairs(vec![[1, 2], [3, 4]]))
        );
        assert_eq!(
            atom_index_pairs(&yaml("[]"), &ctx()),
            Ok(OptionValue::IndexPairs(vec![]))
        );
        assert_eq!(
            atom_index_pairs(&yaml("[[1, 2], [0, 4]]"), &ctx()),
            Err(ValidationError::ZeroIndex)
        );
    }

    #[test]
    fn helical_range_normalizes_scalars_and_short_lists() {
        assert_eq!(
            parse_helical_range(&yaml("30")).unwrap(),
            HelicalRange::new(30.0, 30.0, 1)
        );
        assert_eq!(
            parse_helical_range(&yaml("[2.5]")).unwrap(),
            HelicalRange::new(2.5, 2.5, 1)
        );
        assert_eq!(
            parse_helical_range(&yaml("[25, 35]")).unwrap(),
            HelicalRange::new(25.0, 35.0, 1)
        );
        assert_eq!(
            parse_helical_range(&yaml("[25, 35, 4]")).unwrap(),
            HelicalRange::new(25.0, 35.0, 4)
        );
        assert_eq!(
            parse_helical_range(&yaml("'[3.2, 3.6, 5]'")).unwrap(),
            HelicalRange::new(3.2, 3.6, 5)
        );
    }

    #[test]
    fn helical_range_rejects_malformed_input() {
        assert_eq!(
            parse_helical_range(&yaml("[1, 2, 3, 4]")),
            Err(ValidationError::TooManyHelicalValues(4))
        );
        assert_eq!(
            parse_helical_range(&yaml("[]")),
            Err(ValidationError::EmptyHelicalRange)
        );
        assert!(matches!(
            parse_helical_range(&yaml("[1, 2, 0]")),
            Err(ValidationError::InvalidSteps(_))
        ));
        assert!(matches!(
            parse_helical_range(&yaml("[1, 2, 1.5]")),
            Err(ValidationError::InvalidSteps(_))
        ));
        assert!(matches!(
            parse_helical_range(&yaml("[1, .nan]")),
            Err(ValidationError::NotFinite(_))
        ));
    }

    #[test]
    fn energy_filter_requires_exactly_five_numbers() {
        assert_eq!(
            energy_filter(&yaml("[2, 2, 5, 0, 10000000000]"), &ctx()),
            Ok(OptionValue::EnergyFilter([2.0, 2.0, 5.0, 0.0, 1e10]))
        );
        assert_eq!(
            energy_filter(&yaml("[2, 2, 5, 0]"), &ctx()),
            Err(ValidationError::WrongEnergyFilterLength(4))
        );
        assert_eq!(
            energy_filter(&yaml("[2, 2, 5, 0, 1, 1]"), &ctx()),
            Err(ValidationError::WrongEnergyFilterLength(6))
        );
        assert!(matches!(
            energy_filter(&yaml("[2, 2, five, 0, 1]"), &ctx()),
            Err(ValidationError::NotANumber(_))
        ));
    }

    #[test]
    fn strand_is_upper_cased_and_rejects_mixed_bases() {
        assert_eq!(
            strand(&yaml("gcaU"), &ctx()),
            Ok(OptionValue::Strand(vec![
                "G".into(),
                "C".into(),
                "A".into(),
                "U".into()
            ]))
        );
        assert_eq!(
            strand(&yaml("[x, y]"), &ctx()),
            Ok(OptionValue::Strand(vec!["X".into(), "Y".into()]))
        );
        assert_eq!(
            strand(&yaml("AXGT"), &ctx()),
            Err(ValidationError::MixedBases)
        );
    }

    #[test]
    fn boolean_accepts_native_and_textual_forms() {
        assert_eq!(boolean(&yaml("true"), &ctx()), Ok(OptionValue::Bool(true)));
        assert_eq!(boolean(&yaml("'False'"), &ctx()), Ok(OptionValue::Bool(false)));
        assert_eq!(boolean(&yaml("'TRUE'"), &ctx()), Ok(OptionValue::Bool(true)));
        assert!(matches!(
            boolean(&yaml("'yes please'"), &ctx()),
            Err(ValidationError::NotABoolean(_))
        ));
        assert!(matches!(
            boolean(&yaml("1"), &ctx()),
            Err(ValidationError::NotABoolean(_))
        ));
    }

    #[test]
    fn strand_orientation_validates_each_flag() {
        assert_eq!(
            strand_orientation(&yaml("[true, 'false', 'True']"), &ctx()),
            Ok(OptionValue::Flags(vec![true, false, true]))
        );
        assert!(strand_orientation(&yaml("[true, up]"), &ctx()).is_err());
    }

    #[test]
    fn numeric_validators_accept_numeric_text() {
        assert_eq!(
            non_negative_integer(&yaml("'1000'"), &ctx()),
            Ok(OptionValue::Integer(1000))
        );
        assert!(non_negative_integer(&yaml("-3"), &ctx()).is_err());
        assert_eq!(float(&yaml("'0.75'"), &ctx()), Ok(OptionValue::Float(0.75)));
        assert_eq!(float(&yaml("2"), &ctx()), Ok(OptionValue::Float(2.0)));
        assert!(float(&yaml("[1]"), &ctx()).is_err());
    }

    #[test]
    fn text_validators_normalize_case() {
        assert_eq!(
            lowercase_text(&yaml("Weighted Monte Carlo Search"), &ctx()),
            Ok(OptionValue::Text("weighted monte carlo search".into()))
        );
        assert_eq!(
            uppercase_text(&yaml("mmff94"), &ctx()),
            Ok(OptionValue::Text("MMFF94".into()))
        );
    }
}
