use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::fmt;

/// One of the six helical degrees of freedom describing a nucleotide step.
///
/// The declaration order is the canonical axis order: it fixes the order of the
/// Cartesian product, the order of values in a [`HelicalPoint`], and the order of
/// `name=value` pairs in configuration headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HelicalAxis {
    HelicalTwist,
    Inclination,
    Tip,
    HelicalRise,
    XDisplacement,
    YDisplacement,
}

impl HelicalAxis {
    pub const ALL: [HelicalAxis; 6] = [
        HelicalAxis::HelicalTwist,
        HelicalAxis::Inclination,
        HelicalAxis::Tip,
        HelicalAxis::HelicalRise,
        HelicalAxis::XDisplacement,
        HelicalAxis::YDisplacement,
    ];

    /// The option name used for this axis in input documents.
    pub const fn key(self) -> &'static str {
        match self {
            HelicalAxis::HelicalTwist => "h_twist",
            HelicalAxis::Inclination => "inclination",
            HelicalAxis::Tip => "tip",
            HelicalAxis::HelicalRise => "h_rise",
            HelicalAxis::XDisplacement => "x_displacement",
            HelicalAxis::YDisplacement => "y_displacement",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.key() == key)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HelicalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A sampling range `[low, high]` with the number of values to draw from it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, Deserialize)]
pub struct HelicalRange {
    pub low: f64,
    pub high: f64,
    pub steps: usize,
}

impl HelicalRange {
    pub fn new(low: f64, high: f64, steps: usize) -> Self {
        Self { low, high, steps }
    }

    pub fn scalar(value: f64) -> Self {
        Self::new(value, value, 1)
    }
}

impl Default for HelicalRange {
    fn default() -> Self {
        Self::scalar(0.0)
    }
}

/// The validated ranges of all six axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HelicalRanges([HelicalRange; 6]);

impl HelicalRanges {
    pub fn new(ranges: [HelicalRange; 6]) -> Self {
        Self(ranges)
    }

    pub fn get(&self, axis: HelicalAxis) -> &HelicalRange {
        &self.0[axis.index()]
    }

    pub fn set(&mut self, axis: HelicalAxis, range: HelicalRange) {
        self.0[axis.index()] = range;
    }

    pub fn iter(&self) -> impl Iterator<Item = (HelicalAxis, &HelicalRange)> {
        HelicalAxis::ALL.into_iter().zip(self.0.iter())
    }

    /// Product of the six `steps`, saturating at `u64::MAX`.
    pub fn configuration_count(&self) -> u64 {
        self.0
            .iter()
            .fold(1u64, |acc, range| acc.saturating_mul(range.steps as u64))
    }
}

/// A single helical geometry: one concrete value per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelicalPoint([f64; 6]);

impl HelicalPoint {
    pub fn new(values: [f64; 6]) -> Self {
        Self(values)
    }

    pub fn get(&self, axis: HelicalAxis) -> f64 {
        self.0[axis.index()]
    }

    pub fn values(&self) -> &[f64; 6] {
        &self.0
    }

    /// Human-readable `h_twist=30.00, inclination=0.00, ...` label.
    pub fn header(&self) -> String {
        HelicalAxis::ALL
            .iter()
            .map(|axis| format!("{}={:.2}", axis.key(), self.get(*axis)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Serialize for HelicalPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(HelicalAxis::ALL.len()))?;
        for axis in HelicalAxis::ALL {
            map.serialize_entry(axis.key(), &self.get(axis))?;
        }
        map.end()
    }
}

/// One enumerated point of the sweep, identified by its 1-based ordinal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub ordinal: u64,
    pub point: HelicalPoint,
}

impl Configuration {
    /// The prefix namespacing this configuration's engine artifacts and result rows.
    pub fn prefix(&self) -> String {
        self.ordinal.to_string()
    }

    pub fn header(&self) -> String {
        self.point.header()
    }
}
