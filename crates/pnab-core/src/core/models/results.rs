use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of columns in every engine result row.
pub const COLUMN_COUNT: usize = 10;

/// Unit-labeled column header shared by the results table and the summary.
pub const COLUMN_HEADER: &str = "Prefix, Conformer Index, Distance (Angstroms), \
Bond Energy (kcal/mol/bond), Angle Energy (kcal/mol/angle), \
Torsion Energy (kcal/mol/nucleotide), Van der Waals Energy (kcal/mol/nucleotide), \
Total Energy (kcal/mol/nucleotide), Fixed Torsions Energy (kcal/mol/nucleotide), RMSD (Angstrom)";

/// One accepted conformer reported by the engine for a configuration.
///
/// Field order matches [`COLUMN_HEADER`]; the struct is written to and read from
/// CSV positionally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConformerRecord {
    pub prefix: u64,
    pub conformer_index: u64,
    pub distance: f64,
    pub bond_energy: f64,
    pub angle_energy: f64,
    pub torsion_energy: f64,
    pub vdw_energy: f64,
    pub total_energy: f64,
    pub fixed_torsion_energy: f64,
    pub rmsd: f64,
}

impl ConformerRecord {
    /// Builds a record from one raw engine row, tagging it with `prefix`.
    ///
    /// The engine's own prefix column is ignored; the configuration that produced
    /// the row is authoritative. Returns `None` when the conformer index is not a
    /// non-negative integer.
    pub fn from_engine_row(prefix: u64, row: &[f64; COLUMN_COUNT]) -> Option<Self> {
        let index = row[1];
        if !index.is_finite() || index < 0.0 || index.fract() != 0.0 {
            return None;
        }
        Some(Self {
            prefix,
            conformer_index: index as u64,
            distance: row[2],
            bond_energy: row[3],
            angle_energy: row[4],
            torsion_energy: row[5],
            vdw_energy: row[6],
            total_energy: row[7],
            fixed_torsion_energy: row[8],
            rmsd: row[9],
        })
    }

    pub fn cmp_total_energy(&self, other: &Self) -> Ordering {
        self.total_energy.total_cmp(&other.total_energy)
    }
}

/// Sorts records ascending by total energy, keeping file order among ties.
pub fn sort_by_total_energy(records: &mut [ConformerRecord]) {
    records.sort_by(ConformerRecord::cmp_total_energy);
}
