//! Payloads exchanged with the collaborators outside the core: parsed molecules,
//! model predictions and caller-supplied grids, before any validation.

use super::grid::{Grid, GridError};
use crate::core::units::LengthUnit;
use serde::{Deserialize, Serialize};

/// Multipole arrays as returned by a predictive model for a conformer of N atoms:
/// `monopole[N]`, `dipole[N][3]`, `quadrupole[N][3][3]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawMultipoles {
    pub monopole: Vec<f64>,
    pub dipole: Vec<[f64; 3]>,
    pub quadrupole: Vec<[[f64; 3]; 3]>,
}

/// A grid as a caller supplies it, either as `[[x, y, z], ...]` or as a flat array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawGrid {
    Points(Vec<[f64; 3]>),
    Flat(Vec<f64>),
}

impl RawGrid {
    pub fn to_grid(&self, unit: LengthUnit) -> Result<Grid, GridError> {
        match self {
            RawGrid::Points(points) => Ok(Grid::from_nested(points, unit)),
            RawGrid::Flat(values) => Grid::from_flat(values, unit),
        }
    }
}

/// An already-parsed molecule: ordered element symbols and coordinates, with an
/// optional grid and optional precomputed multipoles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoleculeRecord {
    pub elements: Vec<String>,
    pub coordinates: Vec<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<RawGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multipoles: Option<RawMultipoles>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_grid_accepts_nested_and_flat_json() {
        let nested: RawGrid = serde_json::from_str("[[1.0, 2.0, 3.0]]").unwrap();
        let flat: RawGrid = serde_json::from_str("[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]").unwrap();
        assert_eq!(nested.to_grid(LengthUnit::Angstrom).unwrap().len(), 1);
        assert_eq!(flat.to_grid(LengthUnit::Angstrom).unwrap().len(), 2);
    }

    #[test]
    fn flat_raw_grid_with_bad_length_fails_to_reshape() {
        let flat: RawGrid = serde_json::from_str("[1.0, 2.0]").unwrap();
        assert_eq!(
            flat.to_grid(LengthUnit::Angstrom).unwrap_err(),
            GridError::UnsupportedGrid { len: 2 }
        );
    }

    #[test]
    fn molecule_record_parses_without_optional_fields() {
        let json = r#"{"elements": ["He"], "coordinates": [[0.0, 0.0, 0.0]]}"#;
        let record: MoleculeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.elements, vec!["He"]);
        assert!(record.grid.is_none());
        assert!(record.multipoles.is_none());
    }

    #[test]
    fn molecule_record_rejects_unknown_fields() {
        let json = r#"{"elements": [], "coordinates": [], "charge": 1}"#;
        assert!(serde_json::from_str::<MoleculeRecord>(json).is_err());
    }
}
