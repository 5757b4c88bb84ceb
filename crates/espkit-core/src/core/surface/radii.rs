use crate::core::models::conformer::Conformer;
use crate::core::models::grid::GridError;
use phf::{Map, phf_map};

/// Bondi van der Waals radii in ångström.
pub static VDW_RADII_ANGSTROM: Map<&'static str, f64> = phf_map! {
    "H" => 1.20,
    "He" => 1.40,
    "Li" => 1.82,
    "B" => 1.92,
    "C" => 1.70,
    "N" => 1.55,
    "O" => 1.52,
    "F" => 1.47,
    "Ne" => 1.54,
    "Na" => 2.27,
    "Mg" => 1.73,
    "Si" => 2.10,
    "P" => 1.80,
    "S" => 1.80,
    "Cl" => 1.75,
    "Ar" => 1.88,
    "K" => 2.75,
    "As" => 1.85,
    "Se" => 1.90,
    "Br" => 1.85,
    "Kr" => 2.02,
    "Te" => 2.06,
    "I" => 1.98,
    "Xe" => 2.16,
};

pub fn vdw_radius(symbol: &str) -> Option<f64> {
    VDW_RADII_ANGSTROM.get(symbol).copied()
}

/// Radii of every atom in order, in ångström.
pub(crate) fn radii_for(conformer: &Conformer) -> Result<Vec<f64>, GridError> {
    conformer
        .elements()
        .enumerate()
        .map(|(index, symbol)| {
            vdw_radius(symbol).ok_or_else(|| GridError::UnsupportedElement {
                symbol: symbol.to_string(),
                index,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::units::LengthUnit;
    use nalgebra::Point3;

    #[test]
    fn common_organic_elements_have_radii() {
        for symbol in ["H", "C", "N", "O", "S", "P", "Cl"] {
            assert!(vdw_radius(symbol).is_some(), "missing radius for {}", symbol);
        }
    }

    #[test]
    fn radii_for_reports_first_unknown_element() {
        let conformer = Conformer::new(
            vec![
                Atom::new("C", Point3::origin()),
                Atom::new("Xx", Point3::new(1.0, 0.0, 0.0)),
            ],
            LengthUnit::Angstrom,
        );
        assert_eq!(
            radii_for(&conformer).unwrap_err(),
            GridError::UnsupportedElement {
                symbol: "Xx".to_string(),
                index: 1
            }
        );
    }
}
