use super::error::EngineError;
use crate::core::models::ShapeMismatchError;
use crate::core::models::atom::Atom;
use crate::core::models::conformer::Conformer;
use crate::core::models::multipole::MultipoleSet;
use crate::core::models::raw::{MoleculeRecord, RawMultipoles};
use crate::core::surface::GridGenerator;
use crate::core::units::LengthUnit;
use nalgebra::{Matrix3, Point3, Vector3};
use tracing::warn;

const SYMMETRY_TOLERANCE: f64 = 1e-8;

/// Binds a parsed molecule and a model's raw prediction into a conformer and its
/// multipole set.
///
/// Every per-atom array must have exactly one entry per element; nothing is truncated
/// or padded. When an element table is attached (the grid generator that will need
/// per-element constants) every symbol must be known to it.
pub struct MoleculeAdapter<'a> {
    length_unit: LengthUnit,
    moment_length_unit: LengthUnit,
    element_table: Option<&'a dyn GridGenerator>,
}

impl<'a> MoleculeAdapter<'a> {
    pub fn new(length_unit: LengthUnit, moment_length_unit: LengthUnit) -> Self {
        Self {
            length_unit,
            moment_length_unit,
            element_table: None,
        }
    }

    pub fn with_element_table(mut self, table: &'a dyn GridGenerator) -> Self {
        self.element_table = Some(table);
        self
    }

    pub fn build(
        &self,
        molecule: &MoleculeRecord,
        raw: &RawMultipoles,
    ) -> Result<(Conformer, MultipoleSet), EngineError> {
        let n = molecule.elements.len();
        ShapeMismatchError::check("coordinate", n, molecule.coordinates.len())?;
        ShapeMismatchError::check("monopole", n, raw.monopole.len())?;
        ShapeMismatchError::check("dipole", n, raw.dipole.len())?;
        ShapeMismatchError::check("quadrupole", n, raw.quadrupole.len())?;

        let atoms = molecule
            .elements
            .iter()
            .zip(&molecule.coordinates)
            .enumerate()
            .map(|(index, (symbol, &[x, y, z]))| {
                let atom = Atom::new(symbol, Point3::new(x, y, z));
                self.check_element(&atom.element, index)?;
                Ok(atom)
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let dipoles = raw.dipole.iter().map(|d| Vector3::from(*d)).collect();
        let quadrupoles = raw
            .quadrupole
            .iter()
            .enumerate()
            .map(|(index, rows)| {
                let theta = Matrix3::from_fn(|r, c| rows[r][c]);
                if !is_symmetric(&theta) {
                    warn!(atom = index, "Quadrupole tensor is not symmetric");
                }
                theta
            })
            .collect();

        let multipoles = MultipoleSet::new(
            raw.monopole.clone(),
            dipoles,
            quadrupoles,
            self.moment_length_unit,
        )?;

        Ok((Conformer::new(atoms, self.length_unit), multipoles))
    }

    fn check_element(&self, symbol: &str, index: usize) -> Result<(), EngineError> {
        let known = !symbol.is_empty()
            && self
                .element_table
                .is_none_or(|table| table.supports_element(symbol));
        if known {
            Ok(())
        } else {
            Err(EngineError::UnsupportedElement {
                symbol: symbol.to_string(),
                index,
            })
        }
    }
}

fn is_symmetric(theta: &Matrix3<f64>) -> bool {
    (theta - theta.transpose()).amax() <= SYMMETRY_TOLERANCE * theta.amax().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::msk::MskGenerator;

    fn water() -> MoleculeRecord {
        MoleculeRecord {
            elements: vec!["H".into(), "O".into(), "H".into()],
            coordinates: vec![[0.757, 0.586, 0.0], [0.0, 0.0, 0.0], [-0.757, 0.586, 0.0]],
            ..Default::default()
        }
    }

    fn raw(n: usize) -> RawMultipoles {
        RawMultipoles {
            monopole: vec![0.1; n],
            dipole: vec![[0.0, 0.0, 0.1]; n],
            quadrupole: vec![[[0.1, 0.0, 0.0], [0.0, -0.05, 0.0], [0.0, 0.0, -0.05]]; n],
        }
    }

    fn adapter<'a>() -> MoleculeAdapter<'a> {
        MoleculeAdapter::new(LengthUnit::Angstrom, LengthUnit::Angstrom)
    }

    #[test]
    fn matching_shapes_build_conformer_and_multipoles() {
        let (conformer, multipoles) = adapter().build(&water(), &raw(3)).unwrap();
        assert_eq!(conformer.len(), 3);
        assert_eq!(multipoles.len(), 3);
        assert_eq!(conformer.unit(), LengthUnit::Angstrom);
        assert_eq!(multipoles.dipoles()[1], Vector3::new(0.0, 0.0, 0.1));
        assert_eq!(multipoles.quadrupoles()[0][(1, 1)], -0.05);
    }

    #[test]
    fn extra_monopole_is_a_shape_mismatch_not_a_truncation() {
        let mut multipoles = raw(3);
        multipoles.monopole.push(0.2);
        let err = adapter().build(&water(), &multipoles).unwrap_err();
        assert!(matches!(
            err,
            EngineError::ShapeMismatch(ShapeMismatchError {
                quantity: "monopole",
                expected: 3,
                found: 4
            })
        ));
    }

    #[test]
    fn each_per_atom_array_is_checked() {
        let mut short_dipole = raw(3);
        short_dipole.dipole.pop();
        let mut short_quadrupole = raw(3);
        short_quadrupole.quadrupole.pop();
        let mut molecule = water();
        molecule.coordinates.pop();

        for (record, multipoles, quantity) in [
            (water(), short_dipole, "dipole"),
            (water(), short_quadrupole, "quadrupole"),
            (molecule, raw(3), "coordinate"),
        ] {
            match adapter().build(&record, &multipoles) {
                Err(EngineError::ShapeMismatch(e)) => assert_eq!(e.quantity, quantity),
                other => panic!("expected shape mismatch for {}, got {:?}", quantity, other),
            }
        }
    }

    #[test]
    fn element_table_rejects_unknown_symbols() {
        let mut molecule = water();
        molecule.elements[2] = "Xx".into();

        assert!(adapter().build(&molecule, &raw(3)).is_ok());

        let msk = MskGenerator::new(2.0);
        let err = adapter()
            .with_element_table(&msk)
            .build(&molecule, &raw(3))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedElement { ref symbol, index: 2 } if symbol == "Xx"));
    }

    #[test]
    fn empty_symbol_is_rejected_without_table() {
        let mut molecule = water();
        molecule.elements[0] = "  ".into();
        let err = adapter().build(&molecule, &raw(3)).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedElement { index: 0, .. }));
    }

    #[test]
    fn asymmetric_quadrupole_is_accepted() {
        let mut multipoles = raw(3);
        multipoles.quadrupole[1][0][1] = 0.3;
        assert!(adapter().build(&water(), &multipoles).is_ok());
    }
}
