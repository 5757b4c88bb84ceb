use super::atom::Atom;
use crate::core::units::LengthUnit;
use nalgebra::{Point3, Vector3};

/// A single 3D arrangement of a molecule's atoms.
///
/// Atom order is significant: it must match the order of the multipole moments
/// describing the same molecule. A conformer is never modified in place; a new one
/// is built for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformer {
    atoms: Vec<Atom>,
    unit: LengthUnit,
}

impl Conformer {
    pub fn new(atoms: Vec<Atom>, unit: LengthUnit) -> Self {
        Self { atoms, unit }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Length unit of the atomic positions.
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.atoms.iter().map(|a| a.element.as_str())
    }

    /// Atomic positions converted into `unit`.
    pub fn positions_in(&self, unit: LengthUnit) -> Vec<Point3<f64>> {
        self.atoms
            .iter()
            .map(|a| a.position.map(|c| self.unit.convert(c, unit)))
            .collect()
    }

    /// Returns a copy with every atom shifted by `offset` (same unit as the conformer).
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        Self {
            atoms: self
                .atoms
                .iter()
                .map(|a| Atom {
                    element: a.element.clone(),
                    position: a.position + offset,
                })
                .collect(),
            unit: self.unit,
        }
    }
}
