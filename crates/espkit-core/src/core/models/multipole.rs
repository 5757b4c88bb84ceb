use super::ShapeMismatchError;
use crate::core::units::LengthUnit;
use nalgebra::{Matrix3, Vector3};

/// Per-atom multipole expansion of a molecule's charge distribution.
///
/// Monopoles are in elementary charges, dipoles in e·L and quadrupoles in e·L², where
/// L is [`MultipoleSet::length_unit`]. All three sequences share the atom count of the
/// conformer they describe, which is checked on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipoleSet {
    monopoles: Vec<f64>,
    dipoles: Vec<Vector3<f64>>,
    quadrupoles: Vec<Matrix3<f64>>,
    length_unit: LengthUnit,
}

impl MultipoleSet {
    /// Builds a set, rejecting dipole or quadrupole arrays whose length differs from
    /// the monopole count.
    pub fn new(
        monopoles: Vec<f64>,
        dipoles: Vec<Vector3<f64>>,
        quadrupoles: Vec<Matrix3<f64>>,
        length_unit: LengthUnit,
    ) -> Result<Self, ShapeMismatchError> {
        ShapeMismatchError::check("dipole", monopoles.len(), dipoles.len())?;
        ShapeMismatchError::check("quadrupole", monopoles.len(), quadrupoles.len())?;
        Ok(Self::from_parts(monopoles, dipoles, quadrupoles, length_unit))
    }

    /// Point charges only; dipoles and quadrupoles are zero.
    pub fn monopoles_only(charges: Vec<f64>, length_unit: LengthUnit) -> Self {
        let n = charges.len();
        Self::from_parts(
            charges,
            vec![Vector3::zeros(); n],
            vec![Matrix3::zeros(); n],
            length_unit,
        )
    }

    pub(crate) fn from_parts(
        monopoles: Vec<f64>,
        dipoles: Vec<Vector3<f64>>,
        quadrupoles: Vec<Matrix3<f64>>,
        length_unit: LengthUnit,
    ) -> Self {
        debug_assert_eq!(monopoles.len(), dipoles.len());
        debug_assert_eq!(monopoles.len(), quadrupoles.len());
        Self {
            monopoles,
            dipoles,
            quadrupoles,
            length_unit,
        }
    }

    pub fn len(&self) -> usize {
        self.monopoles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monopoles.is_empty()
    }

    pub fn monopoles(&self) -> &[f64] {
        &self.monopoles
    }

    pub fn dipoles(&self) -> &[Vector3<f64>] {
        &self.dipoles
    }

    pub fn quadrupoles(&self) -> &[Matrix3<f64>] {
        &self.quadrupoles
    }

    pub fn length_unit(&self) -> LengthUnit {
        self.length_unit
    }

    /// Net charge of the molecule.
    pub fn total_charge(&self) -> f64 {
        self.monopoles.iter().sum()
    }
}
