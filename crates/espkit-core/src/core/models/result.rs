use super::grid::Grid;
use crate::core::units::PotentialUnit;

/// Potential contributions of each multipole order, aligned with the grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PotentialComponents {
    pub monopole: Vec<f64>,
    pub dipole: Vec<f64>,
    pub quadrupole: Vec<f64>,
}

impl PotentialComponents {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monopole: Vec::with_capacity(capacity),
            dipole: Vec::with_capacity(capacity),
            quadrupole: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.monopole.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monopole.is_empty()
    }

    pub fn push(&mut self, monopole: f64, dipole: f64, quadrupole: f64) {
        self.monopole.push(monopole);
        self.dipole.push(dipole);
        self.quadrupole.push(quadrupole);
    }

    /// Sum of the three contributions at every grid point.
    pub fn combined(&self) -> Vec<f64> {
        self.monopole
            .iter()
            .zip(&self.dipole)
            .zip(&self.quadrupole)
            .map(|((m, d), q)| m + d + q)
            .collect()
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        if factor != 1.0 {
            for v in self
                .monopole
                .iter_mut()
                .chain(self.dipole.iter_mut())
                .chain(self.quadrupole.iter_mut())
            {
                *v *= factor;
            }
        }
        self
    }
}

/// Electrostatic potential of one molecule on one grid.
///
/// Holds the per-order contributions, their sum, and the grid exactly as it was
/// provided (in the caller's length unit).
#[derive(Debug, Clone, PartialEq)]
pub struct EspResult {
    pub components: PotentialComponents,
    pub combined: Vec<f64>,
    pub grid: Grid,
    pub unit: PotentialUnit,
}

impl EspResult {
    pub fn new(components: PotentialComponents, grid: Grid, unit: PotentialUnit) -> Self {
        let combined = components.combined();
        Self {
            components,
            combined,
            grid,
            unit,
        }
    }

    pub fn len(&self) -> usize {
        self.combined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
    }

    /// `(potential_values, grid)` pair of the combined form.
    pub fn into_combined(self) -> (Vec<f64>, Grid) {
        (self.combined, self.grid)
    }

    /// `(monopole, dipole, quadrupole)` triple of the broken-up form.
    pub fn into_broken_up(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let PotentialComponents {
            monopole,
            dipole,
            quadrupole,
        } = self.components;
        (monopole, dipole, quadrupole)
    }
}
