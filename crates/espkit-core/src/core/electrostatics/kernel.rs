use super::potentials;
use crate::core::models::multipole::MultipoleSet;
use crate::core::models::result::PotentialComponents;
use crate::core::units::COULOMB_CONSTANT_AU;
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sums the potential of every atomic multipole at each grid point.
///
/// The per-point sums are independent, so the grid loop runs in parallel when the
/// `parallel` feature is enabled. Summation order within a point is the atom order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultipoleKernel {
    coulomb_constant: f64,
}

impl Default for MultipoleKernel {
    fn default() -> Self {
        Self {
            coulomb_constant: COULOMB_CONSTANT_AU,
        }
    }
}

impl MultipoleKernel {
    pub fn new(coulomb_constant: f64) -> Self {
        Self { coulomb_constant }
    }

    pub fn coulomb_constant(&self) -> f64 {
        self.coulomb_constant
    }

    /// Monopole, dipole and quadrupole potential at a single point.
    #[inline]
    pub fn evaluate_point(
        &self,
        sites: &[Point3<f64>],
        multipoles: &MultipoleSet,
        point: &Point3<f64>,
    ) -> (f64, f64, f64) {
        let mut monopole = 0.0;
        let mut dipole = 0.0;
        let mut quadrupole = 0.0;

        for (i, site) in sites.iter().enumerate() {
            let displacement = point - site;
            let distance = displacement.norm();
            monopole += potentials::monopole(multipoles.monopoles()[i], distance);
            dipole += potentials::dipole(&multipoles.dipoles()[i], &displacement, distance);
            quadrupole +=
                potentials::quadrupole(&multipoles.quadrupoles()[i], &displacement, distance);
        }

        let ke = self.coulomb_constant;
        (ke * monopole, ke * dipole, ke * quadrupole)
    }

    /// Evaluates every grid point. `sites` and `multipoles` must describe the same
    /// atoms in the same order and share a unit system with `points`.
    pub fn evaluate(
        &self,
        sites: &[Point3<f64>],
        multipoles: &MultipoleSet,
        points: &[Point3<f64>],
    ) -> PotentialComponents {
        debug_assert_eq!(sites.len(), multipoles.len());

        #[cfg(not(feature = "parallel"))]
        let iterator = points.iter();

        #[cfg(feature = "parallel")]
        let iterator = points.par_iter();

        let terms: Vec<(f64, f64, f64)> = iterator
            .map(|point| self.evaluate_point(sites, multipoles, point))
            .collect();

        let mut components = PotentialComponents::with_capacity(terms.len());
        for (m, d, q) in terms {
            components.push(m, d, q);
        }
        components
    }
}
