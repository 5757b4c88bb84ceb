use super::GridGenerator;
use super::radii::{radii_for, vdw_radius};
use crate::core::models::conformer::Conformer;
use crate::core::models::grid::{Grid, GridError};
use crate::core::units::LengthUnit;
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Upper bound on lattice nodes visited for one conformer.
pub const MAX_LATTICE_NODES: usize = 50_000_000;

/// Cubic lattice grid restricted to the shell between `inner_vdw_scale` and
/// `outer_vdw_scale` times the atomic vdW radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeGenerator {
    spacing: f64,
    inner_vdw_scale: f64,
    outer_vdw_scale: f64,
}

impl LatticeGenerator {
    pub fn new(spacing: f64, inner_vdw_scale: f64, outer_vdw_scale: f64) -> Self {
        Self {
            spacing,
            inner_vdw_scale,
            outer_vdw_scale,
        }
    }

    /// Nodes per axis for a box of size `extent` (ångström).
    fn lattice_steps(&self, extent: &Vector3<f64>) -> Result<[usize; 3], GridError> {
        let mut steps = [0usize; 3];
        for (axis, length) in extent.iter().enumerate() {
            let nodes = (length / self.spacing).floor();
            if !(nodes.is_finite() && nodes >= 0.0 && nodes < MAX_LATTICE_NODES as f64) {
                return Err(GridError::InvalidSettings(format!(
                    "Lattice box extent {} Å cannot be sampled at spacing {} Å",
                    length, self.spacing
                )));
            }
            steps[axis] = nodes as usize + 1;
        }

        let total = steps
            .iter()
            .try_fold(1usize, |acc, n| acc.checked_mul(*n))
            .filter(|total| *total <= MAX_LATTICE_NODES);
        match total {
            Some(_) => Ok(steps),
            None => Err(GridError::InvalidSettings(format!(
                "Lattice of {} x {} x {} nodes exceeds the limit of {}",
                steps[0], steps[1], steps[2], MAX_LATTICE_NODES
            ))),
        }
    }

    fn accepts(&self, point: &Point3<f64>, centers: &[Point3<f64>], radii: &[f64]) -> bool {
        let mut within_outer = false;
        for (c, r) in centers.iter().zip(radii) {
            let distance = (point - c).norm();
            if distance < self.inner_vdw_scale * r {
                return false;
            }
            if distance <= self.outer_vdw_scale * r {
                within_outer = true;
            }
        }
        within_outer
    }
}

impl GridGenerator for LatticeGenerator {
    fn name(&self) -> &'static str {
        "lattice"
    }

    fn supports_element(&self, symbol: &str) -> bool {
        vdw_radius(symbol).is_some()
    }

    fn generate(&self, conformer: &Conformer) -> Result<Grid, GridError> {
        if conformer.is_empty() {
            return Err(GridError::Empty);
        }
        let radii = radii_for(conformer)?;
        let centers = conformer.positions_in(LengthUnit::Angstrom);

        let padding = radii.iter().fold(0.0_f64, |acc, r| acc.max(*r)) * self.outer_vdw_scale;
        let mut lower = centers[0].coords;
        let mut upper = centers[0].coords;
        for c in &centers[1..] {
            lower = lower.inf(&c.coords);
            upper = upper.sup(&c.coords);
        }
        lower -= Vector3::repeat(padding);
        upper += Vector3::repeat(padding);

        let steps = self.lattice_steps(&(upper - lower))?;

        let mut points = Vec::new();
        for i in 0..steps[0] {
            for j in 0..steps[1] {
                for k in 0..steps[2] {
                    let point = Point3::from(
                        lower + Vector3::new(i as f64, j as f64, k as f64) * self.spacing,
                    );
                    if self.accepts(&point, &centers, &radii) {
                        points.push(point);
                    }
                }
            }
        }

        debug!(
            atoms = conformer.len(),
            points = points.len(),
            spacing = self.spacing,
            "Generated lattice grid."
        );

        Ok(Grid::new(points, LengthUnit::Angstrom).converted_to(conformer.unit()))
    }
}
