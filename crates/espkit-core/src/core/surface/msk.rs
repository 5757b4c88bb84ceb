use super::GridGenerator;
use super::radii::{radii_for, vdw_radius};
use crate::core::models::conformer::Conformer;
use crate::core::models::grid::{Grid, GridError};
use crate::core::units::LengthUnit;
use nalgebra::Vector3;
use std::f64::consts::PI;
use tracing::debug;

/// Shell radii as multiples of each atom's vdW radius.
pub const MSK_SHELL_SCALES: [f64; 4] = [1.4, 1.6, 1.8, 2.0];

/// Merz-Singh-Kollman grid: points on nested vdW shells, culled where they fall inside
/// another atom's shell of the same scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MskGenerator {
    density: f64,
}

impl MskGenerator {
    pub fn new(density: f64) -> Self {
        Self { density }
    }

    pub fn density(&self) -> f64 {
        self.density
    }
}

impl GridGenerator for MskGenerator {
    fn name(&self) -> &'static str {
        "msk"
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

        let mut points = Vec::new();
        for scale in MSK_SHELL_SCALES {
            for (i, center) in centers.iter().enumerate() {
                let shell_radius = scale * radii[i];
                let n_points = (4.0 * PI * shell_radius * shell_radius * self.density) as usize;

                for direction in connolly_sphere(n_points) {
                    let point = center + direction * shell_radius;
                    let buried = centers.iter().zip(&radii).enumerate().any(|(j, (c, r))| {
                        j != i && (point - c).norm() < scale * r
                    });
                    if !buried {
                        points.push(point);
                    }
                }
            }
        }

        debug!(
            atoms = conformer.len(),
            points = points.len(),
            density = self.density,
            "Generated MSK grid."
        );

        Ok(Grid::new(points, LengthUnit::Angstrom).converted_to(conformer.unit()))
    }
}

/// Roughly uniform points on the unit sphere, laid out along circles of latitude.
/// Returns at most `n_points` directions.
pub fn connolly_sphere(n_points: usize) -> Vec<Vector3<f64>> {
    if n_points == 0 {
        return Vec::new();
    }

    let n_equator = ((PI * n_points as f64).sqrt() as usize).max(1);
    let n_latitude = (n_equator / 2).max(1);

    let mut directions = Vec::with_capacity(n_points);
    for i in 0..=n_latitude {
        let phi = PI * i as f64 / n_latitude as f64;
        let (z, xy) = (phi.cos(), phi.sin());
        let n_longitude = ((xy * n_equator as f64) as usize).max(1);

        for j in 0..n_longitude {
            let theta = 2.0 * PI * j as f64 / n_longitude as f64;
            directions.push(Vector3::new(theta.cos() * xy, theta.sin() * xy, z));
            if directions.len() >= n_points {
                return directions;
            }
        }
    }
    directions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn helium() -> Conformer {
        Conformer::new(vec![Atom::new("He", Point3::origin())], LengthUnit::Angstrom)
    }

    #[test]
    fn connolly_sphere_points_are_unit_vectors() {
        let points = connolly_sphere(50);
        assert!(!points.is_empty());
        assert!(points.len() <= 50);
        for p in points {
            assert!((p.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn connolly_sphere_of_zero_points_is_empty() {
        assert!(connolly_sphere(0).is_empty());
    }

    #[test]
    fn single_atom_grid_lies_on_the_four_shells() {
        let grid = MskGenerator::new(1.0).generate(&helium()).unwrap();
        assert!(!grid.is_empty());
        for p in grid.points() {
            let r = p.coords.norm();
            let on_shell = MSK_SHELL_SCALES
                .iter()
                .any(|s| (r - s * 1.40).abs() < 1e-9);
            assert!(on_shell, "point at distance {} is on no shell", r);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = MskGenerator::new(2.0);
        let a = generator.generate(&helium()).unwrap();
        let b = generator.generate(&helium()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn no_point_is_inside_the_innermost_shell_of_any_atom() {
        let conformer = Conformer::new(
            vec![
                Atom::new("O", Point3::new(-0.0061, 0.3917, 0.0)),
                Atom::new("H", Point3::new(-0.789, -0.1982, 0.0)),
                Atom::new("H", Point3::new(0.7951, -0.1936, 0.0)),
            ],
            LengthUnit::Angstrom,
        );
        let grid = MskGenerator::new(2.0).generate(&conformer).unwrap();
        for p in grid.points() {
            for atom in conformer.atoms() {
                let r = vdw_radius(&atom.element).unwrap();
                assert!((p - atom.position).norm() >= 1.4 * r - 1e-9);
            }
        }
    }

    #[test]
    fn grid_is_returned_in_the_conformer_unit() {
        let conformer = Conformer::new(vec![Atom::new("He", Point3::origin())], LengthUnit::Bohr);
        let grid = MskGenerator::new(1.0).generate(&conformer).unwrap();
        assert_eq!(grid.unit(), LengthUnit::Bohr);
        let innermost = grid
            .points()
            .iter()
            .map(|p| p.coords.norm())
            .fold(f64::INFINITY, f64::min);
        assert!((innermost - LengthUnit::Angstrom.to_bohr(1.4 * 1.40)).abs() < 1e-9);
    }

    #[test]
    fn empty_conformer_and_unknown_elements_are_errors() {
        let generator = MskGenerator::new(1.0);
        let empty = Conformer::new(vec![], LengthUnit::Angstrom);
        assert_eq!(generator.generate(&empty).unwrap_err(), GridError::Empty);

        let unknown = Conformer::new(vec![Atom::new("Og", Point3::origin())], LengthUnit::Angstrom);
        assert!(matches!(
            generator.generate(&unknown),
            Err(GridError::UnsupportedElement { .. })
        ));
        assert!(!generator.supports_element("Og"));
    }
}
