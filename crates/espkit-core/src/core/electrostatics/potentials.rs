use nalgebra::{Matrix3, Vector3};

// None of these guard against `distance == 0`; a grid point on top of an atom
// yields an infinite or NaN potential.

/// Potential of a point charge, `q / ρ`.
#[inline]
pub fn monopole(charge: f64, distance: f64) -> f64 {
    charge / distance
}

/// Potential of a point dipole, `(μ · d) / ρ³`.
#[inline]
pub fn dipole(dipole: &Vector3<f64>, displacement: &Vector3<f64>, distance: f64) -> f64 {
    dipole.dot(displacement) / (distance * distance * distance)
}

/// Potential of a point quadrupole, `(3/2) (dᵀ Θ d) / ρ⁵`.
#[inline]
pub fn quadrupole(quadrupole: &Matrix3<f64>, displacement: &Vector3<f64>, distance: f64) -> f64 {
    let d2 = distance * distance;
    1.5 * displacement.dot(&(quadrupole * displacement)) / (d2 * d2 * distance)
}
