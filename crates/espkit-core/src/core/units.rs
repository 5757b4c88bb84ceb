use crate::core::models::conformer::Conformer;
use crate::core::models::grid::Grid;
use crate::core::models::multipole::MultipoleSet;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bohr radius in ångström (CODATA 2018).
pub const BOHR_RADIUS_ANGSTROM: f64 = 0.529_177_210_903;
/// One hartree per elementary charge expressed in volts.
pub const HARTREE_PER_CHARGE_IN_VOLT: f64 = 27.211_386_245_988;
/// One hartree per elementary charge expressed in kcal/(mol·e).
pub const HARTREE_PER_CHARGE_IN_KCAL_PER_MOL: f64 = 627.509_474_063_1;
/// `1 / (4π ε0)` in atomic units.
pub const COULOMB_CONSTANT_AU: f64 = 1.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Non-finite {quantity} value at index {index} after conversion to atomic units")]
pub struct UnitConversionError {
    pub quantity: &'static str,
    pub index: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown unit '{0}'")]
pub struct UnknownUnitError(pub String);

/// Length unit attached to coordinates, grids and multipole moments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthUnit {
    #[default]
    Angstrom,
    Bohr,
    Nanometer,
}

impl LengthUnit {
    /// Number of bohr in one of this unit.
    #[inline]
    pub fn bohr_per_unit(self) -> f64 {
        match self {
            LengthUnit::Angstrom => 1.0 / BOHR_RADIUS_ANGSTROM,
            LengthUnit::Bohr => 1.0,
            LengthUnit::Nanometer => 10.0 / BOHR_RADIUS_ANGSTROM,
        }
    }

    #[inline]
    pub fn to_bohr(self, value: f64) -> f64 {
        value * self.bohr_per_unit()
    }

    #[inline]
    pub fn from_bohr(self, value: f64) -> f64 {
        value / self.bohr_per_unit()
    }

    /// Converts a value expressed in this unit into `target`.
    #[inline]
    pub fn convert(self, value: f64, target: LengthUnit) -> f64 {
        if self == target {
            value
        } else {
            target.from_bohr(self.to_bohr(value))
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Angstrom => "Å",
            LengthUnit::Bohr => "bohr",
            LengthUnit::Nanometer => "nm",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = UnknownUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "angstrom" | "ang" | "a" | "å" => Ok(LengthUnit::Angstrom),
            "bohr" | "au" | "a0" => Ok(LengthUnit::Bohr),
            "nanometer" | "nm" => Ok(LengthUnit::Nanometer),
            _ => Err(UnknownUnitError(s.to_string())),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unit of reported electrostatic potential values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PotentialUnit {
    /// Atomic unit of potential, hartree per elementary charge.
    #[default]
    HartreePerCharge,
    Volt,
    KcalPerMolPerCharge,
}

impl PotentialUnit {
    /// Multiplier taking a value in hartree/e into this unit.
    #[inline]
    pub fn from_atomic_factor(self) -> f64 {
        match self {
            PotentialUnit::HartreePerCharge => 1.0,
            PotentialUnit::Volt => HARTREE_PER_CHARGE_IN_VOLT,
            PotentialUnit::KcalPerMolPerCharge => HARTREE_PER_CHARGE_IN_KCAL_PER_MOL,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PotentialUnit::HartreePerCharge => "Eh/e",
            PotentialUnit::Volt => "V",
            PotentialUnit::KcalPerMolPerCharge => "kcal/(mol·e)",
        }
    }
}

impl FromStr for PotentialUnit {
    type Err = UnknownUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hartree-per-charge" | "hartree" | "au" => Ok(PotentialUnit::HartreePerCharge),
            "volt" | "v" => Ok(PotentialUnit::Volt),
            "kcal-per-mol-per-charge" | "kcal/mol" | "kcal" => {
                Ok(PotentialUnit::KcalPerMolPerCharge)
            }
            _ => Err(UnknownUnitError(s.to_string())),
        }
    }
}

impl fmt::Display for PotentialUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Positions, grid and moments of one evaluation, all in atomic units.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSystem {
    pub positions: Vec<Point3<f64>>,
    pub multipoles: MultipoleSet,
    pub grid_points: Vec<Point3<f64>>,
}

fn point_to_bohr(
    point: &Point3<f64>,
    unit: LengthUnit,
    quantity: &'static str,
    index: usize,
) -> Result<Point3<f64>, UnitConversionError> {
    let converted = point.map(|c| unit.to_bohr(c));
    if converted.iter().all(|c| c.is_finite()) {
        Ok(converted)
    } else {
        Err(UnitConversionError { quantity, index })
    }
}

pub fn normalize_positions(conformer: &Conformer) -> Result<Vec<Point3<f64>>, UnitConversionError> {
    conformer
        .atoms()
        .iter()
        .enumerate()
        .map(|(i, atom)| point_to_bohr(&atom.position, conformer.unit(), "atom position", i))
        .collect()
}

pub fn normalize_grid(grid: &Grid) -> Result<Vec<Point3<f64>>, UnitConversionError> {
    grid.points()
        .iter()
        .enumerate()
        .map(|(i, p)| point_to_bohr(p, grid.unit(), "grid point", i))
        .collect()
}

/// Converts moments into e, e·bohr and e·bohr².
pub fn normalize_multipoles(set: &MultipoleSet) -> Result<MultipoleSet, UnitConversionError> {
    let f = set.length_unit().bohr_per_unit();

    for (i, q) in set.monopoles().iter().enumerate() {
        if !q.is_finite() {
            return Err(UnitConversionError {
                quantity: "monopole",
                index: i,
            });
        }
    }

    let dipoles = set
        .dipoles()
        .iter()
        .enumerate()
        .map(|(i, mu)| {
            let converted = mu * f;
            if converted.iter().all(|c| c.is_finite()) {
                Ok(converted)
            } else {
                Err(UnitConversionError {
                    quantity: "dipole",
                    index: i,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let quadrupoles = set
        .quadrupoles()
        .iter()
        .enumerate()
        .map(|(i, theta)| {
            let converted = theta * (f * f);
            if converted.iter().all(|c| c.is_finite()) {
                Ok(converted)
            } else {
                Err(UnitConversionError {
                    quantity: "quadrupole",
                    index: i,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MultipoleSet::from_parts(
        set.monopoles().to_vec(),
        dipoles,
        quadrupoles,
        LengthUnit::Bohr,
    ))
}

pub fn normalize(
    conformer: &Conformer,
    multipoles: &MultipoleSet,
    grid: &Grid,
) -> Result<NormalizedSystem, UnitConversionError> {
    Ok(NormalizedSystem {
        positions: normalize_positions(conformer)?,
        multipoles: normalize_multipoles(multipoles)?,
        grid_points: normalize_grid(grid)?,
    })
}
