//! # Grid Generation
//!
//! Point clouds around a conformer on which the electrostatic potential is sampled.
//!
//! - [`msk`] - Merz-Singh-Kollman nested van der Waals shells
//! - [`lattice`] - Cubic lattice points between an inner and an outer vdW envelope
//! - [`radii`] - Van der Waals radii used to size both
//!
//! Generators are deterministic: the same conformer and settings always produce the
//! same points in the same order. Generated grids carry the conformer's length unit.

use crate::core::models::conformer::Conformer;
use crate::core::models::grid::{Grid, GridError};
use serde::{Deserialize, Serialize};

pub mod lattice;
pub mod msk;
pub mod radii;

pub const DEFAULT_MSK_DENSITY: f64 = 2.0;
pub const DEFAULT_LATTICE_SPACING: f64 = 0.5;
pub const DEFAULT_INNER_VDW_SCALE: f64 = 1.4;
pub const DEFAULT_OUTER_VDW_SCALE: f64 = 2.0;

/// Produces a grid for a conformer.
pub trait GridGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether the generator has the element-specific constants it needs for `symbol`.
    fn supports_element(&self, symbol: &str) -> bool;

    fn generate(&self, conformer: &Conformer) -> Result<Grid, GridError>;
}

/// Which grid to build and how densely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum GridSettings {
    Msk {
        /// Points per square ångström on each shell.
        #[serde(default = "default_msk_density")]
        density: f64,
    },
    #[serde(rename_all = "kebab-case")]
    Lattice {
        /// Lattice spacing in ångström.
        #[serde(default = "default_lattice_spacing")]
        spacing: f64,
        #[serde(default = "default_inner_vdw_scale")]
        inner_vdw_scale: f64,
        #[serde(default = "default_outer_vdw_scale")]
        outer_vdw_scale: f64,
    },
}

fn default_msk_density() -> f64 {
    DEFAULT_MSK_DENSITY
}
fn default_lattice_spacing() -> f64 {
    DEFAULT_LATTICE_SPACING
}
fn default_inner_vdw_scale() -> f64 {
    DEFAULT_INNER_VDW_SCALE
}
fn default_outer_vdw_scale() -> f64 {
    DEFAULT_OUTER_VDW_SCALE
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings::Msk {
            density: DEFAULT_MSK_DENSITY,
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), GridError> {
        match *self {
            GridSettings::Msk { density } => {
                if !(density.is_finite() && density > 0.0) {
                    return Err(GridError::InvalidSettings(format!(
                        "MSK density must be positive, got {}",
                        density
                    )));
                }
            }
            GridSettings::Lattice {
                spacing,
                inner_vdw_scale,
                outer_vdw_scale,
            } => {
                if !(spacing.is_finite() && spacing > 0.0) {
                    return Err(GridError::InvalidSettings(format!(
                        "Lattice spacing must be positive, got {}",
                        spacing
                    )));
                }
                if !(inner_vdw_scale >= 0.0 && inner_vdw_scale < outer_vdw_scale) {
                    return Err(GridError::InvalidSettings(format!(
                        "Inner vdW scale ({}) must be non-negative and below the outer scale ({})",
                        inner_vdw_scale, outer_vdw_scale
                    )));
                }
            }
        }
        Ok(())
    }

    /// Builds the generator described by these settings.
    pub fn generator(&self) -> Result<Box<dyn GridGenerator>, GridError> {
        self.validate()?;
        Ok(match *self {
            GridSettings::Msk { density } => Box::new(msk::MskGenerator::new(density)),
            GridSettings::Lattice {
                spacing,
                inner_vdw_scale,
                outer_vdw_scale,
            } => Box::new(lattice::LatticeGenerator::new(
                spacing,
                inner_vdw_scale,
                outer_vdw_scale,
            )),
        })
    }
}
