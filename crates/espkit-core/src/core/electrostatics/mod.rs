//! # Electrostatics Module
//!
//! Classical multipole-expansion electrostatic potential.
//!
//! - [`potentials`] - Potential of a single point monopole, dipole or quadrupole
//! - [`kernel`] - Summation of every atomic multipole over a set of grid points
//!
//! All routines work in whatever consistent unit system their inputs use. The
//! Coulomb constant is carried explicitly by [`kernel::MultipoleKernel`]; in atomic
//! units it is 1 and the potential comes out in hartree per elementary charge.
//!
//! ```ignore
//! use espkit::core::electrostatics::kernel::MultipoleKernel;
//!
//! let kernel = MultipoleKernel::default();
//! let components = kernel.evaluate(&positions, &multipoles, &grid_points);
//! let esp = components.combined();
//! ```

pub mod kernel;
pub mod potentials;
