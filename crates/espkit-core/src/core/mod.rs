//! # Core Module
//!
//! Fundamental building blocks for electrostatic potential evaluation.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, conformers, multipole sets, grids and results
//! - **Units** ([`units`]) - Length and potential units, normalization into atomic units
//! - **Electrostatics** ([`electrostatics`]) - Multipole potential terms and the summation kernel
//! - **Grid Generation** ([`surface`]) - Molecular-surface grids around a conformer
//! - **File I/O** ([`io`]) - Batch input and result files
//!
//! Everything in this layer is a pure function of its inputs. Errors are reported as
//! structured values so callers can decide how to present them.

pub mod electrostatics;
pub mod io;
pub mod models;
pub mod surface;
pub mod units;
