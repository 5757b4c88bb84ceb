//! # ESPKit Core Library
//!
//! Evaluation of molecular electrostatic potentials (ESP) from per-atom multipole
//! expansions predicted by an external model, with result packaging for single
//! molecules and batched requests.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Conformer`, `MultipoleSet`,
//!   `Grid`), unit handling, the multipole potential kernel, grid generators and the
//!   batch file format.
//!
//! - **[`engine`]: The Logic Core.** Binds raw model output to validated physical
//!   quantities, provides grids, validates request flags and evaluates a single
//!   molecule end to end. External collaborators (the multipole model, the grid
//!   generator) enter here through traits.
//!
//! - **[`workflows`]: The Public API.** Single-molecule and batched ESP requests,
//!   dispatched from a set of request flags.

pub mod core;
pub mod engine;
pub mod workflows;
