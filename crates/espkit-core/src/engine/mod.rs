//! # Engine Module
//!
//! Turns a molecule and a multipole-predicting model into an electrostatic potential.
//!
//! - **Configuration** ([`config`]) - Units, grid settings and the Coulomb constant
//! - **Models** ([`predictor`], [`registry`]) - The model seam and the table of known models
//! - **Adapter** ([`adapter`]) - Validates raw predictions against the molecule
//! - **Grids** ([`grid_provider`]) - Explicit grids or generated ones
//! - **Dispatch** ([`dispatch`]) - Validation of the output-mode flags
//! - **Evaluation** ([`evaluation`]) - The adapter, normalizer and kernel pipeline
//! - **Progress** ([`progress`]) and **Errors** ([`error`])

pub mod adapter;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod evaluation;
pub mod grid_provider;
pub mod predictor;
pub mod progress;
pub mod registry;
