//! # Workflows Module
//!
//! Top-level entry points. Each workflow takes a shared model handle, a configuration
//! and a progress reporter, and returns a formatted response.
//!
//! - **Single** ([`single`]) - One molecule, combined or broken-up potential
//! - **Batch** ([`batch`]) - Many molecules, persisted as one JSON file
//! - **Requests** ([`esp`]) - Validates request flags and routes to the two above

pub mod batch;
pub mod esp;
pub mod single;
