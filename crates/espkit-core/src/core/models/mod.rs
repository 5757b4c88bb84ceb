//! Data structures describing one ESP evaluation: the conformer, its multipole
//! expansion, the grid on which the potential is sampled and the resulting values,
//! plus the raw payloads exchanged with external collaborators.

use thiserror::Error;

pub mod atom;
pub mod conformer;
pub mod grid;
pub mod multipole;
pub mod raw;
pub mod result;

/// Two per-atom quantities that must share a leading dimension disagree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Shape mismatch for {quantity}: expected {expected} entries, found {found}")]
pub struct ShapeMismatchError {
    pub quantity: &'static str,
    pub expected: usize,
    pub found: usize,
}

impl ShapeMismatchError {
    pub(crate) fn check(
        quantity: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(), ShapeMismatchError> {
        if expected == found {
            Ok(())
        } else {
            Err(ShapeMismatchError {
                quantity,
                expected,
                found,
            })
        }
    }
}
