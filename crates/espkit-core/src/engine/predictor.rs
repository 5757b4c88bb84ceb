//! The seam to multipole-predicting models.
//!
//! A model is loaded once by the host and shared by every evaluation through a
//! [`ModelHandle`]. Implementations must be thread-safe since batch entries are
//! evaluated concurrently.

use super::registry::Capabilities;
use crate::core::io::batch::BatchInput;
use crate::core::models::raw::RawMultipoles;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// The molecule a model is asked about. Coordinates are in the caller's length unit.
#[derive(Debug, Clone, Copy)]
pub struct PredictionRequest<'a> {
    pub id: &'a str,
    pub elements: &'a [String],
    pub coordinates: &'a [[f64; 3]],
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct PredictionError {
    pub message: String,
}

impl PredictionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait MultipolePredictor: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    /// Per-atom moments for the requested molecule: `monopole[N]`, `dipole[N][3]`
    /// and `quadrupole[N][3][3]`. Shapes are checked by the caller.
    fn predict(&self, request: &PredictionRequest<'_>) -> Result<RawMultipoles, PredictionError>;
}

pub type ModelHandle = Arc<dyn MultipolePredictor>;

/// Serves multipoles computed ahead of time, keyed by molecule identifier.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedPredictor {
    multipoles: HashMap<String, RawMultipoles>,
    capabilities: Capabilities,
}

impl PrecomputedPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the multipoles stored with each molecule of a batch. Molecules
    /// without stored multipoles are skipped and fail when evaluated.
    pub fn from_batch(batch: &BatchInput) -> Self {
        let multipoles = batch
            .iter()
            .filter_map(|(id, record)| {
                record
                    .multipoles
                    .as_ref()
                    .map(|m| (id.to_string(), m.clone()))
            })
            .collect();
        Self {
            multipoles,
            capabilities: Capabilities::ALL,
        }
    }

    /// Restricts what requests may ask of this predictor, usually to the
    /// capabilities of the registry entry it was loaded for.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, multipoles: RawMultipoles) {
        self.multipoles.insert(id.into(), multipoles);
    }

    pub fn len(&self) -> usize {
        self.multipoles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multipoles.is_empty()
    }

    pub fn into_handle(self) -> ModelHandle {
        Arc::new(self)
    }
}

impl MultipolePredictor for PrecomputedPredictor {
    fn name(&self) -> &str {
        "PRECOMPUTED"
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn predict(&self, request: &PredictionRequest<'_>) -> Result<RawMultipoles, PredictionError> {
        self.multipoles.get(request.id).cloned().ok_or_else(|| {
            PredictionError::new(format!(
                "no precomputed multipoles for molecule '{}'",
                request.id
            ))
        })
    }
}
