pub mod batch;
pub mod evaluate;
pub mod models;

use crate::error::{CliError, Result};
use espkit::core::io::batch::BatchInput;
use espkit::engine::predictor::{ModelHandle, PrecomputedPredictor};
use espkit::engine::registry::{ModelDescriptor, ModelKind};
use tracing::info;

/// Instantiates the backend of `model` for the molecules of `input`.
///
/// Only precomputed multipoles can be served from the command line; other models
/// need their backend injected by a host process linking the library.
pub fn load_model(model: &ModelDescriptor, input: &BatchInput) -> Result<ModelHandle> {
    match model.kind {
        ModelKind::Precomputed => {
            let predictor =
                PrecomputedPredictor::from_batch(input).with_capabilities(model.capabilities);
            info!(
                molecules = predictor.len(),
                "Loaded precomputed multipoles from input."
            );
            Ok(predictor.into_handle())
        }
        ModelKind::Riniker => Err(CliError::Argument(format!(
            "model '{}' needs an external prediction backend, which the command-line tool does not provide; \
             supply `multipoles` with each molecule and use the PRECOMPUTED model",
            model.name
        ))),
    }
}
