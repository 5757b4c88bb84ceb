use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::batch::BatchIoError;
use crate::core::models::ShapeMismatchError;
use crate::core::models::grid::GridError;
use crate::core::units::UnitConversionError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatchError),

    #[error("Unsupported element '{symbol}' at atom index {index}")]
    UnsupportedElement { symbol: String, index: usize },

    #[error(transparent)]
    UnitConversion(#[from] UnitConversionError),

    #[error("Grid error: {0}")]
    Grid(GridError),

    #[error("Invalid request flags: {0}")]
    InvalidFlags(String),

    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    #[error("Model '{model}' failed to predict multipoles: {message}")]
    Prediction { model: String, message: String },

    #[error("Batch entry '{id}' failed: {source}")]
    BatchEntry {
        id: String,
        #[source]
        source: Box<EngineError>,
    },

    #[error("Batch I/O failed: {0}")]
    BatchIo(#[from] BatchIoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<GridError> for EngineError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::UnsupportedElement { symbol, index } => {
                EngineError::UnsupportedElement { symbol, index }
            }
            other => EngineError::Grid(other),
        }
    }
}

impl EngineError {
    /// The error behind any batch-entry context.
    pub fn root(&self) -> &EngineError {
        match self {
            EngineError::BatchEntry { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_element_from_grid_is_lifted() {
        let err: EngineError = GridError::UnsupportedElement {
            symbol: "Xx".to_string(),
            index: 2,
        }
        .into();
        assert!(matches!(err, EngineError::UnsupportedElement { ref symbol, index: 2 } if symbol == "Xx"));
    }

    #[test]
    fn other_grid_errors_stay_grid_errors() {
        let err: EngineError = GridError::UnsupportedGrid { len: 4 }.into();
        assert!(matches!(err, EngineError::Grid(GridError::UnsupportedGrid { len: 4 })));
    }

    #[test]
    fn root_unwraps_nested_batch_context() {
        let err = EngineError::BatchEntry {
            id: "mol".to_string(),
            source: Box::new(EngineError::UnknownModel("X".to_string())),
        };
        assert!(matches!(err.root(), EngineError::UnknownModel(_)));
        assert!(err.to_string().starts_with("Batch entry 'mol' failed"));
    }
}
