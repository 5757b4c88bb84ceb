use super::{batch, single};
use crate::core::io::batch::{BatchInput, default_output_path};
use crate::core::models::raw::MoleculeRecord;
use crate::core::models::result::EspResult;
use crate::engine::config::EvaluationConfig;
use crate::engine::dispatch::{DispatchMode, OutputForm, RequestFlags};
use crate::engine::error::EngineError;
use crate::engine::predictor::ModelHandle;
use crate::engine::progress::ProgressReporter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What to evaluate.
#[derive(Debug, Clone, Copy)]
pub enum EspRequest<'a> {
    Single {
        id: &'a str,
        molecule: &'a MoleculeRecord,
    },
    Batch {
        input: &'a BatchInput,
        /// Where the batch input was read from; the result file is written next to it.
        source: &'a Path,
        /// Explicit result location, overriding the default next to `source`.
        output: Option<&'a Path>,
    },
}

impl EspRequest<'_> {
    fn is_batch(&self) -> bool {
        matches!(self, EspRequest::Batch { .. })
    }
}

/// Formatted result of a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EspResponse {
    Combined {
        values: Vec<f64>,
        grid: Vec<[f64; 3]>,
    },
    BrokenUp {
        monopole: Vec<f64>,
        dipole: Vec<f64>,
        quadrupole: Vec<f64>,
    },
    BatchFile {
        path: String,
    },
}

impl EspResponse {
    pub fn from_result(result: EspResult, form: OutputForm) -> Self {
        match form {
            OutputForm::Combined => {
                let (values, grid) = result.into_combined();
                EspResponse::Combined {
                    values,
                    grid: grid.to_nested(),
                }
            }
            OutputForm::BrokenUp => {
                let (monopole, dipole, quadrupole) = result.into_broken_up();
                EspResponse::BrokenUp {
                    monopole,
                    dipole,
                    quadrupole,
                }
            }
        }
    }
}

/// Validates `flags` against the request and the model, then runs the matching
/// workflow.
#[instrument(skip_all, name = "esp_request")]
pub fn run(
    model: &ModelHandle,
    request: EspRequest<'_>,
    flags: RequestFlags,
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<EspResponse, EngineError> {
    let mode = flags.validate(&model.capabilities())?;

    match (mode, request) {
        (DispatchMode::Single(form), EspRequest::Single { id, molecule }) => {
            single::run(model, id, molecule, config, form, reporter)
        }
        (
            DispatchMode::Batch(form),
            EspRequest::Batch {
                input,
                source,
                output,
            },
        ) => {
            let output: PathBuf = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| default_output_path(source));
            let path = batch::run(model, input, config, form, &output, reporter)?;
            Ok(EspResponse::BatchFile { path })
        }
        (mode, request) => Err(EngineError::InvalidFlags(format!(
            "{} request cannot be served in {} mode",
            if request.is_batch() { "batch" } else { "single" },
            if mode.is_batched() { "batched" } else { "single" },
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::batch::BatchResult;
    use crate::core::models::raw::{RawGrid, RawMultipoles};
    use crate::engine::predictor::{MultipolePredictor, PrecomputedPredictor, PredictionError, PredictionRequest};
    use crate::engine::registry::Capabilities;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn molecule() -> MoleculeRecord {
        MoleculeRecord {
            elements: vec!["Cl".into()],
            coordinates: vec![[0.0, 0.0, 0.0]],
            grid: Some(RawGrid::Points(vec![[3.0, 0.0, 0.0]])),
            multipoles: Some(RawMultipoles {
                monopole: vec![-1.0],
                dipole: vec![[0.0; 3]],
                quadrupole: vec![[[0.0; 3]; 3]],
            }),
        }
    }

    fn batch_input() -> BatchInput {
        BatchInput::from_entries(vec![("chloride".to_string(), molecule())]).unwrap()
    }

    fn model() -> ModelHandle {
        PrecomputedPredictor::from_batch(&batch_input()).into_handle()
    }

    struct ChargesOnly;

    impl MultipolePredictor for ChargesOnly {
        fn name(&self) -> &str {
            "charges-only"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                broken_up: false,
                ..Capabilities::ALL
            }
        }

        fn predict(&self, request: &PredictionRequest<'_>) -> Result<RawMultipoles, PredictionError> {
            let n = request.elements.len();
            Ok(RawMultipoles {
                monopole: vec![0.0; n],
                dipole: vec![[0.0; 3]; n],
                quadrupole: vec![[[0.0; 3]; 3]; n],
            })
        }
    }

    fn single_request(molecule: &MoleculeRecord) -> EspRequest<'_> {
        EspRequest::Single {
            id: "chloride",
            molecule,
        }
    }

    #[test]
    fn single_combined_request_returns_values_and_grid() {
        let molecule = molecule();
        let response = run(
            &model(),
            single_request(&molecule),
            RequestFlags::default(),
            &EvaluationConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let expected = -1.0 / (3.0 / crate::core::units::BOHR_RADIUS_ANGSTROM);
        match response {
            EspResponse::Combined { values, grid } => {
                assert!((values[0] - expected).abs() < 1e-12);
                assert_eq!(grid, vec![[3.0, 0.0, 0.0]]);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[test]
    fn batch_request_writes_default_file_next_to_input() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("ions.json");
        let input = batch_input();

        let response = run(
            &model(),
            EspRequest::Batch {
                input: &input,
                source: &source,
                output: None,
            },
            RequestFlags::new(true, false, true),
            &EvaluationConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let EspResponse::BatchFile { path } = response else {
            panic!("expected a batch file response");
        };
        assert!(path.ends_with("ions_esp.json"));
        let written = BatchResult::read_from_path(&path).unwrap();
        assert!(written.contains("chloride"));
    }

    #[test]
    fn batched_flag_with_single_input_is_invalid() {
        let molecule = molecule();
        let err = run(
            &model(),
            single_request(&molecule),
            RequestFlags::new(true, false, false),
            &EvaluationConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidFlags(_)));
    }

    #[test]
    fn batch_input_without_batched_flag_is_invalid_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("ions.json");
        let input = batch_input();

        let err = run(
            &model(),
            EspRequest::Batch {
                input: &input,
                source: &source,
                output: None,
            },
            RequestFlags::default(),
            &EvaluationConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::InvalidFlags(_)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn broken_up_request_needs_model_support() {
        let molecule = molecule();
        let model: ModelHandle = Arc::new(ChargesOnly);
        let flags = RequestFlags::new(false, true, false);
        let err = run(
            &model,
            single_request(&molecule),
            flags,
            &EvaluationConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidFlags(_)));
    }

    #[test]
    fn response_serializes_without_variant_tags() {
        let response = EspResponse::BrokenUp {
            monopole: vec![1.0],
            dipole: vec![0.0],
            quadrupole: vec![0.0],
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, serde_json::json!({"monopole": [1.0], "dipole": [0.0], "quadrupole": [0.0]}));
    }
}
