use super::esp::EspResponse;
use crate::core::models::raw::MoleculeRecord;
use crate::engine::config::EvaluationConfig;
use crate::engine::dispatch::OutputForm;
use crate::engine::error::EngineError;
use crate::engine::evaluation::Evaluator;
use crate::engine::predictor::ModelHandle;
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

#[instrument(skip_all, name = "single_workflow", fields(molecule = id))]
pub fn run(
    model: &ModelHandle,
    id: &str,
    molecule: &MoleculeRecord,
    config: &EvaluationConfig,
    form: OutputForm,
    reporter: &ProgressReporter,
) -> Result<EspResponse, EngineError> {
    let evaluator = Evaluator::new(model.clone(), config.clone())?;
    let result = reporter.phase("Evaluating ESP", || evaluator.evaluate(id, molecule))?;

    info!(
        model = model.name(),
        atoms = molecule.elements.len(),
        points = result.len(),
        unit = %result.unit,
        "ESP evaluated."
    );

    Ok(EspResponse::from_result(result, form))
}
