use crate::core::io::batch::{BatchEntry, BatchInput, BatchResult};
use crate::core::models::raw::MoleculeRecord;
use crate::core::models::result::EspResult;
use crate::engine::config::EvaluationConfig;
use crate::engine::dispatch::OutputForm;
use crate::engine::error::EngineError;
use crate::engine::evaluation::Evaluator;
use crate::engine::predictor::ModelHandle;
use crate::engine::progress::ProgressReporter;
use std::path::Path;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluates every molecule of `input`, writes the results to `output` and returns the
/// absolute path of the written file.
///
/// Entries are independent and evaluated concurrently, but results are assembled in
/// input order. The first failing entry in that order aborts the batch and no file is
/// written.
#[instrument(skip_all, name = "batch_workflow", fields(molecules = input.len()))]
pub fn run(
    model: &ModelHandle,
    input: &BatchInput,
    config: &EvaluationConfig,
    form: OutputForm,
    output: &Path,
    reporter: &ProgressReporter,
) -> Result<String, EngineError> {
    let evaluator = Evaluator::new(model.clone(), config.clone())?;

    let outcomes = reporter.phase("Evaluating batch", || {
        reporter.task(input.len(), |tick| {
            let evaluate = |(id, molecule): &(String, MoleculeRecord)| {
                let result = evaluator.evaluate(id, molecule);
                tick();
                result
            };

            #[cfg(not(feature = "parallel"))]
            let outcomes: Vec<Result<EspResult, EngineError>> =
                input.entries().iter().map(evaluate).collect();

            #[cfg(feature = "parallel")]
            let outcomes: Vec<Result<EspResult, EngineError>> =
                input.entries().par_iter().map(evaluate).collect();

            outcomes
        })
    });

    let mut batch = BatchResult::with_capacity(input.len());
    for ((id, _), outcome) in input.entries().iter().zip(outcomes) {
        let result = outcome.map_err(|source| {
            warn!(molecule = %id, error = %source, "Batch aborted.");
            EngineError::BatchEntry {
                id: id.clone(),
                source: Box::new(source),
            }
        })?;
        let entry = match form {
            OutputForm::Combined => BatchEntry::combined(result),
            OutputForm::BrokenUp => BatchEntry::broken_up(result),
        };
        batch.insert(id.as_str(), entry)?;
    }

    let path = reporter.phase("Writing results", || batch.write_to_path(output))?;
    let path = path.to_string_lossy().into_owned();

    info!(molecules = batch.len(), path = %path, "Batch results written.");
    Ok(path)
}
