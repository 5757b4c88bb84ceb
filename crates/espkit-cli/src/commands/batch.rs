use crate::cli::BatchArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use espkit::core::io::batch::BatchInput;
use espkit::engine::dispatch::RequestFlags;
use espkit::engine::progress::ProgressReporter;
use espkit::engine::registry::ModelRegistry;
use espkit::workflows::esp::{self, EspRequest, EspResponse};
use tracing::info;

pub fn run(args: BatchArgs) -> Result<()> {
    let path = evaluate(&args, CliProgressHandler::new())?;
    println!("{}", path);
    Ok(())
}

/// Runs the batch and returns the absolute path of the written result file.
fn evaluate(args: &BatchArgs, progress: CliProgressHandler) -> Result<String> {
    let registry = ModelRegistry::builtin();
    let app = build_config(&args.evaluation, &registry)?;

    info!("Loading batch from {:?}", &args.input);
    let input = BatchInput::read_from_path(&args.input)
        .map_err(|e| CliError::parsing(&args.input, e))?;
    info!(molecules = input.len(), "Batch loaded.");

    let model = super::load_model(&app.model, &input)?;
    let reporter = ProgressReporter::with_callback(progress.get_callback());

    let response = esp::run(
        &model,
        EspRequest::Batch {
            input: &input,
            source: &args.input,
            output: args.output.as_deref(),
        },
        RequestFlags::new(true, app.broken_up, args.batched_grid),
        &app.core_config,
        &reporter,
    )?;

    match response {
        EspResponse::BatchFile { path } => Ok(path),
        other => Err(CliError::Other(anyhow::anyhow!(
            "batch request produced a non-batch response: {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EvaluationArgs;
    use espkit::core::io::batch::{BatchEntry, BatchResult};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    const BATCH: &str = r#"{
        "sodium": {
            "elements": ["Na"],
            "coordinates": [[0.0, 0.0, 0.0]],
            "grid": [[3.0, 0.0, 0.0]],
            "multipoles": {"monopole": [1.0], "dipole": [[0.0, 0.0, 0.0]],
                           "quadrupole": [[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]]}
        },
        "chloride": {
            "elements": ["Cl"],
            "coordinates": [[0.0, 0.0, 0.0]],
            "grid": [[3.0, 0.0, 0.0]],
            "multipoles": {"monopole": [-1.0], "dipole": [[0.0, 0.0, 0.0]],
                           "quadrupole": [[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]]}
        }
    }"#;

    fn args(dir: &Path, content: &str) -> BatchArgs {
        let input = dir.join("ions.json");
        fs::write(&input, content).unwrap();
        BatchArgs {
            input,
            output: None,
            batched_grid: false,
            evaluation: EvaluationArgs::default(),
        }
    }

    #[test]
    fn writes_default_result_file_with_input_keys() {
        let dir = tempdir().unwrap();
        let path = evaluate(&args(dir.path(), BATCH), CliProgressHandler::hidden()).unwrap();

        assert!(PathBuf::from(&path).is_absolute());
        assert!(path.ends_with("ions_esp.json"));
        let written = BatchResult::read_from_path(&path).unwrap();
        assert_eq!(written.ids().collect::<Vec<_>>(), vec!["sodium", "chloride"]);

        let value = |id| match written.get(id) {
            Some(BatchEntry::Combined { esp_values, .. }) => esp_values[0],
            other => panic!("unexpected entry {:?}", other),
        };
        assert!((value("sodium") + value("chloride")).abs() < 1e-12);
    }

    #[test]
    fn explicit_output_and_broken_up_mode() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path(), BATCH);
        args.output = Some(dir.path().join("parts.json"));
        args.batched_grid = true;
        args.evaluation.broken_up = true;

        let path = evaluate(&args, CliProgressHandler::hidden()).unwrap();
        assert!(path.ends_with("parts.json"));
        let written = BatchResult::read_from_path(&path).unwrap();
        assert!(matches!(written.get("sodium"), Some(BatchEntry::BrokenUp { .. })));
    }

    #[test]
    fn failing_molecule_aborts_without_output() {
        let dir = tempdir().unwrap();
        let broken = BATCH.replacen("\"monopole\": [-1.0]", "\"monopole\": [-1.0, 0.5]", 1);
        let args = args(dir.path(), &broken);

        let result = evaluate(&args, CliProgressHandler::hidden());
        assert!(matches!(result, Err(CliError::Core(_))));
        assert!(!dir.path().join("ions_esp.json").exists());
    }

    #[test]
    fn duplicate_ids_are_a_parsing_error() {
        let dir = tempdir().unwrap();
        let duplicated = r#"{"a": {"elements": [], "coordinates": []},
                             "a": {"elements": [], "coordinates": []}}"#;
        let result = evaluate(&args(dir.path(), duplicated), CliProgressHandler::hidden());
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
