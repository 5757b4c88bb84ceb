use crate::cli::EvaluateArgs;
use crate::config::{OutputFormat, build_config};
use crate::error::{CliError, Result};
use crate::output;
use espkit::core::io::batch::BatchInput;
use espkit::core::models::raw::{MoleculeRecord, RawGrid};
use espkit::engine::dispatch::RequestFlags;
use espkit::engine::progress::ProgressReporter;
use espkit::engine::registry::ModelRegistry;
use espkit::workflows::esp::{self, EspRequest};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::info;

pub fn run(args: EvaluateArgs) -> Result<()> {
    let registry = ModelRegistry::builtin();
    let app = build_config(&args.evaluation, &registry)?;

    info!("Loading input molecule from {:?}", &args.input);
    let mut molecule: MoleculeRecord = read_json(&args.input)?;
    if let Some(grid_path) = &args.grid {
        info!("Loading grid from {:?}", grid_path);
        let grid: RawGrid = read_json(grid_path)?;
        molecule.grid = Some(grid);
    }

    let id = molecule_id(&args.input);
    let input = BatchInput::from_entries(vec![(id, molecule)])
        .map_err(|e| CliError::Other(e.into()))?;
    let model = super::load_model(&app.model, &input)?;

    let (id, molecule) = input
        .iter()
        .next()
        .ok_or_else(|| CliError::Argument("no molecule to evaluate".to_string()))?;
    let flags = RequestFlags::new(false, app.broken_up, false);
    let response = esp::run(
        &model,
        EspRequest::Single { id, molecule },
        flags,
        &app.core_config,
        &ProgressReporter::new(),
    )?;

    match &args.output {
        Some(path) => {
            let format = OutputFormat::from_path(path).unwrap_or(app.output_format);
            output::write_response_to_path(&response, format, path)?;
            info!("Result written to {:?}", path);
            println!("Result written to: {}", path.display());
        }
        None => output::write_response(&response, app.output_format, io::stdout().lock())?,
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| CliError::parsing(path, e))
}

fn molecule_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "molecule".to_string())
}
