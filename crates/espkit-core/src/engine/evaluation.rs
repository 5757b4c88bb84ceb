use super::adapter::MoleculeAdapter;
use super::config::EvaluationConfig;
use super::error::EngineError;
use super::grid_provider::GridProvider;
use super::predictor::{ModelHandle, PredictionRequest};
use crate::core::electrostatics::kernel::MultipoleKernel;
use crate::core::models::raw::MoleculeRecord;
use crate::core::models::result::EspResult;
use crate::core::units;
use tracing::{debug, instrument};

/// Evaluates molecules with one model and one configuration.
///
/// The pipeline per molecule is: predict multipoles, bind them to the molecule,
/// provide a grid, convert everything to atomic units, run the kernel, and convert
/// the potential to the configured unit. The returned grid is the one that was
/// provided, in the caller's length unit.
pub struct Evaluator {
    model: ModelHandle,
    config: EvaluationConfig,
    kernel: MultipoleKernel,
    grids: GridProvider,
}

impl Evaluator {
    pub fn new(model: ModelHandle, config: EvaluationConfig) -> Result<Self, EngineError> {
        let grids = GridProvider::from_settings(&config.grid)?;
        let kernel = MultipoleKernel::new(config.coulomb_constant);
        Ok(Self {
            model,
            config,
            kernel,
            grids,
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    #[instrument(skip_all, fields(molecule = id))]
    pub fn evaluate(&self, id: &str, molecule: &MoleculeRecord) -> Result<EspResult, EngineError> {
        let units = self.config.units;

        let request = PredictionRequest {
            id,
            elements: &molecule.elements,
            coordinates: &molecule.coordinates,
        };
        let raw = self
            .model
            .predict(&request)
            .map_err(|e| EngineError::Prediction {
                model: self.model.name().to_string(),
                message: e.message,
            })?;

        let explicit_grid = molecule
            .grid
            .as_ref()
            .map(|g| g.to_grid(units.length))
            .transpose()?;

        let mut adapter = MoleculeAdapter::new(units.length, units.moment_length);
        if explicit_grid.is_none() {
            adapter = adapter.with_element_table(self.grids.generator());
        }
        let (conformer, multipoles) = adapter.build(molecule, &raw)?;

        // Grid generators size their output from atom positions.
        units::normalize_positions(&conformer)?;
        let grid = self.grids.provide_grid(&conformer, explicit_grid)?;
        let system = units::normalize(&conformer, &multipoles, &grid)?;

        debug!(
            atoms = system.positions.len(),
            points = system.grid_points.len(),
            "Evaluating multipole potential"
        );

        let components = self
            .kernel
            .evaluate(&system.positions, &system.multipoles, &system.grid_points)
            .scaled(units.potential.from_atomic_factor());

        Ok(EspResult::new(components, grid, units.potential))
    }
}
