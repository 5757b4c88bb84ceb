use super::error::EngineError;
use crate::core::models::conformer::Conformer;
use crate::core::models::grid::Grid;
use crate::core::surface::{GridGenerator, GridSettings};
use tracing::debug;

/// Supplies the grid of an evaluation: the caller's own, or one generated around the
/// conformer.
pub struct GridProvider {
    generator: Box<dyn GridGenerator>,
}

impl GridProvider {
    pub fn new(generator: Box<dyn GridGenerator>) -> Self {
        Self { generator }
    }

    pub fn from_settings(settings: &GridSettings) -> Result<Self, EngineError> {
        Ok(Self::new(settings.generator()?))
    }

    pub fn generator(&self) -> &dyn GridGenerator {
        self.generator.as_ref()
    }

    /// Explicit grids are returned untouched; no check relates them to the conformer.
    pub fn provide_grid(
        &self,
        conformer: &Conformer,
        explicit_grid: Option<Grid>,
    ) -> Result<Grid, EngineError> {
        if let Some(grid) = explicit_grid {
            debug!(points = grid.len(), "Using caller-supplied grid");
            return Ok(grid);
        }

        let grid = self.generator.generate(conformer)?;
        debug!(
            generator = self.generator.name(),
            atoms = conformer.len(),
            points = grid.len(),
            "Generated grid"
        );
        Ok(grid)
    }
}
