use crate::core::surface::GridSettings;
use crate::core::units::{COULOMB_CONSTANT_AU, LengthUnit, PotentialUnit};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Units the caller speaks in.
///
/// `length` applies to atom coordinates, explicit grids and the returned grid;
/// `moment_length` is the L in the e·L and e·L² units of predicted moments;
/// `potential` is the unit of every returned potential value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitConfig {
    pub length: LengthUnit,
    pub moment_length: LengthUnit,
    pub potential: PotentialUnit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    pub units: UnitConfig,
    pub grid: GridSettings,
    pub coulomb_constant: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            units: UnitConfig::default(),
            grid: GridSettings::default(),
            coulomb_constant: COULOMB_CONSTANT_AU,
        }
    }
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    length_unit: Option<LengthUnit>,
    moment_length_unit: Option<LengthUnit>,
    potential_unit: Option<PotentialUnit>,
    grid: Option<GridSettings>,
    coulomb_constant: Option<f64>,
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length_unit(mut self, unit: LengthUnit) -> Self {
        self.length_unit = Some(unit);
        self
    }
    pub fn moment_length_unit(mut self, unit: LengthUnit) -> Self {
        self.moment_length_unit = Some(unit);
        self
    }
    pub fn potential_unit(mut self, unit: PotentialUnit) -> Self {
        self.potential_unit = Some(unit);
        self
    }
    pub fn grid(mut self, settings: GridSettings) -> Self {
        self.grid = Some(settings);
        self
    }
    pub fn coulomb_constant(mut self, ke: f64) -> Self {
        self.coulomb_constant = Some(ke);
        self
    }

    /// Units and grid are required. The Coulomb constant defaults to 1 (atomic units).
    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        let units = UnitConfig {
            length: self
                .length_unit
                .ok_or(ConfigError::MissingParameter("length_unit"))?,
            moment_length: self
                .moment_length_unit
                .ok_or(ConfigError::MissingParameter("moment_length_unit"))?,
            potential: self
                .potential_unit
                .ok_or(ConfigError::MissingParameter("potential_unit"))?,
        };

        let grid = self.grid.ok_or(ConfigError::MissingParameter("grid"))?;
        grid.validate()
            .map_err(|e| ConfigError::InvalidParameter {
                name: "grid",
                reason: e.to_string(),
            })?;

        let coulomb_constant = self.coulomb_constant.unwrap_or(COULOMB_CONSTANT_AU);
        if !(coulomb_constant.is_finite() && coulomb_constant > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "coulomb_constant",
                reason: format!("must be a positive finite number, got {}", coulomb_constant),
            });
        }

        Ok(EvaluationConfig {
            units,
            grid,
            coulomb_constant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> EvaluationConfigBuilder {
        EvaluationConfigBuilder::new()
            .length_unit(LengthUnit::Angstrom)
            .moment_length_unit(LengthUnit::Angstrom)
            .potential_unit(PotentialUnit::HartreePerCharge)
            .grid(GridSettings::default())
    }

    #[test]
    fn complete_builder_produces_config_with_atomic_coulomb_constant() {
        let config = complete().build().unwrap();
        assert_eq!(config, EvaluationConfig::default());
    }

    #[test]
    fn missing_units_are_reported_by_name() {
        let err = EvaluationConfigBuilder::new()
            .grid(GridSettings::default())
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("length_unit"));

        let err = EvaluationConfigBuilder::new()
            .length_unit(LengthUnit::Bohr)
            .moment_length_unit(LengthUnit::Bohr)
            .potential_unit(PotentialUnit::Volt)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("grid"));
    }

    #[test]
    fn non_positive_coulomb_constant_is_rejected() {
        let err = complete().coulomb_constant(0.0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "coulomb_constant",
                ..
            }
        ));
    }

    #[test]
    fn invalid_grid_settings_are_rejected() {
        let err = complete()
            .grid(GridSettings::Msk { density: -1.0 })
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "grid", .. }));
    }
}
