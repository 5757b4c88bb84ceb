use super::config::{EvaluationConfig, UnitConfig};
use super::error::EngineError;
use crate::core::surface::GridSettings;
use crate::core::units::LengthUnit;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Riniker MultipoleNet. The backend is supplied by the host process.
    Riniker,
    /// Multipoles recorded alongside each molecule.
    Precomputed,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Riniker => f.write_str("riniker"),
            ModelKind::Precomputed => f.write_str("precomputed"),
        }
    }
}

/// What a model can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub multipoles: bool,
    pub broken_up: bool,
    pub batched: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        multipoles: true,
        broken_up: true,
        batched: true,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub name: &'static str,
    pub kind: ModelKind,
    pub description: &'static str,
    pub capabilities: Capabilities,
    /// Length unit of the predicted dipoles and quadrupoles.
    pub moment_length_unit: LengthUnit,
    pub default_grid: GridSettings,
}

impl ModelDescriptor {
    /// Evaluation defaults for this model: ångström coordinates, the model's moment
    /// unit, hartree per charge and the model's default grid.
    pub fn default_config(&self) -> EvaluationConfig {
        EvaluationConfig {
            units: UnitConfig {
                moment_length: self.moment_length_unit,
                ..UnitConfig::default()
            },
            grid: self.default_grid.clone(),
            ..EvaluationConfig::default()
        }
    }
}

/// Table of the models a process knows about, keyed by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    descriptors: Vec<ModelDescriptor>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self {
            descriptors: vec![
                ModelDescriptor {
                    name: "RIN",
                    kind: ModelKind::Riniker,
                    description: "Riniker MultipoleNet atomic multipoles",
                    capabilities: Capabilities::ALL,
                    moment_length_unit: LengthUnit::Angstrom,
                    default_grid: GridSettings::default(),
                },
                ModelDescriptor {
                    name: "PRECOMPUTED",
                    kind: ModelKind::Precomputed,
                    description: "Multipoles stored with each input molecule",
                    capabilities: Capabilities::ALL,
                    moment_length_unit: LengthUnit::Angstrom,
                    default_grid: GridSettings::default(),
                },
            ],
        }
    }

    /// Adds a model. A model with the same name (ignoring case) is replaced.
    pub fn register(&mut self, descriptor: ModelDescriptor) {
        match self
            .descriptors
            .iter_mut()
            .find(|d| d.name.eq_ignore_ascii_case(descriptor.name))
        {
            Some(existing) => *existing = descriptor,
            None => self.descriptors.push(descriptor),
        }
    }

    pub fn resolve(&self, name: &str) -> Result<&ModelDescriptor, EngineError> {
        let name = name.trim();
        self.descriptors
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::UnknownModel(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_models_resolve_case_insensitively() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.resolve("rin").unwrap().kind, ModelKind::Riniker);
        assert_eq!(registry.resolve(" Precomputed ").unwrap().name, "PRECOMPUTED");
    }

    #[test]
    fn unknown_model_is_an_error() {
        let err = ModelRegistry::builtin().resolve("GPT").unwrap_err();
        assert!(matches!(err, EngineError::UnknownModel(name) if name == "GPT"));
    }

    #[test]
    fn default_config_uses_model_moment_unit() {
        let mut descriptor = ModelRegistry::builtin().resolve("RIN").unwrap().clone();
        descriptor.moment_length_unit = LengthUnit::Bohr;
        let config = descriptor.default_config();
        assert_eq!(config.units.moment_length, LengthUnit::Bohr);
        assert_eq!(config.units.length, LengthUnit::Angstrom);
    }

    #[test]
    fn register_replaces_existing_descriptor() {
        let mut registry = ModelRegistry::builtin();
        let mut rin = registry.resolve("RIN").unwrap().clone();
        rin.capabilities.broken_up = false;
        registry.register(rin);

        assert_eq!(registry.len(), 2);
        assert!(!registry.resolve("RIN").unwrap().capabilities.broken_up);
    }
}
