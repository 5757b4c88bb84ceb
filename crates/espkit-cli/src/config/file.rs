use crate::error::{CliError, Result};
use espkit::core::units::{LengthUnit, PotentialUnit};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileUnitsConfig {
    pub length: Option<LengthUnit>,
    pub moment_length: Option<LengthUnit>,
    pub potential: Option<PotentialUnit>,
}

/// Grid section. Every field is optional so that `-S` can fill in single values;
/// parameters that do not belong to the chosen grid type are rejected when merging.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileGridConfig {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub density: Option<f64>,
    pub spacing: Option<f64>,
    pub inner_vdw_scale: Option<f64>,
    pub outer_vdw_scale: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub format: Option<String>,
    pub broken_up: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub coulomb_constant: Option<f64>,
    pub units: Option<FileUnitsConfig>,
    pub grid: Option<FileGridConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::parsing(path, e))
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
