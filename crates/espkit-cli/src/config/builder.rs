use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileGridConfig};
use super::models::{AppConfig, OutputFormat};
use crate::cli::EvaluationArgs;
use crate::error::{CliError, Result};
use espkit::core::surface::{
    DEFAULT_INNER_VDW_SCALE, DEFAULT_LATTICE_SPACING, DEFAULT_MSK_DENSITY,
    DEFAULT_OUTER_VDW_SCALE, GridSettings,
};
use espkit::engine::config::EvaluationConfigBuilder;
use espkit::engine::registry::ModelRegistry;
use std::str::FromStr;
use tracing::debug;

/// Merges command-line flags, `-S` overrides and the config file over the chosen
/// model's defaults. Command-line flags win over `-S`, which wins over the file.
pub fn build_config(args: &EvaluationArgs, registry: &ModelRegistry) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let model_name = args
        .model
        .clone()
        .or(file_config.model.take())
        .unwrap_or(defaults.model);
    let model = registry.resolve(&model_name)?.clone();
    let model_defaults = model.default_config();
    debug!(model = model.name, "Resolved model.");

    let units_file = file_config.units.take().unwrap_or_default();
    let grid = merge_grid(file_config.grid.take(), &model.default_grid)?;
    let output_file = file_config.output.take().unwrap_or_default();

    let mut builder = EvaluationConfigBuilder::new()
        .length_unit(
            args.length_unit
                .or(units_file.length)
                .unwrap_or(model_defaults.units.length),
        )
        .moment_length_unit(
            args.moment_length_unit
                .or(units_file.moment_length)
                .unwrap_or(model_defaults.units.moment_length),
        )
        .potential_unit(
            args.potential_unit
                .or(units_file.potential)
                .unwrap_or(model_defaults.units.potential),
        )
        .grid(grid);
    if let Some(ke) = file_config.coulomb_constant {
        builder = builder.coulomb_constant(ke);
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let output_format = match output_file.format.as_deref() {
        Some(format) => OutputFormat::from_str(format).map_err(CliError::Config)?,
        None => defaults.output_format,
    };

    Ok(AppConfig {
        model,
        core_config,
        broken_up: args.broken_up || output_file.broken_up.unwrap_or(false),
        output_format,
    })
}

fn merge_grid(file_val: Option<FileGridConfig>, model_default: &GridSettings) -> Result<GridSettings> {
    let file_val = file_val.unwrap_or_default();

    let mut settings = match file_val.kind.as_deref().map(str::to_lowercase).as_deref() {
        None => model_default.clone(),
        Some("msk") => GridSettings::Msk {
            density: DEFAULT_MSK_DENSITY,
        },
        Some("lattice") => GridSettings::Lattice {
            spacing: DEFAULT_LATTICE_SPACING,
            inner_vdw_scale: DEFAULT_INNER_VDW_SCALE,
            outer_vdw_scale: DEFAULT_OUTER_VDW_SCALE,
        },
        Some(other) => {
            return Err(CliError::Config(format!(
                "Unknown grid type '{}'. Expected 'msk' or 'lattice'.",
                other
            )));
        }
    };

    let misplaced = |key: &str, kind: &str| {
        CliError::Config(format!("`grid.{}` does not apply to {} grids", key, kind))
    };

    match &mut settings {
        GridSettings::Msk { density } => {
            if file_val.spacing.is_some() {
                return Err(misplaced("spacing", "msk"));
            }
            if file_val.inner_vdw_scale.is_some() || file_val.outer_vdw_scale.is_some() {
                return Err(misplaced("*-vdw-scale", "msk"));
            }
            if let Some(d) = file_val.density {
                *density = d;
            }
        }
        GridSettings::Lattice {
            spacing,
            inner_vdw_scale,
            outer_vdw_scale,
        } => {
            if file_val.density.is_some() {
                return Err(misplaced("density", "lattice"));
            }
            if let Some(s) = file_val.spacing {
                *spacing = s;
            }
            if let Some(s) = file_val.inner_vdw_scale {
                *inner_vdw_scale = s;
            }
            if let Some(s) = file_val.outer_vdw_scale {
                *outer_vdw_scale = s;
            }
        }
    }
    Ok(settings)
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "model" => config.model = Some(value_str.trim().to_string()),
            "coulomb-constant" => {
                config.coulomb_constant = Some(parse_value(key, value_str, "float")?);
            }
            "units.length" => {
                config.units.get_or_insert_with(Default::default).length =
                    Some(parse_value(key, value_str, "unit")?);
            }
            "units.moment-length" => {
                config.units.get_or_insert_with(Default::default).moment_length =
                    Some(parse_value(key, value_str, "unit")?);
            }
            "units.potential" => {
                config.units.get_or_insert_with(Default::default).potential =
                    Some(parse_value(key, value_str, "unit")?);
            }
            "grid.type" => {
                config.grid.get_or_insert_with(Default::default).kind =
                    Some(value_str.trim().to_string());
            }
            "grid.density" => {
                config.grid.get_or_insert_with(Default::default).density =
                    Some(parse_value(key, value_str, "float")?);
            }
            "grid.spacing" => {
                config.grid.get_or_insert_with(Default::default).spacing =
                    Some(parse_value(key, value_str, "float")?);
            }
            "grid.inner-vdw-scale" => {
                config.grid.get_or_insert_with(Default::default).inner_vdw_scale =
                    Some(parse_value(key, value_str, "float")?);
            }
            "grid.outer-vdw-scale" => {
                config.grid.get_or_insert_with(Default::default).outer_vdw_scale =
                    Some(parse_value(key, value_str, "float")?);
            }
            "output.format" => {
                config.output.get_or_insert_with(Default::default).format =
                    Some(value_str.trim().to_string());
            }
            "output.broken-up" => {
                config.output.get_or_insert_with(Default::default).broken_up =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
