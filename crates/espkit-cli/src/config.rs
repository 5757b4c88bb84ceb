//! Configuration of the evaluating commands: a TOML file, `-S key=value` overrides
//! and command-line flags, merged over model and built-in defaults.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::{AppConfig, OutputFormat};
