use super::models::OutputFormat;

pub struct DefaultsConfig {
    pub model: String,
    pub output_format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "PRECOMPUTED".to_string(),
            output_format: OutputFormat::Json,
        }
    }
}
