use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DataFiles, MetricsSettings};

/// Loads the application configuration from the given TOML file.
///
/// The file is optional: every field carries a default, so a missing file
/// yields the default configuration rather than an error. A file that is
/// present but structurally unusable is rejected here, before any data is
/// read.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Structural checks that deserialization alone cannot express. Numeric
/// threshold ranges are the engine's concern; this covers the fields the
/// loader consumes verbatim.
fn validate(config: &Config) -> Result<(), ConfigError> {
    for (key, path) in [
        ("data.factory", &config.data.factory),
        ("data.supplier", &config.data.supplier),
        ("data.category", &config.data.category),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{key} must not be an empty path"
            )));
        }
    }
    if config.metrics.total_row_label.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "metrics.total_row_label must not be blank".to_string(),
        ));
    }
    Ok(())
}
