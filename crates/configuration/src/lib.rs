use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{AnalyticsOverrides, AnalyticsSettings, Config, DataSettings, LoggingSettings};

/// File read when no explicit configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tickerlens.toml";

/// Prefix of environment variables overriding file settings,
/// e.g. `TICKERLENS__ANALYTICS__ROLLING_WINDOW=60`.
pub const ENV_PREFIX: &str = "TICKERLENS";

/// Loads the application configuration.
///
/// This function is the primary entry point for this crate. It reads the given
/// TOML file (or `tickerlens.toml` if present), layers environment variables on
/// top, deserializes the result into our strongly-typed `Config` struct and
/// validates it. An explicitly given file must exist; the default one may not.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let (file, required) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    let builder = config::Config::builder()
        .add_source(config::File::from(file).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("data.tickers"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(file = %file.display(), "Configuration loaded.");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [analytics]
            rolling_window = 60

            [data]
            tickers = ["NVDA"]
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.analytics.rolling_window, 60);
        assert_eq!(config.analytics.min_periods, 2);
        assert_eq!(config.data.tickers, vec!["NVDA".to_string()]);
        assert_eq!(config.data.benchmark.as_deref(), Some("^GSPC"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_config("[analytics]\nrolling_window = 0\n");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));

        let file = write_config("[analytics]\nannualization_factor = -1.0\n");
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Path::new("/definitely/not/here/tickerlens.toml");
        assert!(matches!(load_config(Some(missing)), Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut settings = AnalyticsSettings::default();
        settings.apply(&AnalyticsOverrides {
            window: Some(1),
            as_of_year: Some(2023),
            ..Default::default()
        });

        assert_eq!(settings.rolling_window, 1);
        assert_eq!(settings.min_periods, 1);
        assert_eq!(settings.as_of_year, Some(2023));
        assert!((settings.annualization_factor - 252f64.sqrt()).abs() < 1e-12);
    }
}
