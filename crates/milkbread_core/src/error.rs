use miette::Diagnostic;
use thiserror::Error;

/// Main error type for milkbread core operations
#[derive(Error, Debug, Diagnostic)]
pub enum CoreError {
    #[error("Failed to read data file {path}")]
    #[diagnostic(
        code(milkbread::data::read_failed),
        help("Ensure the data directory is bundled next to the binary and readable")
    )]
    DataFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse data file {path}")]
    #[diagnostic(
        code(milkbread::data::parse_failed),
        help("Check JSON syntax and field types against the other data files")
    )]
    DataFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error")]
    #[diagnostic(help("Check your .env / milkbread.toml values"))]
    Config(#[from] ConfigError),
}

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Configuration file not found at {path}")]
    #[diagnostic(
        code(milkbread::config::not_found),
        help("Create a config file or use environment variables")
    )]
    NotFound { path: String },

    #[error("Invalid configuration")]
    #[diagnostic(
        code(milkbread::config::invalid),
        help("Check configuration format and required fields")
    )]
    Invalid { field: String, reason: String },

    #[error("Failed to parse configuration")]
    #[diagnostic(
        code(milkbread::config::parse_failed),
        help("Check TOML syntax and field types")
    )]
    ParseFailed {
        #[source]
        source: toml::de::Error,
    },
}

/// Type alias for Results in milkbread core
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    #[test]
    fn test_config_error_reports_code() {
        let error = ConfigError::Invalid {
            field: "discord.token".to_string(),
            reason: "token cannot be empty".to_string(),
        };

        let report = Report::new(error);
        let output = format!("{:?}", report);
        assert!(output.contains("milkbread::config::invalid"));
    }

    #[test]
    fn test_core_error_wraps_config() {
        let error = CoreError::from(ConfigError::NotFound {
            path: "milkbread.toml".to_string(),
        });
        assert!(matches!(error, CoreError::Config(_)));
    }

    #[test]
    fn test_data_parse_error_names_file() {
        let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let error = CoreError::DataFileParse {
            path: "data/coaches.json".to_string(),
            source: bad.unwrap_err(),
        };

        assert!(format!("{}", error).contains("data/coaches.json"));
    }
}
