use thiserror::Error;

/// Errors raised while configuring a test run
#[derive(Error, Debug)]
pub enum CoreError {
    /// A configuration file could not be read
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid YAML
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configuration value is present but unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// The global tracing subscriber could not be installed
    #[error("Logging initialisation failed: {0}")]
    Logging(String),
}

impl CoreError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::Io { .. } => "ERR_CORE_IO",
            CoreError::Yaml(_) => "ERR_CORE_YAML_PARSE",
            CoreError::Config(_) => "ERR_CORE_CONFIG",
            CoreError::Logging(_) => "ERR_CORE_LOGGING",
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
