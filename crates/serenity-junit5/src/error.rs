use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading test-class descriptors
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// Errors that occur during YAML parsing
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The descriptor file could not be read
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),
}

impl DescriptorError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DescriptorError::YamlError(_) => "ERR_JUNIT5_YAML_PARSE",
            DescriptorError::Io { .. } => "ERR_JUNIT5_DESCRIPTOR_IO",
            DescriptorError::MissingRequiredField(_) => "ERR_JUNIT5_MISSING_FIELD",
        }
    }
}

/// Errors raised while loading CSV test data
#[derive(Error, Debug)]
pub enum CsvSourceError {
    /// The annotation names no file
    #[error("No CSV resources declared")]
    NoResources,

    /// The csv reader only supports single-byte delimiters
    #[error("Invalid CSV delimiter {0:?}: must be a single ASCII character")]
    InvalidDelimiter(char),

    /// A CSV file could not be opened
    #[error("Cannot open CSV resource {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV file is malformed
    #[error("Cannot parse CSV resource {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl CsvSourceError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CsvSourceError::NoResources => "ERR_JUNIT5_CSV_NO_RESOURCES",
            CsvSourceError::InvalidDelimiter(_) => "ERR_JUNIT5_CSV_DELIMITER",
            CsvSourceError::Io { .. } => "ERR_JUNIT5_CSV_IO",
            CsvSourceError::Parse { .. } => "ERR_JUNIT5_CSV_PARSE",
        }
    }
}
